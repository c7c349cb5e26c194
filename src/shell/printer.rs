//! Candidate list output for double-tab.

use std::io;

use crate::io::{Key, Terminal};
use crate::shell::completion::CompletionOption;

/// Print option labels in left-aligned columns fitting `width`.
///
/// Column width is the longest label plus two spaces; at least one column is
/// always used. Every row ends with `"\r\n"`.
pub fn print_list(
    terminal: &mut dyn Terminal,
    options: &[CompletionOption],
    width: usize,
) -> io::Result<()> {
    let Some(longest) = options.iter().map(|o| o.label().chars().count()).max() else {
        return Ok(());
    };

    let column_width = longest + 2;
    let columns = (width / column_width).max(1);

    for row in options.chunks(columns) {
        let mut line = String::new();
        for (i, option) in row.iter().enumerate() {
            line.push_str(option.label());
            if i + 1 < row.len() {
                let pad = column_width - option.label().chars().count();
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        terminal.write_line(&line)?;
    }

    Ok(())
}

/// Options printer that asks for confirmation before printing long lists.
///
/// Lists with more than `max_auto_print` entries are only printed after the
/// user answers `y` or `Y`.
pub fn default_options_printer(
    max_auto_print: usize,
    width: usize,
) -> impl FnMut(&mut dyn Terminal, &[CompletionOption]) -> io::Result<()> + 'static {
    move |terminal, options| {
        if options.len() > max_auto_print {
            terminal.write_line(&format!("  print all {} options? (y/N)", options.len()))?;
            if !matches!(terminal.read_key()?, Key::Char('y' | 'Y')) {
                return Ok(());
            }
        }
        print_list(terminal, options, width)
    }
}
