//! Key-driven line reader.
//!
//! [`LineReader`] consumes one [`Key`] at a time from a [`Terminal`], keeps
//! the in-progress line and echoes every change back to the terminal. Commands
//! spanning several physical lines (open quotes or a trailing backslash) are
//! read until the tokenizer reports them complete.

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{DefaultConfig, ShellConfig};
use crate::error::{CliError, Result};
use crate::io::{Key, KeySession, Terminal};
use crate::shell::completion::{
    CompletionOption, PrintOptionsHandler, TabAction, TabCompleter, completion_tokens,
};
use crate::shell::history::LineHistory;
use crate::shell::parser::{command_string, parse_command};

/// Hooks used by [`LineReader::read_command`]. Every hook is optional.
#[derive(Default)]
pub struct ReadCommandOptions<'a> {
    /// Up/Down recall; index 0 is the most recent command
    pub history: Option<&'a dyn Fn(usize) -> Option<Vec<String>>>,

    /// Tab completion source
    pub completion: Option<&'a dyn Fn(&[String], usize) -> Vec<CompletionOption>>,

    /// Double-tab listing; without it a double-tab does nothing
    pub printer: Option<&'a mut PrintOptionsHandler>,
}

impl fmt::Debug for ReadCommandOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadCommandOptions")
            .field("history", &self.history.is_some())
            .field("completion", &self.completion.is_some())
            .field("printer", &self.printer.is_some())
            .finish()
    }
}

/// Reads commands and lines from a terminal.
///
/// Owns the double-tab state, so the timing of the last Tab press carries
/// over between reads of the same reader but never between readers.
#[derive(Debug, Clone)]
pub struct LineReader {
    completer: TabCompleter,
}

impl LineReader {
    /// Reader with the default double-tab span.
    pub fn new() -> Self {
        Self::with_double_tab_span(DefaultConfig::DOUBLE_TAB_SPAN)
    }

    /// Reader with a custom double-tab span.
    pub fn with_double_tab_span(span: Duration) -> Self {
        Self {
            completer: TabCompleter::new(span),
        }
    }

    /// Maximum delay between two Tab presses that still counts as double-tab.
    pub fn double_tab_span(&self) -> Duration {
        self.completer.span()
    }

    /// Read one complete command.
    ///
    /// Shows `"{prompt}> "` and edits the line until Enter. If the text is
    /// still incomplete (open quote or escape), a line break becomes part of
    /// the command and reading continues on a new line with an empty prompt.
    ///
    /// # Errors
    ///
    /// [`CliError::Interrupted`] on Ctrl+C and [`CliError::Io`] when the
    /// terminal fails. The partial command is discarded in both cases.
    pub fn read_command<T: Terminal>(
        &mut self,
        terminal: &mut T,
        prompt: &str,
        opts: &mut ReadCommandOptions<'_>,
    ) -> Result<Vec<String>> {
        let mut session = KeySession::begin(terminal)?;
        let terminal: &mut T = &mut session;

        let history = opts
            .history
            .map(|source| move |index| source(index).map(|cmd| command_string(&cmd)));
        let history = history.as_ref().map(|h| h as &dyn Fn(usize) -> Option<String>);

        let mut text = String::new();
        let mut prompt = prompt;

        loop {
            let line = self.edit_line(
                terminal,
                Some(prompt),
                &text,
                history,
                opts.completion,
                opts.printer.as_deref_mut(),
            )?;
            text.push_str(&line);

            let (tokens, complete) = parse_command(&text);
            if complete {
                return Ok(tokens);
            }

            text.push('\n');
            prompt = "";
        }
    }

    /// Read a single physical line without prompt or completion.
    ///
    /// Up/Down recall entries of `history` verbatim. No tokenizing happens;
    /// the raw text is returned.
    pub fn read_line<T: Terminal>(
        &mut self,
        terminal: &mut T,
        history: Option<&LineHistory>,
    ) -> Result<String> {
        let mut session = KeySession::begin(terminal)?;
        let terminal: &mut T = &mut session;

        let recall = history.map(|h| move |index| h.entry(index).cloned());
        let recall = recall.as_ref().map(|r| r as &dyn Fn(usize) -> Option<String>);

        self.edit_line(terminal, None, "", recall, None, None)
    }

    fn edit_line<T: Terminal>(
        &mut self,
        terminal: &mut T,
        prompt: Option<&str>,
        pending: &str,
        history: Option<&dyn Fn(usize) -> Option<String>>,
        completion: Option<&dyn Fn(&[String], usize) -> Vec<CompletionOption>>,
        mut printer: Option<&mut PrintOptionsHandler>,
    ) -> Result<String> {
        if let Some(prompt) = prompt {
            write!(terminal, "{prompt}> ")?;
            terminal.flush()?;
        }

        let mut line = LineEditor::new(terminal);
        let mut history_index: Option<usize> = None;

        loop {
            match line.terminal.read_key()? {
                Key::Interrupt => return Err(CliError::Interrupted),

                Key::Enter => {
                    line.terminal.write_str("\r\n")?;
                    line.terminal.flush()?;
                    return Ok(line.buffer);
                }

                Key::Escape => line.clear()?,

                Key::Up => {
                    if let Some(history) = history {
                        let next = history_index.map_or(0, |i| i + 1);
                        if let Some(entry) = history(next) {
                            history_index = Some(next);
                            line.replace(&entry)?;
                        }
                    }
                }

                Key::Down => {
                    if let (Some(history), Some(index)) = (history, history_index) {
                        match index.checked_sub(1) {
                            Some(newer) => match history(newer) {
                                Some(entry) => {
                                    history_index = Some(newer);
                                    line.replace(&entry)?;
                                }
                                // History changed underneath us
                                None => {
                                    history_index = None;
                                    line.clear()?;
                                }
                            },
                            None => {
                                history_index = None;
                                line.clear()?;
                            }
                        }
                    }
                }

                Key::Tab => {
                    if let Some(source) = completion {
                        self.complete(&mut line, prompt, pending, source, printer.as_deref_mut())?;
                    }
                }

                Key::Backspace => line.remove_last_char()?,

                Key::Space => line.put_char(' ')?,

                Key::Char(c) => line.put_char(c)?,

                Key::Left | Key::Right | Key::Home | Key::End | Key::Delete => {}
            }

            line.terminal.flush()?;
        }
    }

    fn complete<T: Terminal>(
        &mut self,
        line: &mut LineEditor<'_, T>,
        prompt: Option<&str>,
        pending: &str,
        source: &dyn Fn(&[String], usize) -> Vec<CompletionOption>,
        printer: Option<&mut PrintOptionsHandler>,
    ) -> Result<()> {
        let tokens = completion_tokens(&format!("{pending}{}", line.buffer));
        let index = tokens.len().saturating_sub(1);
        let prefix = tokens.last().map(String::as_str).unwrap_or("");

        let options = source(&tokens, index);
        match self.completer.complete(options, prefix, Instant::now()) {
            TabAction::Insert(text) => line.put_str(&text)?,
            TabAction::List(options) => {
                if let Some(printer) = printer {
                    line.terminal.write_str("\r\n")?;
                    printer(&mut *line.terminal, &options)?;
                    line.reprint(prompt)?;
                }
            }
            TabAction::Unchanged => {}
        }

        Ok(())
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

/// In-progress line plus its echo on the terminal.
struct LineEditor<'t, T: Terminal> {
    terminal: &'t mut T,
    buffer: String,
    /// Visible characters of the current line
    line_len: usize,
}

impl<'t, T: Terminal> LineEditor<'t, T> {
    fn new(terminal: &'t mut T) -> Self {
        Self {
            terminal,
            buffer: String::new(),
            line_len: 0,
        }
    }

    fn put_char(&mut self, c: char) -> Result<()> {
        self.buffer.push(c);
        self.terminal.put_char(c)?;
        self.line_len += 1;
        Ok(())
    }

    fn put_str(&mut self, s: &str) -> Result<()> {
        self.buffer.push_str(s);
        self.terminal.write_str(s)?;
        self.line_len += s.chars().count();
        Ok(())
    }

    fn remove_last_char(&mut self) -> Result<()> {
        if self.line_len > 0 {
            self.buffer.pop();
            self.terminal.write_str("\x08 \x08")?;
            self.line_len -= 1;
        }
        Ok(())
    }

    /// Erase the visible line: back up, blank out, back up again.
    fn clear(&mut self) -> Result<()> {
        self.buffer.clear();
        if self.line_len > 0 {
            let back = "\x08".repeat(self.line_len);
            let blank = " ".repeat(self.line_len);
            self.terminal.write_str(&back)?;
            self.terminal.write_str(&blank)?;
            self.terminal.write_str(&back)?;
        }
        self.line_len = 0;
        Ok(())
    }

    fn replace(&mut self, text: &str) -> Result<()> {
        self.clear()?;
        self.put_str(text)
    }

    fn reprint(&mut self, prompt: Option<&str>) -> Result<()> {
        match prompt {
            Some(prompt) => write!(self.terminal, "{prompt}> {}", self.buffer)?,
            None => self.terminal.write_str(&self.buffer)?,
        }
        Ok(())
    }
}
