//! Tab completion for command lines.
//!
//! Completion sources return [`CompletionOption`]s for one argument position.
//! [`TabCompleter`] turns those into an edit of the current line: it inserts
//! the unique remainder or the longest common extension, and on a second Tab
//! within the double-tab span asks for the candidates to be listed.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use crate::io::Terminal;
use crate::shell::parser::{escape, parse_command};

/// Completion source: `(tokens, index)` to candidates for `tokens[index]`.
pub type CompletionHandler = dyn Fn(&[String], usize) -> Vec<CompletionOption>;

/// Prints the candidate list on double-tab.
pub type PrintOptionsHandler = dyn FnMut(&mut dyn Terminal, &[CompletionOption]) -> io::Result<()>;

/// One completion candidate.
///
/// The replacement is always the full final text for the argument, never the
/// missing part. A partial candidate does not get a trailing space when it is
/// the only match, so completion can continue (e.g. directory paths).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOption {
    replacement: String,
    label: Option<String>,
    partial: bool,
}

impl CompletionOption {
    /// A complete candidate.
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            label: None,
            partial: false,
        }
    }

    /// A candidate that may be extended further after insertion.
    pub fn partial(replacement: impl Into<String>) -> Self {
        Self {
            partial: true,
            ..Self::new(replacement)
        }
    }

    /// Use a different text when listing this candidate.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Full text of the argument once completed.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Text shown in candidate lists. Defaults to the replacement.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.replacement)
    }

    /// True if completion may continue after this candidate.
    pub fn is_partial(&self) -> bool {
        self.partial
    }
}

impl fmt::Display for CompletionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keep the candidates whose replacement starts with `prefix`.
pub fn filter_options(options: Vec<CompletionOption>, prefix: &str) -> Vec<CompletionOption> {
    options
        .into_iter()
        .filter(|option| option.replacement.starts_with(prefix))
        .collect()
}

/// Longest common prefix of all replacements.
///
/// Always ends on a char boundary. Empty for an empty slice.
pub fn longest_common_prefix(options: &[CompletionOption]) -> &str {
    let Some((first, rest)) = options.split_first() else {
        return "";
    };

    let first = first.replacement.as_str();
    let mut end = first.len();

    for option in rest {
        let other = option.replacement.as_str();
        let common = first
            .char_indices()
            .zip(other.chars())
            .find(|((_, a), b)| a != b)
            .map(|((i, _), _)| i)
            .unwrap_or_else(|| first.len().min(other.len()));
        end = end.min(common);
    }

    &first[..end]
}

/// Tokens to complete for a partially typed command.
///
/// A trailing separator (or an empty line) yields a synthetic empty token, so
/// the last token is always the one being completed.
///
/// ```
/// use cmdline_env::shell::completion::completion_tokens;
///
/// assert_eq!(completion_tokens("git st"), ["git", "st"]);
/// assert_eq!(completion_tokens("git "), ["git", ""]);
/// assert_eq!(completion_tokens(""), [""]);
/// ```
pub fn completion_tokens(text: &str) -> Vec<String> {
    let (mut tokens, _) = parse_command(text);

    // A trailing sentinel character starts a new token only if the line ends in a
    // separator, which excludes escaped and quoted spaces.
    let (extended, _) = parse_command(&format!("{text}x"));
    if extended.len() > tokens.len() {
        tokens.push(String::new());
    }

    tokens
}

/// Completion source offering a fixed set of values.
pub fn one_of<I, S>(values: I) -> impl Fn(&[String], usize) -> Vec<CompletionOption> + 'static
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    move |_, _| values.iter().map(CompletionOption::new).collect()
}

/// Completion source delegating each argument position to its own source.
///
/// `per_position[0]` completes the first argument after the command name.
/// Positions past the end of the list have no candidates.
pub fn fixed_args(
    per_position: Vec<Box<CompletionHandler>>,
) -> impl Fn(&[String], usize) -> Vec<CompletionOption> + 'static {
    move |tokens, index| {
        index
            .checked_sub(1)
            .and_then(|arg| per_position.get(arg))
            .map(|source| source(tokens, index))
            .unwrap_or_default()
    }
}

/// Outcome of one Tab press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    /// Append this (already escaped) text to the line
    Insert(String),

    /// Double-tab: list these candidates, sorted by label
    List(Vec<CompletionOption>),

    /// Nothing to do
    Unchanged,
}

/// Double-tab aware completion state.
///
/// Holds the time of the last Tab press that left the line unchanged. A
/// second press within `span` of it lists the candidates instead.
#[derive(Debug, Clone)]
pub struct TabCompleter {
    last_tab_press: Option<Instant>,
    span: Duration,
}

impl TabCompleter {
    /// Create a completer with the given double-tab span.
    pub fn new(span: Duration) -> Self {
        Self {
            last_tab_press: None,
            span,
        }
    }

    /// Double-tab span.
    pub fn span(&self) -> Duration {
        self.span
    }

    /// Forget the last Tab press.
    pub fn reset(&mut self) {
        self.last_tab_press = None;
    }

    /// Decide what a Tab press at `now` does.
    ///
    /// `prefix` is the unescaped text of the token being completed.
    pub fn complete(
        &mut self,
        options: Vec<CompletionOption>,
        prefix: &str,
        now: Instant,
    ) -> TabAction {
        let mut options = filter_options(options, prefix);

        if options.is_empty() {
            log::trace!("no completion for {prefix:?}");
            self.last_tab_press = Some(now);
            return TabAction::Unchanged;
        }

        let double_tab = self
            .last_tab_press
            .is_some_and(|last| now.saturating_duration_since(last) < self.span);
        if double_tab {
            options.sort_by(|a, b| a.label().cmp(b.label()));
            self.last_tab_press = None;
            return TabAction::List(options);
        }

        let insert = if let [option] = options.as_slice() {
            let suffix = &option.replacement[prefix.len()..];
            if suffix.is_empty() {
                String::new()
            } else if option.partial {
                escape(suffix)
            } else {
                let mut text = escape(suffix);
                text.push(' ');
                text
            }
        } else {
            let common = longest_common_prefix(&options);
            escape(common.get(prefix.len()..).unwrap_or(""))
        };

        if insert.is_empty() {
            log::trace!("{} candidates for {prefix:?}, nothing to insert", options.len());
            self.last_tab_press = Some(now);
            TabAction::Unchanged
        } else {
            TabAction::Insert(insert)
        }
    }
}
