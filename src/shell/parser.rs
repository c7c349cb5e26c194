//! Command line tokenizer and serializer.
//!
//! [`parse_command`] splits a raw line into arguments honoring backslash
//! escapes, single quotes and double quotes. [`command_string`] is its inverse
//! for display (history recall). [`escape`] is the stricter transform used
//! when completion text is inserted into a line being edited.

use std::borrow::Cow;

/// Quoting mode of the tokenizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    Plain,
    SingleQuote,
    DoubleQuote,
}

/// Parse a command line into its arguments.
///
/// Returns the tokens and whether the input is complete. Input is incomplete
/// when an escape, a single quote or a double quote is still open at the end;
/// callers should then read another line and parse the concatenation again.
///
/// - Outside quotes a backslash takes the next character literally.
/// - Inside single quotes everything up to the closing quote is literal.
/// - Inside double quotes only `\\`, `\$` and `\"` are escapes; for any other
///   character the backslash is kept.
/// - Spaces separate tokens; empty tokens are never produced.
///
/// # Examples
///
/// ```
/// use cmdline_env::parse_command;
///
/// let (tokens, complete) = parse_command(r#"echo "hello world" it\'s"#);
/// assert_eq!(tokens, ["echo", "hello world", "it's"]);
/// assert!(complete);
///
/// let (_, complete) = parse_command("echo 'abc");
/// assert!(!complete);
/// ```
pub fn parse_command(input: &str) -> (Vec<String>, bool) {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut mode = Mode::Plain;
    let mut escape = false;

    for c in input.chars() {
        match mode {
            Mode::SingleQuote => {
                if c == '\'' {
                    mode = Mode::Plain;
                } else {
                    current.push(c);
                }
            }

            Mode::DoubleQuote => {
                if escape {
                    // Only \\, \$ and \" consume the backslash
                    if !matches!(c, '\\' | '$' | '"') {
                        current.push('\\');
                    }
                    current.push(c);
                    escape = false;
                } else {
                    match c {
                        '"' => mode = Mode::Plain,
                        '\\' => escape = true,
                        _ => current.push(c),
                    }
                }
            }

            Mode::Plain if escape => {
                current.push(c);
                escape = false;
            }

            Mode::Plain => match c {
                '\\' => escape = true,
                '\'' => mode = Mode::SingleQuote,
                '"' => mode = Mode::DoubleQuote,
                ' ' => {
                    if !current.is_empty() {
                        tokens.push(core::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    (tokens, !escape && mode == Mode::Plain)
}

/// Serialize tokens back into a single command line.
///
/// Tokens are joined by single spaces and passed through [`quote`].
pub fn command_string<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut line = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&quote(token.as_ref()));
    }
    line
}

/// Quote a token if it contains a space.
///
/// The quoted form is wrapped in double quotes with `\` and `"` escaped.
/// Tokens without spaces are returned unchanged, even when they contain
/// quote characters.
pub fn quote(token: &str) -> Cow<'_, str> {
    if !needs_quote(token) {
        return Cow::Borrowed(token);
    }

    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('"');
    for c in token.chars() {
        if matches!(c, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// True when [`quote`] would wrap the token.
pub fn needs_quote(token: &str) -> bool {
    token.contains(' ')
}

/// Escape every character [`parse_command`] treats specially.
///
/// Backslash, both quote characters, space, CR and LF are prefixed with a
/// backslash so the text survives re-tokenization unchanged.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '\'' | ' ' | '\n' | '\r') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
