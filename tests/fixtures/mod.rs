//! Test fixtures and utilities for cmdline-env testing.
//!
//! Provides:
//! - `MockTerminal`: Scripted key source with output capture
//! - `MockIo`: Character-level transport for `CharTerminal` tests
//! - `keys`: Typed text to key events
//! - `sample_commands`: A small command set with argument completion

#![allow(dead_code)]

use cmdline_env::shell::completion::{fixed_args, one_of};
use cmdline_env::{CharIo, CliError, Command, Key, Terminal};
use std::collections::VecDeque;
use std::io;

// ============================================================================
// Key scripting
// ============================================================================

/// Convert typed text into key events.
///
/// `\n` = Enter, `\t` = Tab, `\x08` = Backspace, `\x1b` = Escape,
/// `\x03` = Ctrl+C, space = Space, everything else is a printable key.
pub fn keys(text: &str) -> Vec<Key> {
    text.chars()
        .map(|c| match c {
            '\n' => Key::Enter,
            '\t' => Key::Tab,
            '\x08' => Key::Backspace,
            '\x1b' => Key::Escape,
            '\x03' => Key::Interrupt,
            ' ' => Key::Space,
            c => Key::Char(c),
        })
        .collect()
}

// ============================================================================
// MockTerminal - Test Terminal Implementation
// ============================================================================

/// Mock terminal for testing.
///
/// Serves scripted keys and captures all output. Running out of keys is an
/// `UnexpectedEof` error, which ends a run loop the way a closed input would.
#[derive(Debug, Default)]
pub struct MockTerminal {
    /// Scripted key events
    keys: VecDeque<Key>,

    /// Output capture
    output: String,

    /// Number of begin_read_key calls
    begins: usize,

    /// Number of end_read_key calls
    ends: usize,

    /// Set while a key session is active
    in_session: bool,

    /// Keys read outside a key session
    unguarded_reads: usize,
}

impl MockTerminal {
    /// Create a terminal without scripted keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a terminal that will "type" the given text.
    pub fn typing(text: &str) -> Self {
        Self::with_keys(keys(text))
    }

    /// Create a terminal with explicit key events.
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append typed text to the script.
    pub fn type_text(&mut self, text: &str) {
        self.keys.extend(keys(text));
    }

    /// Append a single key to the script.
    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Captured output.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Return and clear captured output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Keys not consumed yet.
    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    /// Number of key sessions opened.
    pub fn sessions(&self) -> usize {
        self.begins
    }

    /// Assert every scripted key was consumed inside balanced key sessions.
    pub fn assert_consumed(&self) {
        assert_eq!(self.keys.len(), 0, "unconsumed keys: {:?}", self.keys);
        self.assert_balanced();
    }

    /// Assert every begin_read_key was matched by end_read_key.
    pub fn assert_balanced(&self) {
        assert_eq!(
            self.begins, self.ends,
            "key sessions not balanced: {} begin vs {} end",
            self.begins, self.ends
        );
        assert_eq!(self.unguarded_reads, 0, "keys read outside a key session");
    }
}

impl Terminal for MockTerminal {
    fn begin_read_key(&mut self) -> io::Result<()> {
        assert!(!self.in_session, "nested key session");
        self.in_session = true;
        self.begins += 1;
        Ok(())
    }

    fn end_read_key(&mut self) -> io::Result<()> {
        self.in_session = false;
        self.ends += 1;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        if !self.in_session {
            self.unguarded_reads += 1;
        }
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.output.push_str(s);
        Ok(())
    }
}

// ============================================================================
// MockIo - Character transport
// ============================================================================

/// In-memory character transport.
#[derive(Debug, Default)]
pub struct MockIo {
    /// Input queue (simulates user typing)
    input: VecDeque<char>,

    /// Output capture
    output: String,
}

impl MockIo {
    /// Create MockIo with pre-loaded raw input.
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            output: String::new(),
        }
    }

    /// Captured output.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Check if input queue is empty.
    pub fn input_empty(&self) -> bool {
        self.input.is_empty()
    }
}

impl CharIo for MockIo {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.input.pop_front())
    }

    fn put_char(&mut self, c: char) -> io::Result<()> {
        self.output.push(c);
        Ok(())
    }
}

// ============================================================================
// Sample commands
// ============================================================================

/// Command set used across integration tests.
///
/// - `echo`: writes its arguments joined by `|`
/// - `status`, `start`, `stop`: write their own name
/// - `color`: completes `red`, `green`, `grey` at its first argument
/// - `fail`: returns `CommandFailed("failure requested")`
/// - `boom`: panics with "kaboom"
/// - `exit`: ends the run loop
pub fn sample_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::parameterless("echo", |term, args| {
            term.write_line(&args.join("|"))?;
            Ok(())
        }),
        Command::custom(
            "color",
            fixed_args(vec![Box::new(one_of(["red", "green", "grey"]))]),
            |term, args| {
                term.write_line(&format!("color={}", args.join(",")))?;
                Ok(())
            },
        ),
        Command::parameterless("fail", |_, _| Err(CliError::failed("failure requested"))),
        Command::parameterless("boom", |_, _| panic!("kaboom")),
        Command::exit("exit"),
    ];

    for name in ["status", "start", "stop"] {
        commands.push(Command::parameterless(name, move |term, _| {
            term.write_line(name)?;
            Ok(())
        }));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_mapping() {
        assert_eq!(
            keys("a b\t\x08\x1b\x03\n"),
            vec![
                Key::Char('a'),
                Key::Space,
                Key::Char('b'),
                Key::Tab,
                Key::Backspace,
                Key::Escape,
                Key::Interrupt,
                Key::Enter,
            ]
        );
    }

    #[test]
    fn test_mock_terminal_script() {
        let mut term = MockTerminal::typing("ab");
        term.begin_read_key().unwrap();
        assert_eq!(term.read_key().unwrap(), Key::Char('a'));
        assert_eq!(term.read_key().unwrap(), Key::Char('b'));
        assert!(term.read_key().is_err());
        term.end_read_key().unwrap();
        term.assert_consumed();
    }

    #[test]
    fn test_mock_terminal_output() {
        let mut term = MockTerminal::new();
        term.write_line("hello").unwrap();
        assert_eq!(term.take_output(), "hello\r\n");
        assert!(term.output().is_empty());
    }
}
