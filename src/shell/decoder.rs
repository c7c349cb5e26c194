//! Key decoder for terminal character sequences.
//!
//! Provides the state machine that turns raw terminal characters into
//! [`Key`] events: ANSI escape sequences (arrows, Home/End/Delete),
//! double-ESC, Ctrl+C and the usual control characters.
//!
//! This is a pure decoder - it doesn't manage buffers or I/O.

use crate::io::Key;

/// Decoder state for escape sequence handling.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecoderState {
    /// Normal input mode
    Normal,

    /// Saw first ESC character
    EscapeStart,

    /// Saw ESC [ (start of escape sequence)
    EscapeSequence,

    /// Saw ESC [ followed by a numeric parameter (e.g. ESC [ 3 ~)
    EscapeParameter(u8),

    /// Multi-digit or modified parameter (e.g. ESC [ 1 5 ~, ESC [ 3 ; 5 ~),
    /// skipped up to its final character
    EscapeIgnored,
}

/// Terminal key decoder.
///
/// Decodes raw terminal characters into keys. A lone ESC only starts a
/// sequence; pressing ESC twice yields [`Key::Escape`]. A line feed directly
/// following a carriage return is swallowed so CR LF terminals produce a
/// single [`Key::Enter`].
#[derive(Debug)]
pub struct KeyDecoder {
    state: DecoderState,
    last_was_cr: bool,
}

impl KeyDecoder {
    /// Create new decoder in Normal state.
    pub fn new() -> Self {
        Self {
            state: DecoderState::Normal,
            last_was_cr: false,
        }
    }

    /// Decode a single character.
    ///
    /// Returns `None` while an escape sequence is still being accumulated or
    /// when the character carries no key meaning.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_env::{Key, KeyDecoder};
    ///
    /// let mut decoder = KeyDecoder::new();
    /// assert_eq!(decoder.decode_char('h'), Some(Key::Char('h')));
    ///
    /// // Up arrow (ESC [ A)
    /// assert_eq!(decoder.decode_char('\x1b'), None);
    /// assert_eq!(decoder.decode_char('['), None);
    /// assert_eq!(decoder.decode_char('A'), Some(Key::Up));
    /// ```
    pub fn decode_char(&mut self, c: char) -> Option<Key> {
        let after_cr = core::mem::replace(&mut self.last_was_cr, false);

        match self.state {
            DecoderState::Normal => self.decode_normal(c, after_cr),
            DecoderState::EscapeStart => self.decode_escape_start(c),
            DecoderState::EscapeSequence => self.decode_escape_sequence(c),
            DecoderState::EscapeParameter(param) => self.decode_escape_parameter(param, c),
            DecoderState::EscapeIgnored => self.skip_escape_parameters(c),
        }
    }

    fn decode_normal(&mut self, c: char, after_cr: bool) -> Option<Key> {
        match c {
            '\x1b' => {
                self.state = DecoderState::EscapeStart;
                None
            }

            '\r' => {
                self.last_was_cr = true;
                Some(Key::Enter)
            }

            // LF of a CR LF pair
            '\n' if after_cr => None,

            '\n' => Some(Key::Enter),

            '\t' => Some(Key::Tab),

            // ASCII BS (0x08) or DEL (0x7F)
            '\x08' | '\x7f' => Some(Key::Backspace),

            '\x03' => Some(Key::Interrupt),

            ' ' => Some(Key::Space),

            c if c.is_control() => None,

            _ => Some(Key::Char(c)),
        }
    }

    fn decode_escape_start(&mut self, c: char) -> Option<Key> {
        match c {
            '\x1b' => {
                self.state = DecoderState::Normal;
                Some(Key::Escape)
            }

            '[' => {
                self.state = DecoderState::EscapeSequence;
                None
            }

            // ESC followed by a non-sequence character - keep the character
            _ => {
                self.state = DecoderState::Normal;
                self.decode_normal(c, false)
            }
        }
    }

    fn decode_escape_sequence(&mut self, c: char) -> Option<Key> {
        self.state = DecoderState::Normal;

        match c {
            'A' => Some(Key::Up),
            'B' => Some(Key::Down),
            'C' => Some(Key::Right),
            'D' => Some(Key::Left),
            'H' => Some(Key::Home),
            'F' => Some(Key::End),
            '0'..='9' => {
                self.state = DecoderState::EscapeParameter(c as u8 - b'0');
                None
            }
            _ => None,
        }
    }

    fn decode_escape_parameter(&mut self, param: u8, c: char) -> Option<Key> {
        match c {
            '~' => {
                self.state = DecoderState::Normal;
                match param {
                    1 | 7 => Some(Key::Home),
                    3 => Some(Key::Delete),
                    4 | 8 => Some(Key::End),
                    _ => None,
                }
            }
            // F5 and up, or a key with modifiers: not mapped
            '0'..='9' | ';' => {
                self.state = DecoderState::EscapeIgnored;
                None
            }
            _ => {
                self.state = DecoderState::Normal;
                None
            }
        }
    }

    fn skip_escape_parameters(&mut self, c: char) -> Option<Key> {
        if !matches!(c, '0'..='9' | ';') {
            self.state = DecoderState::Normal;
        }
        None
    }

    /// Drop any partial escape sequence.
    ///
    /// A pending CR is remembered, so the LF of a CR LF pair that arrives
    /// with the next read is still swallowed.
    pub fn reset(&mut self) {
        self.state = DecoderState::Normal;
    }

    /// Current decoder state.
    pub fn state(&self) -> DecoderState {
        self.state
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut KeyDecoder, input: &str) -> Vec<Key> {
        input.chars().filter_map(|c| decoder.decode_char(c)).collect()
    }

    // ========================================
    // Basic Decoder State Tests
    // ========================================

    #[test]
    fn test_decoder_new() {
        let decoder = KeyDecoder::new();
        assert_eq!(decoder.state(), DecoderState::Normal);
    }

    #[test]
    fn test_decoder_reset() {
        let mut decoder = KeyDecoder::default();
        decoder.decode_char('\x1b');
        assert_eq!(decoder.state(), DecoderState::EscapeStart);
        decoder.reset();
        assert_eq!(decoder.state(), DecoderState::Normal);
    }

    #[test]
    fn test_reset_keeps_pending_cr() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode_char('\r'), Some(Key::Enter));
        decoder.reset();
        assert_eq!(decoder.decode_char('\n'), None);
        assert_eq!(decoder.decode_char('\n'), Some(Key::Enter));
    }

    // ========================================
    // Regular Character Decoding
    // ========================================

    #[test]
    fn test_regular_and_unicode_characters() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(decoder.decode_char('h'), Some(Key::Char('h')));
        assert_eq!(decoder.decode_char('ø'), Some(Key::Char('ø')));
        assert_eq!(decoder.decode_char(' '), Some(Key::Space));
    }

    // ========================================
    // Special Key Tests
    // ========================================

    #[test]
    fn test_special_keys() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(decoder.decode_char('\n'), Some(Key::Enter));
        assert_eq!(decoder.decode_char('\t'), Some(Key::Tab));
        assert_eq!(decoder.decode_char('\x08'), Some(Key::Backspace));
        assert_eq!(decoder.decode_char('\x7f'), Some(Key::Backspace));
        assert_eq!(decoder.decode_char('\x03'), Some(Key::Interrupt));
    }

    #[test]
    fn test_crlf_is_single_enter() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(
            decode_all(&mut decoder, "a\r\nb\n\n"),
            vec![Key::Char('a'), Key::Enter, Key::Char('b'), Key::Enter, Key::Enter]
        );
    }

    #[test]
    fn test_control_characters_ignored() {
        let mut decoder = KeyDecoder::new();

        for c in ['\x00', '\x01', '\x02', '\x04', '\x05', '\x06', '\x07'] {
            assert_eq!(decoder.decode_char(c), None);
        }
    }

    // ========================================
    // Escape Sequence Tests
    // ========================================

    #[test]
    fn test_double_esc() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(decoder.decode_char('\x1b'), None);
        assert_eq!(decoder.decode_char('\x1b'), Some(Key::Escape));
        assert_eq!(decoder.state(), DecoderState::Normal);
    }

    #[test]
    fn test_arrow_keys() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(
            decode_all(&mut decoder, "\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![Key::Up, Key::Down, Key::Right, Key::Left]
        );
    }

    #[test]
    fn test_home_end_delete() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(
            decode_all(&mut decoder, "\x1b[H\x1b[F\x1b[1~\x1b[3~\x1b[4~"),
            vec![Key::Home, Key::End, Key::Home, Key::Delete, Key::End]
        );
    }

    #[test]
    fn test_long_and_modified_parameters_are_dropped() {
        let mut decoder = KeyDecoder::new();

        // F5, F8, Ctrl+Delete, Ctrl+Right
        assert!(decode_all(&mut decoder, "\x1b[15~\x1b[19~\x1b[3;5~\x1b[1;5C").is_empty());
        assert_eq!(decoder.state(), DecoderState::Normal);

        assert_eq!(
            decode_all(&mut decoder, "\x1b[3;5~x\x1b[3~"),
            vec![Key::Char('x'), Key::Delete]
        );
    }

    #[test]
    fn test_unknown_escape_sequence() {
        let mut decoder = KeyDecoder::new();

        assert!(decode_all(&mut decoder, "\x1b[X").is_empty());
        assert_eq!(decoder.state(), DecoderState::Normal);

        assert!(decode_all(&mut decoder, "\x1b[5~").is_empty());
        assert_eq!(decoder.state(), DecoderState::Normal);
    }

    #[test]
    fn test_esc_followed_by_regular_char() {
        let mut decoder = KeyDecoder::new();

        decoder.decode_char('\x1b');
        assert_eq!(decoder.decode_char('a'), Some(Key::Char('a')));
        assert_eq!(decoder.state(), DecoderState::Normal);
    }

    #[test]
    fn test_double_esc_then_type() {
        let mut decoder = KeyDecoder::new();

        assert_eq!(
            decode_all(&mut decoder, "\x1b\x1bnew"),
            vec![Key::Escape, Key::Char('n'), Key::Char('e'), Key::Char('w')]
        );
    }
}
