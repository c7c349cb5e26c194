//! Terminal abstraction: key source and output sink.
//!
//! The line reader never talks to a real terminal. It consumes [`Key`] events
//! from a [`Terminal`] and writes redraw output back to it. Raw character
//! transports implement the smaller [`CharIo`] trait and are adapted with
//! [`CharTerminal`], which decodes ANSI sequences into keys.

use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};

use crate::shell::decoder::KeyDecoder;

/// A single logical key event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// Printable character
    Char(char),

    /// Space bar
    Space,

    /// Enter / Return
    Enter,

    /// Backspace (ASCII BS or DEL)
    Backspace,

    /// Escape (clears the current line)
    Escape,

    /// Tab (completion)
    Tab,

    /// Up arrow (older history entry)
    Up,

    /// Down arrow (newer history entry)
    Down,

    /// Left arrow
    Left,

    /// Right arrow
    Right,

    /// Home
    Home,

    /// End
    End,

    /// Delete
    Delete,

    /// Ctrl+C
    Interrupt,
}

/// Key source and output sink consumed by the line reader.
///
/// `begin_read_key`/`end_read_key` bracket a read session, e.g. to switch a
/// tty into raw mode. Use [`KeySession`] rather than calling them directly;
/// it guarantees the release on every exit path.
pub trait Terminal {
    /// Acquire the key source for a read session.
    fn begin_read_key(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Release the key source after a read session.
    fn end_read_key(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Block until the next key event is available.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Write raw text.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Write a single character.
    fn put_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }

    /// Write formatted text. Makes `write!` usable on any terminal.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&fmt::format(args)),
        }
    }

    /// Write text followed by a line break.
    fn write_line(&mut self, s: &str) -> io::Result<()> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn begin_read_key(&mut self) -> io::Result<()> {
        T::begin_read_key(self)
    }

    fn end_read_key(&mut self) -> io::Result<()> {
        T::end_read_key(self)
    }

    fn read_key(&mut self) -> io::Result<Key> {
        T::read_key(self)
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        T::write_str(self, s)
    }

    fn put_char(&mut self, c: char) -> io::Result<()> {
        T::put_char(self, c)
    }

    fn flush(&mut self) -> io::Result<()> {
        T::flush(self)
    }
}

/// Scoped key-source acquisition.
///
/// Calls `begin_read_key` on creation and `end_read_key` on drop. Derefs to
/// the wrapped terminal.
pub struct KeySession<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> KeySession<'a, T> {
    /// Acquire the key source of `terminal`.
    pub fn begin(terminal: &'a mut T) -> io::Result<Self> {
        terminal.begin_read_key()?;
        Ok(Self { terminal })
    }
}

impl<T: Terminal + ?Sized> fmt::Debug for KeySession<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySession").finish_non_exhaustive()
    }
}

impl<T: Terminal + ?Sized> Deref for KeySession<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> DerefMut for KeySession<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for KeySession<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.terminal.end_read_key() {
            log::warn!("failed to release key input: {err}");
        }
    }
}

/// Character-level I/O for byte/char oriented transports (UART, pipes, sockets).
pub trait CharIo {
    /// Blocking character read.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Write a single character.
    fn put_char(&mut self, c: char) -> io::Result<()>;

    /// Write a string.
    ///
    /// Default implementation uses `put_char()` repeatedly.
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for c in s.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts a [`CharIo`] transport into a [`Terminal`].
///
/// Incoming characters go through a [`KeyDecoder`]; end of input surfaces as
/// an `UnexpectedEof` error.
#[derive(Debug)]
pub struct CharTerminal<IO: CharIo> {
    io: IO,
    decoder: KeyDecoder,
}

impl<IO: CharIo> CharTerminal<IO> {
    /// Wrap a character transport.
    pub fn new(io: IO) -> Self {
        Self {
            io,
            decoder: KeyDecoder::new(),
        }
    }

    /// Borrow the underlying transport.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Mutably borrow the underlying transport.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Unwrap the underlying transport.
    pub fn into_inner(self) -> IO {
        self.io
    }
}

impl<IO: CharIo> Terminal for CharTerminal<IO> {
    fn begin_read_key(&mut self) -> io::Result<()> {
        self.decoder.reset();
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            let Some(c) = self.io.read_char()? else {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "end of key input",
                ));
            };
            if let Some(key) = self.decoder.decode_char(c) {
                return Ok(key);
            }
        }
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.io.write_str(s)
    }

    fn put_char(&mut self, c: char) -> io::Result<()> {
        self.io.put_char(c)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.io.flush()
    }
}
