//! Error types for command reading and dispatch.
//!
//! The `CliError` enum covers every condition surfaced by the line reader and
//! the command environment, including the `Exit` sentinel used to leave the
//! run loop gracefully.

use std::any::Any;
use std::io;

/// CLI error type.
///
/// `Exit` is not a failure: commands return it to stop
/// [`Environment::run`](crate::Environment::run) without an error.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The user aborted the current read (Ctrl+C)
    #[error("Ctrl+C")]
    Interrupted,

    /// No command with this name is registered and no fallback handler is set
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// A command handler panicked and the panic was recovered
    ///
    /// `message` is the payload rendered as text; `payload` is the value the
    /// handler panicked with, unchanged.
    #[error("{message}")]
    CommandPanicked {
        /// Panic message, or a placeholder for non-string payloads
        message: String,
        /// Original panic payload
        payload: Box<dyn Any + Send>,
    },

    /// Sentinel asking the run loop to stop gracefully
    #[error("exit application")]
    Exit,

    /// Command executed but reported failure
    #[error("{0}")]
    CommandFailed(String),

    /// Key source or output sink failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Shorthand for a [`CliError::CommandFailed`] with the given message.
    pub fn failed(msg: impl Into<String>) -> Self {
        CliError::CommandFailed(msg.into())
    }

    /// True for the [`CliError::Exit`] sentinel.
    pub fn is_exit(&self) -> bool {
        matches!(self, CliError::Exit)
    }

    /// True for a recovered command panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, CliError::CommandPanicked { .. })
    }

    /// Message of a recovered command panic.
    pub fn panic_message(&self) -> Option<&str> {
        match self {
            CliError::CommandPanicked { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Payload of a recovered command panic, for downcasting.
    pub fn panic_payload(&self) -> Option<&(dyn Any + Send)> {
        match self {
            CliError::CommandPanicked { payload, .. } => Some(payload.as_ref()),
            _ => None,
        }
    }

    /// Take the payload of a recovered command panic.
    ///
    /// Pass it to [`std::panic::resume_unwind`] to continue unwinding with the
    /// original value.
    pub fn into_panic_payload(self) -> Option<Box<dyn Any + Send>> {
        match self {
            CliError::CommandPanicked { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Build a [`CliError::CommandPanicked`] from a `catch_unwind` payload.
    ///
    /// `panic!` payloads are either `&'static str` or `String` and give the
    /// message; anything else is reported with a placeholder message. The
    /// payload itself is kept either way.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "command panicked with a non-string payload".to_string()
        };
        CliError::CommandPanicked { message, payload }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CliError>;
