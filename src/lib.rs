//! # cmdline-env
//!
//! Embeddable interactive command-line environment.
//!
//! **Key features:**
//! - **Shell-like input** - Quoting, escaping and multi-line continuation
//! - **History** - Bounded in-memory recall with up/down arrows
//! - **Tab completion** - Unique and common-prefix insertion, double-tab listing
//! - **Panic-safe dispatch** - Command panics become errors instead of aborting the session
//! - **Flexible I/O** - Key-level [`Terminal`] trait, or raw characters through [`CharIo`]
//!
//! The library never touches a real terminal. Everything runs against the
//! [`Terminal`] trait, so sessions can be driven by scripted keys in tests.
//!
//! ## Quick start
//!
//! ```no_run
//! use cmdline_env::{Command, Environment, Terminal};
//! # fn run<T: Terminal>(terminal: T) -> cmdline_env::Result<()> {
//! let mut env = Environment::new(terminal);
//! env.register_command(Command::parameterless("hello", |term, args| {
//!     term.write_line(&format!("Hello {}", args.join(" ")))?;
//!     Ok(())
//! }));
//! env.register_command(Command::exit("exit"));
//! env.run()
//! # }
//! ```
//!
//! Diagnostics go through the [`log`] facade; the library never installs a
//! logger itself.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod io;
pub mod shell;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Terminal I/O
pub use io::{CharIo, CharTerminal, Key, KeySession, Terminal};

// Configuration
pub use config::{DefaultConfig, MinimalConfig, ShellConfig};

// Error types
pub use error::{CliError, Result};

// Tokenizer
pub use shell::parser::{command_string, escape, needs_quote, parse_command, quote};

// Shell types
pub use shell::{
    Command, CommandHistory, CompletionOption, Environment, KeyDecoder, LineHistory, LineReader,
    ReadCommandOptions,
};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
