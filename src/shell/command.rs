//! Registered commands.
//!
//! A [`Command`] is a name plus two capabilities: completing its arguments
//! and executing. Build one with [`Command::exit`], [`Command::parameterless`]
//! or [`Command::custom`].

use std::fmt;

use crate::error::{CliError, Result};
use crate::io::Terminal;
use crate::shell::completion::{CompletionHandler, CompletionOption};

/// Command body. Receives the terminal and the arguments after the name.
///
/// Returning [`CliError::Exit`] stops [`Environment::run`](crate::Environment::run)
/// gracefully.
pub type ExecFn = dyn FnMut(&mut dyn Terminal, &[String]) -> Result<()>;

/// Named invokable command.
///
/// A command body only gets the terminal, never the environment. To let a
/// command change policy at runtime, share state with the hook that reads it:
///
/// ```
/// use cmdline_env::{Command, Environment, Terminal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// fn install<T: Terminal>(env: &mut Environment<T>) {
///     let strict = Rc::new(Cell::new(false));
///
///     let flag = Rc::clone(&strict);
///     env.register_command(Command::parameterless("strict", move |_, _| {
///         flag.set(!flag.get());
///         Ok(())
///     }));
///
///     env.set_error_handler(move |term, _, _, err| {
///         if strict.get() {
///             return Err(err);
///         }
///         term.write_line(&format!("ERROR: {err}"))?;
///         Ok(())
///     });
/// }
/// ```
pub struct Command {
    name: String,
    completion: Option<Box<CompletionHandler>>,
    exec: Box<ExecFn>,
}

impl Command {
    /// Command that ends the run loop.
    pub fn exit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completion: None,
            exec: Box::new(|_, _| Err(CliError::Exit)),
        }
    }

    /// Command without argument completion.
    ///
    /// The handler still receives whatever arguments were typed.
    pub fn parameterless<F>(name: impl Into<String>, exec: F) -> Self
    where
        F: FnMut(&mut dyn Terminal, &[String]) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            completion: None,
            exec: Box::new(exec),
        }
    }

    /// Command with its own argument completion.
    ///
    /// ```
    /// use cmdline_env::Command;
    /// use cmdline_env::shell::completion::one_of;
    ///
    /// let cmd = Command::custom("color", one_of(["red", "green"]), |term, args| {
    ///     term.write_line(&args.join(","))?;
    ///     Ok(())
    /// });
    /// let tokens = ["color".to_string(), String::new()];
    /// assert_eq!(cmd.completion_options(&tokens, 1).len(), 2);
    /// ```
    pub fn custom<C, F>(name: impl Into<String>, completion: C, exec: F) -> Self
    where
        C: Fn(&[String], usize) -> Vec<CompletionOption> + 'static,
        F: FnMut(&mut dyn Terminal, &[String]) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            completion: Some(Box::new(completion)),
            exec: Box::new(exec),
        }
    }

    /// Name as typed on the command line.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the command completes its own arguments.
    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Candidates for `tokens[index]`; `tokens[0]` is the command name.
    pub fn completion_options(&self, tokens: &[String], index: usize) -> Vec<CompletionOption> {
        match &self.completion {
            Some(completion) => completion(tokens, index),
            None => Vec::new(),
        }
    }

    /// Run the command body.
    pub fn exec(&mut self, terminal: &mut dyn Terminal, args: &[String]) -> Result<()> {
        (self.exec)(terminal, args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("completion", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}
