//! Command environment: registry, dispatch and the read-eval loop.
//!
//! The `Environment` struct brings the line reader, command history and
//! completion together with a set of named commands and the policy hooks that
//! decide what happens with unknown commands, failures and panics.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use crate::config::{DefaultConfig, ShellConfig};
use crate::error::{CliError, Result};
use crate::io::Terminal;

// Sub-modules
pub mod command;
pub mod completion;
pub mod decoder;
pub mod history;
pub mod parser;
pub mod printer;
pub mod reader;

// Re-export key types
pub use command::{Command, ExecFn};
pub use completion::{CompletionHandler, CompletionOption, PrintOptionsHandler};
pub use decoder::{DecoderState, KeyDecoder};
pub use history::{CommandHistory, History, LineHistory};
pub use reader::{LineReader, ReadCommandOptions};

/// Produces the prompt shown before each command.
pub type PromptHandler = dyn Fn() -> String;

/// Called for commands that are not registered: `(terminal, name, args)`.
pub type ExecUnknownCommandHandler = dyn FnMut(&mut dyn Terminal, &str, &[String]) -> Result<()>;

/// Called when a command fails: `(terminal, name, args, error)`.
///
/// `Ok(())` marks the error as handled and the run loop continues. An `Err`
/// stops [`Environment::run`] with that error, except [`CliError::Exit`],
/// which stops it gracefully.
pub type CommandErrorHandler =
    dyn FnMut(&mut dyn Terminal, &str, &[String], CliError) -> Result<()>;

/// Interactive command environment.
///
/// Generic over:
/// - `T`: the [`Terminal`] keys are read from and output is written to
/// - `C`: [`ShellConfig`] providing history size, double-tab span and listing limits
///
/// # Example
///
/// ```
/// use cmdline_env::{CharIo, CharTerminal, Command, Environment};
/// use std::collections::VecDeque;
/// use std::io;
///
/// struct Script(VecDeque<char>, String);
///
/// impl CharIo for Script {
///     fn read_char(&mut self) -> io::Result<Option<char>> {
///         Ok(self.0.pop_front())
///     }
///     fn put_char(&mut self, c: char) -> io::Result<()> {
///         self.1.push(c);
///         Ok(())
///     }
/// }
///
/// let script = Script("hello\rexit\r".chars().collect(), String::new());
/// let mut env = Environment::new(CharTerminal::new(script));
/// env.register_command(Command::parameterless("hello", |term, _| {
///     term.write_line("Hello, world!")?;
///     Ok(())
/// }));
/// env.register_command(Command::exit("exit"));
///
/// env.run().unwrap();
/// assert!(env.terminal().io().1.contains("Hello, world!"));
/// ```
pub struct Environment<T: Terminal, C: ShellConfig = DefaultConfig> {
    terminal: T,

    reader: LineReader,

    history: CommandHistory,

    /// Registered commands by name
    commands: HashMap<String, Command>,

    prompt: Option<Box<PromptHandler>>,

    print_options: Option<Box<PrintOptionsHandler>>,

    exec_unknown: Option<Box<ExecUnknownCommandHandler>>,

    complete_unknown: Option<Box<CompletionHandler>>,

    error_handler: Option<Box<CommandErrorHandler>>,

    recover_panicked_commands: bool,

    use_command_name_completion: bool,

    _config: PhantomData<C>,
}

impl<T: Terminal, C: ShellConfig> fmt::Debug for Environment<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("commands", &self.command_names())
            .field("history_len", &self.history.len())
            .field("recover_panicked_commands", &self.recover_panicked_commands)
            .field("use_command_name_completion", &self.use_command_name_completion)
            .finish_non_exhaustive()
    }
}

impl<T: Terminal> Environment<T, DefaultConfig> {
    /// Create an environment with the default configuration.
    pub fn new(terminal: T) -> Self {
        Self::with_config(terminal)
    }
}

impl<T: Terminal, C: ShellConfig> Environment<T, C> {
    /// Create an environment using the capacities and defaults of `C`.
    ///
    /// Installs the default hooks: a static prompt of `C::DEFAULT_PROMPT`, a
    /// list printer that asks before printing more than
    /// `C::MAX_AUTO_PRINT_OPTIONS` candidates, an unknown command handler
    /// printing `Unknown command "<name>"` and an error handler printing
    /// `PANIC: ...` or `ERROR: ...` and continuing.
    pub fn with_config(terminal: T) -> Self {
        let mut env = Self {
            terminal,
            reader: LineReader::with_double_tab_span(C::DOUBLE_TAB_SPAN),
            history: CommandHistory::new(C::HISTORY_SIZE),
            commands: HashMap::new(),
            prompt: None,
            print_options: None,
            exec_unknown: None,
            complete_unknown: None,
            error_handler: None,
            recover_panicked_commands: true,
            use_command_name_completion: true,
            _config: PhantomData,
        };

        env.set_static_prompt(C::DEFAULT_PROMPT);
        env.set_options_printer(printer::default_options_printer(
            C::MAX_AUTO_PRINT_OPTIONS,
            C::LIST_WIDTH,
        ));
        env.set_unknown_command_handler(|term, name, _| {
            term.write_line(&format!("Unknown command {name:?}"))?;
            Ok(())
        });
        env.set_error_handler(|term, _, _, err| {
            if err.is_panic() {
                term.write_line(&format!("PANIC: {err}"))?;
            } else {
                term.write_line(&format!("ERROR: {err}"))?;
            }
            Ok(())
        });

        env
    }

    // ========================================
    // Commands
    // ========================================

    /// Add a command, replacing any command with the same name.
    pub fn register_command(&mut self, command: Command) {
        log::debug!("registering command {:?}", command.name());
        self.commands.insert(command.name().to_string(), command);
    }

    /// Remove a command. Returns whether it was registered.
    pub fn unregister_command(&mut self, name: &str) -> bool {
        let existed = self.commands.remove(name).is_some();
        if existed {
            log::debug!("unregistered command {name:?}");
        }
        existed
    }

    /// Names of all registered commands, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // ========================================
    // Read / execute
    // ========================================

    /// Read one command using the environment's prompt, history and completion.
    ///
    /// Commands with a non-empty name are added to the history.
    pub fn read_command(&mut self) -> Result<Vec<String>> {
        let prompt = self.prompt();

        let history = &self.history;
        let recall = move |index: usize| history.entry(index).cloned();

        let commands = &self.commands;
        let complete_unknown = self.complete_unknown.as_deref();
        let use_names = self.use_command_name_completion;
        let complete = move |tokens: &[String], index: usize| {
            completion_options(commands, complete_unknown, use_names, tokens, index)
        };

        let mut opts = ReadCommandOptions {
            history: Some(&recall),
            completion: Some(&complete),
            printer: self.print_options.as_deref_mut(),
        };

        let cmd = self
            .reader
            .read_command(&mut self.terminal, &prompt, &mut opts)?;

        if cmd.first().is_some_and(|name| !name.is_empty()) {
            log::debug!("history: {}", parser::command_string(&cmd));
            self.history.put(cmd.clone());
        }

        Ok(cmd)
    }

    /// Execute a command as if it had been typed.
    ///
    /// Unregistered names go to the unknown command handler, or fail with
    /// [`CliError::UnknownCommand`] if there is none. With panic recovery
    /// enabled, a panicking handler yields [`CliError::CommandPanicked`].
    pub fn exec_command(&mut self, name: &str, args: &[String]) -> Result<()> {
        log::debug!("exec {name:?} with {} argument(s)", args.len());

        let terminal: &mut dyn Terminal = &mut self.terminal;
        let commands = &mut self.commands;
        let exec_unknown = &mut self.exec_unknown;

        let mut call = || match commands.get_mut(name) {
            Some(command) => command.exec(terminal, args),
            None => match exec_unknown {
                Some(handler) => handler(terminal, name, args),
                None => Err(CliError::UnknownCommand(name.to_string())),
            },
        };

        if !self.recover_panicked_commands {
            return call();
        }

        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(result) => result,
            Err(payload) => {
                let err = CliError::from_panic(payload);
                log::warn!("command {name:?} panicked: {err}");
                Err(err)
            }
        }
    }

    /// Read and execute commands until a command asks to exit or an error
    /// is not handled.
    ///
    /// # Errors
    ///
    /// Read failures (including [`CliError::Interrupted`]) are returned
    /// directly. Command errors go to the error handler first; without one,
    /// any command error ends the loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let cmd = self.read_command()?;
            let Some((name, args)) = cmd.split_first() else {
                continue;
            };

            let err = match self.exec_command(name, args) {
                Ok(()) => continue,
                Err(CliError::Exit) => {
                    log::debug!("exit requested by {name:?}");
                    return Ok(());
                }
                Err(err) => err,
            };

            let Some(handler) = self.error_handler.as_mut() else {
                return Err(err);
            };

            match handler(&mut self.terminal, name, args, err) {
                Ok(()) => {}
                Err(CliError::Exit) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    /// Completion candidates for `tokens[index]` as offered on Tab.
    ///
    /// Index 0 completes command names (if enabled). Other positions ask the
    /// named command, or the unknown command completion for unknown names.
    pub fn completion_options(&self, tokens: &[String], index: usize) -> Vec<CompletionOption> {
        completion_options(
            &self.commands,
            self.complete_unknown.as_deref(),
            self.use_command_name_completion,
            tokens,
            index,
        )
    }

    // ========================================
    // Policy hooks
    // ========================================

    /// Current prompt text; empty without a prompt handler.
    pub fn prompt(&self) -> String {
        self.prompt.as_ref().map(|prompt| prompt()).unwrap_or_default()
    }

    /// Compute the prompt before every read.
    pub fn set_prompt<F>(&mut self, prompt: F)
    where
        F: Fn() -> String + 'static,
    {
        self.prompt = Some(Box::new(prompt));
    }

    /// Show a constant prompt.
    pub fn set_static_prompt(&mut self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.set_prompt(move || prompt.clone());
    }

    /// Remove the prompt handler.
    pub fn remove_prompt(&mut self) {
        self.prompt = None;
    }

    /// Printer used to list candidates on double-tab.
    pub fn set_options_printer<F>(&mut self, printer: F)
    where
        F: FnMut(&mut dyn Terminal, &[CompletionOption]) -> std::io::Result<()> + 'static,
    {
        self.print_options = Some(Box::new(printer));
    }

    /// Disable candidate listing on double-tab.
    pub fn remove_options_printer(&mut self) {
        self.print_options = None;
    }

    /// Handler for commands that are not registered.
    pub fn set_unknown_command_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut dyn Terminal, &str, &[String]) -> Result<()> + 'static,
    {
        self.exec_unknown = Some(Box::new(handler));
    }

    /// Make unknown commands fail with [`CliError::UnknownCommand`].
    pub fn remove_unknown_command_handler(&mut self) {
        self.exec_unknown = None;
    }

    /// Argument completion for commands that are not registered.
    pub fn set_unknown_command_completion<F>(&mut self, completion: F)
    where
        F: Fn(&[String], usize) -> Vec<CompletionOption> + 'static,
    {
        self.complete_unknown = Some(Box::new(completion));
    }

    /// Offer no argument completion for unknown commands.
    pub fn remove_unknown_command_completion(&mut self) {
        self.complete_unknown = None;
    }

    /// Handler deciding whether a command error ends [`run`](Self::run).
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut dyn Terminal, &str, &[String], CliError) -> Result<()> + 'static,
    {
        self.error_handler = Some(Box::new(handler));
    }

    /// Let every command error end [`run`](Self::run).
    pub fn remove_error_handler(&mut self) {
        self.error_handler = None;
    }

    /// Catch panics of command handlers (default: on).
    pub fn set_recover_panicked_commands(&mut self, recover: bool) {
        self.recover_panicked_commands = recover;
    }

    /// Whether command panics are caught.
    pub fn recover_panicked_commands(&self) -> bool {
        self.recover_panicked_commands
    }

    /// Complete command names at the first position (default: on).
    pub fn set_use_command_name_completion(&mut self, enabled: bool) {
        self.use_command_name_completion = enabled;
    }

    /// Whether command names are completed.
    pub fn use_command_name_completion(&self) -> bool {
        self.use_command_name_completion
    }

    // ========================================
    // Accessors
    // ========================================

    /// Command history, newest first.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Mutable command history, e.g. to preload or clear it.
    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    /// The terminal.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The terminal, mutably.
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Consume the environment and return its terminal.
    pub fn into_terminal(self) -> T {
        self.terminal
    }
}

fn completion_options(
    commands: &HashMap<String, Command>,
    complete_unknown: Option<&CompletionHandler>,
    use_command_names: bool,
    tokens: &[String],
    index: usize,
) -> Vec<CompletionOption> {
    if index == 0 {
        if !use_command_names {
            return Vec::new();
        }
        let mut names: Vec<CompletionOption> = commands.keys().map(CompletionOption::new).collect();
        names.sort_by(|a, b| a.replacement().cmp(b.replacement()));
        return names;
    }

    let Some(name) = tokens.first() else {
        return Vec::new();
    };

    match commands.get(name) {
        Some(command) => command.completion_options(tokens, index),
        None => complete_unknown
            .map(|complete| complete(tokens, index))
            .unwrap_or_default(),
    }
}
