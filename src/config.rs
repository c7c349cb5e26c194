//! Configuration traits and implementations for environment defaults.
//!
//! The `ShellConfig` trait fixes history capacity, double-tab timing and
//! listing limits at compile time. Runtime policy (prompt, hooks, flags) is
//! configured on the [`Environment`](crate::Environment) itself.

use std::time::Duration;

/// Shell configuration trait defining capacities and timing.
///
/// All values are const. [`Environment`](crate::Environment) reads them once
/// at construction.
pub trait ShellConfig {
    /// Command history size (default: 100)
    const HISTORY_SIZE: usize;

    /// Maximum delay between two Tab presses to count as a double-tab (default: 250ms)
    const DOUBLE_TAB_SPAN: Duration;

    /// Completion lists longer than this ask for confirmation before printing (default: 100)
    const MAX_AUTO_PRINT_OPTIONS: usize;

    /// Prompt shown when no prompt handler is configured (default: "cle")
    const DEFAULT_PROMPT: &'static str;

    /// Terminal width used to lay out completion lists (default: 80)
    const LIST_WIDTH: usize;
}

/// Default configuration for interactive sessions.
///
/// - HISTORY_SIZE: 100 commands
/// - DOUBLE_TAB_SPAN: 250 ms
/// - MAX_AUTO_PRINT_OPTIONS: 100 options
/// - DEFAULT_PROMPT: "cle"
/// - LIST_WIDTH: 80 columns
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DefaultConfig;

impl ShellConfig for DefaultConfig {
    const HISTORY_SIZE: usize = 100;
    const DOUBLE_TAB_SPAN: Duration = Duration::from_millis(250);
    const MAX_AUTO_PRINT_OPTIONS: usize = 100;
    const DEFAULT_PROMPT: &'static str = "cle";
    const LIST_WIDTH: usize = 80;
}

/// Minimal configuration for small consoles.
///
/// - HISTORY_SIZE: 10 commands
/// - DOUBLE_TAB_SPAN: 250 ms
/// - MAX_AUTO_PRINT_OPTIONS: 20 options
/// - DEFAULT_PROMPT: ">"
/// - LIST_WIDTH: 40 columns
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MinimalConfig;

impl ShellConfig for MinimalConfig {
    const HISTORY_SIZE: usize = 10;
    const DOUBLE_TAB_SPAN: Duration = Duration::from_millis(250);
    const MAX_AUTO_PRINT_OPTIONS: usize = 20;
    const DEFAULT_PROMPT: &'static str = ">";
    const LIST_WIDTH: usize = 40;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(DefaultConfig::HISTORY_SIZE, 100);
        assert_eq!(DefaultConfig::DOUBLE_TAB_SPAN, Duration::from_millis(250));
        assert_eq!(DefaultConfig::MAX_AUTO_PRINT_OPTIONS, 100);
        assert_eq!(DefaultConfig::DEFAULT_PROMPT, "cle");
        assert_eq!(DefaultConfig::LIST_WIDTH, 80);
    }

    #[test]
    fn test_minimal_config() {
        assert_eq!(MinimalConfig::HISTORY_SIZE, 10);
        assert_eq!(MinimalConfig::DOUBLE_TAB_SPAN, Duration::from_millis(250));
        assert_eq!(MinimalConfig::MAX_AUTO_PRINT_OPTIONS, 20);
        assert_eq!(MinimalConfig::DEFAULT_PROMPT, ">");
        assert_eq!(MinimalConfig::LIST_WIDTH, 40);
    }
}
