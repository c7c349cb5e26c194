//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use cmdline_env::{Environment, LineReader, ReadCommandOptions, Result};
use fixtures::{MockTerminal, sample_commands};

// ============================================================================
// Setup Helpers
// ============================================================================

/// Route `log` output through the test harness (`RUST_LOG=debug` to see it).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Environment over a terminal typing `input`, with the sample commands registered.
pub fn create_test_env(input: &str) -> Environment<MockTerminal> {
    init_logging();
    let mut env = Environment::new(MockTerminal::typing(input));
    for command in sample_commands() {
        env.register_command(command);
    }
    env
}

/// Run the environment until the script is exhausted or a command exits.
///
/// Returns the run result and the captured output.
pub fn run_script(env: &mut Environment<MockTerminal>) -> (Result<()>, String) {
    let result = env.run();
    let output = env.terminal_mut().take_output();
    (result, output)
}

/// Read one command with a fresh reader and no hooks.
pub fn read_plain(input: &str) -> (Result<Vec<String>>, MockTerminal) {
    let mut term = MockTerminal::typing(input);
    let result = LineReader::new().read_command(&mut term, "t", &mut ReadCommandOptions::default());
    (result, term)
}

/// Owned tokens from string slices.
pub fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains an escape or control sequence.
pub fn assert_contains_ansi(output: &str, sequence: &str) {
    assert!(
        output.contains(sequence),
        "Expected sequence '{}' in output, got: {:?}",
        sequence.escape_default(),
        output
    );
}

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for exp in expected {
        assert!(
            output.contains(exp),
            "Expected '{}' in output, got: {:?}",
            exp,
            output
        );
    }
}

/// Assert that output does NOT contain any of the strings.
pub fn assert_contains_none(output: &str, forbidden: &[&str]) {
    for forbid in forbidden {
        assert!(
            !output.contains(forbid),
            "Did not expect '{}' in output, got: {:?}",
            forbid,
            output
        );
    }
}

/// Assert that `first` appears before `second` in the output.
pub fn assert_in_order(output: &str, first: &str, second: &str) {
    let a = output
        .find(first)
        .unwrap_or_else(|| panic!("'{first}' missing from {output:?}"));
    let b = output
        .find(second)
        .unwrap_or_else(|| panic!("'{second}' missing from {output:?}"));
    assert!(a < b, "expected '{first}' before '{second}' in {output:?}");
}
