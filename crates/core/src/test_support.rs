// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures and proptest strategies.

/// Proptest strategies for feedback-log content.
pub mod strategies {
    use proptest::prelude::*;

    /// A line of log noise that can never match the `Step a/b` pattern
    /// (no digits, no slashes).
    pub fn noise_line() -> impl Strategy<Value = String> {
        "[a-zA-Z .:-]{0,32}"
    }

    /// A valid progress token with a non-zero divisor.
    pub fn step_token() -> impl Strategy<Value = (u32, u32, String)> {
        (0u32..=64, 1u32..=64).prop_map(|(step, total)| {
            (step, total, format!("Step {}/{}", step, total))
        })
    }

    /// Raw feedback that may carry terminal control characters.
    pub fn raw_terminal_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just("\u{8}".to_string()),
                Just("\r".to_string()),
                Just("\r\n".to_string()),
                Just("\n".to_string()),
                "[a-z]{1,6}",
            ],
            0..24,
        )
        .prop_map(|parts| parts.concat())
    }
}
