// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress extraction and display cleanup for job feedback logs.
//!
//! Feedback is an accumulating log stream; build tools emit progress lines of
//! the literal shape `Step <a>/<b>`. Earlier matches may reference unrelated
//! sub-steps, so the most recent line wins. The same text can also carry
//! terminal control characters (backspace erasures, carriage returns) that
//! must be collapsed before it reaches any display surface. Both functions
//! here are pure and idempotent, and tolerate being composed in either order.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Step ([0-9]+)/([0-9]+)").expect("constant regex pattern is valid")
});

// A visible character immediately followed by a backspace erases both.
// Backspaces never erase each other and never cross line boundaries, so
// stacked erasures collapse pair by pair down to a fixpoint.
#[allow(clippy::expect_used)]
static ERASED_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^\n\u{8}]\u{8}").expect("constant regex pattern is valid"));

// A lone carriage return drops everything on the current line before it.
#[allow(clippy::expect_used)]
static CR_OVERWRITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n|^)[^\n]*\r").expect("constant regex pattern is valid"));

/// Progress extracted from a feedback log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressReport {
    /// Rounded percentage from the most recent `Step a/b` line, when any.
    pub percent: Option<u32>,
    /// True only once the displayed percentage numerically equals 100.
    pub is_complete: bool,
}

/// Extract the latest build progress from an accumulating feedback log.
///
/// All `Step a/b` tokens are located and the last one wins; the percentage is
/// `round((a / b) * 100)`. A log with no token, or a token with a zero
/// divisor, reports no percentage.
pub fn parse_progress(feedback: &str) -> ProgressReport {
    let Some(caps) = STEP_PATTERN.captures_iter(feedback).last() else {
        return ProgressReport::default();
    };
    let step: f64 = caps.get(1).map(|m| m.as_str()).unwrap_or("0").parse().unwrap_or(0.0);
    let total: f64 = caps.get(2).map(|m| m.as_str()).unwrap_or("0").parse().unwrap_or(0.0);
    if total == 0.0 {
        return ProgressReport::default();
    }
    let percent = ((step / total) * 100.0).round() as u32;
    ProgressReport { percent: Some(percent), is_complete: percent == 100 }
}

/// Collapse terminal control sequences in raw feedback for display.
///
/// Erasure pairs are removed to a fixpoint so the result is stable under
/// repeated application; `\r\n` is a plain newline; a lone `\r` erases back
/// to the most recent line start.
pub fn clean_feedback(raw: &str) -> String {
    let mut text = raw.to_string();
    while ERASED_CHAR.is_match(&text) {
        text = ERASED_CHAR.replace_all(&text, "").into_owned();
    }
    let text = text.replace("\r\n", "\n");
    CR_OVERWRITE.replace_all(&text, "$1").into_owned()
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
