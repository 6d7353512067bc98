// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live workflow rendering: a progress bar driven by parsed job feedback.

use gantry_core::{clean_feedback, parse_progress};
use gantry_engine::{WorkflowEvent, WorkflowState};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Renders workflow events as a single spinner/bar line.
pub struct ProgressRenderer {
    bar: ProgressBar,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {percent:>3}% {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Fold one workflow event into the display.
    pub fn apply(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::StateChanged { state, .. } => {
                if let Some(step) = state.header_step() {
                    self.bar.println(format!("==> {step}"));
                }
                if matches!(state, WorkflowState::Done(_)) {
                    self.bar.set_position(100);
                }
            }
            WorkflowEvent::FeedbackChanged { feedback, .. } => {
                let cleaned = clean_feedback(feedback);
                let report = parse_progress(&cleaned);
                if let Some(percent) = report.percent {
                    self.bar.set_position(u64::from(percent.min(100)));
                }
                if let Some(line) = last_line(&cleaned) {
                    self.bar.set_message(line.to_string());
                }
            }
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The most recent non-empty line of a feedback log.
fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
