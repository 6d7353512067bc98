// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON output helpers.

use clap::ValueEnum;
use gantry_core::{clean_feedback, JobDescriptor};
use gantry_engine::Interstitial;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a job descriptor in the chosen format.
pub fn print_job_status(descriptor: &JobDescriptor, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("job:    {}", descriptor.key);
            println!("status: {}", descriptor.status);
            if let Some(method) = descriptor.method() {
                println!("method: {}", method);
            }
            if let Some(failure) = &descriptor.failure_message {
                println!("failure: {}", failure);
            }
            let feedback = clean_feedback(descriptor.feedback());
            if !feedback.is_empty() {
                println!("\n{}", feedback);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(descriptor)?);
        }
    }
    Ok(())
}

/// Print a terminal interstitial with its recovery hint.
pub fn print_interstitial(interstitial: &Interstitial, message: Option<&str>, route: Option<&str>) {
    eprintln!("{}", interstitial.header);
    eprintln!("  {}", interstitial.body);
    if let Some(message) = message {
        eprintln!("  {}", message);
    }
    eprintln!("  {}", interstitial.sub);
    match route {
        Some(route) => eprintln!("  → {}: {}", interstitial.button, route),
        None => eprintln!("  → {}", interstitial.button),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
