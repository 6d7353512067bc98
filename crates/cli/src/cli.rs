// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gantry",
    version,
    about = "Import, build, and launch data-science repositories"
)]
pub struct Cli {
    /// Backend server base URL
    #[arg(
        long,
        global = true,
        env = "GANTRY_SERVER",
        default_value = "http://localhost:10000"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve an import link and run the acquisition workflow
    Open {
        /// Share link carrying auto-import parameters in its fragment
        link: String,
    },
    /// Import, build, and launch a repository explicitly
    Launch {
        /// Repository as owner/name
        slug: String,
        /// Dev tool to launch once the environment is up
        #[arg(long, default_value = "jupyterlab")]
        dev_tool: String,
        /// File path to open inside the tool
        #[arg(long)]
        file_path: Option<String>,
    },
    /// Background job inspection
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// Show the current status of a background job
    Status {
        /// Opaque job key returned by a submission
        key: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
