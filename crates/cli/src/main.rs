// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gantry: import, build, and launch data-science repositories from the
//! command line.

mod cli;
mod commands;
mod exit_error;
mod output;
mod render;

use clap::Parser;
use exit_error::ExitError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    if let Err(error) = commands::dispatch(cli).await {
        match error.downcast_ref::<ExitError>() {
            Some(exit) => {
                eprintln!("{}", exit.message);
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("error: {error:#}");
                std::process::exit(1);
            }
        }
    }
}
