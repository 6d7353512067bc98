// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch.

mod job;
mod launch;
mod open;
mod workflow;

use crate::cli::{Cli, Command, JobCommand};

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Open { link } => open::run(&cli.server, &link).await,
        Command::Launch { slug, dev_tool, file_path } => {
            launch::run(&cli.server, &slug, &dev_tool, file_path.as_deref()).await
        }
        Command::Job { command } => match command {
            JobCommand::Status { key, format } => job::status(&cli.server, &key, format).await,
        },
    }
}
