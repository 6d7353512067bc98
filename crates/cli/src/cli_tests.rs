// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[test]
fn open_takes_a_link() {
    let cli = Cli::try_parse_from(["gantry", "open", "https://host/projects/a/b#autoImport=true"])
        .unwrap();
    match cli.command {
        Command::Open { link } => assert!(link.contains("autoImport=true")),
        other => panic!("expected open, got {other:?}"),
    }
}

#[test]
fn launch_defaults_to_jupyterlab() {
    let cli = Cli::try_parse_from(["gantry", "launch", "alice/quickstart"]).unwrap();
    match cli.command {
        Command::Launch { slug, dev_tool, file_path } => {
            assert_eq!(slug, "alice/quickstart");
            assert_eq!(dev_tool, "jupyterlab");
            assert_eq!(file_path, None);
        }
        other => panic!("expected launch, got {other:?}"),
    }
}

#[test]
fn launch_accepts_tool_and_file_path() {
    let cli = Cli::try_parse_from([
        "gantry",
        "launch",
        "alice/quickstart",
        "--dev-tool",
        "rstudio",
        "--file-path",
        "notebooks",
    ])
    .unwrap();
    match cli.command {
        Command::Launch { dev_tool, file_path, .. } => {
            assert_eq!(dev_tool, "rstudio");
            assert_eq!(file_path.as_deref(), Some("notebooks"));
        }
        other => panic!("expected launch, got {other:?}"),
    }
}

#[test]
fn server_flag_is_global() {
    let cli = Cli::try_parse_from([
        "gantry",
        "job",
        "status",
        "rq:job:x",
        "--server",
        "http://example.test",
    ])
    .unwrap();
    assert_eq!(cli.server, "http://example.test");
}

#[test]
fn job_status_parses_format() {
    let cli =
        Cli::try_parse_from(["gantry", "job", "status", "rq:job:x", "--format", "json"]).unwrap();
    match cli.command {
        Command::Job { command: JobCommand::Status { key, format } } => {
            assert_eq!(key, "rq:job:x");
            assert_eq!(format, crate::output::OutputFormat::Json);
        }
        other => panic!("expected job status, got {other:?}"),
    }
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["gantry"]).is_err());
}
