//! CLI help output specs.
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn gantry_no_args_shows_usage() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn gantry_help_shows_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("open")
        .stdout_has("launch")
        .stdout_has("job");
}

#[test]
fn gantry_launch_help_shows_options() {
    cli()
        .args(&["launch", "--help"])
        .passes()
        .stdout_has("--dev-tool")
        .stdout_has("--file-path")
        .stdout_has("--server");
}

#[test]
fn gantry_job_help_shows_status() {
    cli().args(&["job", "--help"]).passes().stdout_has("status");
}

#[test]
fn gantry_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
