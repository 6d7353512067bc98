//! Workspace integration specs driving the compiled `gantry` binary.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/help.rs"]
mod cli_help;

#[path = "specs/cli/usage_errors.rs"]
mod cli_usage_errors;
