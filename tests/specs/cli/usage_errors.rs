//! Argument-validation specs
//!
//! Verify argument parsing failures never touch the network.

use crate::prelude::*;

#[test]
fn launch_rejects_a_bare_name() {
    cli()
        .args(&["launch", "quickstart"])
        .fails_with(2)
        .stderr_has("expected owner/name");
}

#[test]
fn launch_rejects_nested_slugs() {
    cli().args(&["launch", "a/b/c"]).fails_with(2).stderr_has("expected owner/name");
}

#[test]
fn open_rejects_links_without_a_path() {
    cli()
        .args(&["open", "https://host.test#autoImport=true"])
        .fails_with(2)
        .stderr_has("no path");
}

#[test]
fn job_status_requires_a_key() {
    cli().args(&["job", "status"]).fails_with(2).stderr_has("Usage:");
}
