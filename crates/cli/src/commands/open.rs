// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gantry open <link>`: resolve an import link and run the workflow the
//! bootstrap machine selects.

use super::workflow::run_workflow;
use crate::exit_error::ExitError;
use gantry_adapters::{FileStore, HttpBackend};
use gantry_core::BootstrapState;
use gantry_engine::resolve_startup;

pub async fn run(server: &str, link: &str) -> anyhow::Result<()> {
    let (pathname, fragment) = split_link(link);
    if pathname.is_empty() {
        return Err(ExitError::usage("link carries no path; expected /projects/<owner>/<name>").into());
    }

    let backend = HttpBackend::new(server);
    let store = FileStore::open_default()?;
    let outcome = resolve_startup(&backend, &store, fragment, pathname).await;

    match outcome.state {
        BootstrapState::Importing => {
            let repo = outcome
                .repository
                .ok_or_else(|| ExitError::usage("link does not name a repository"))?;
            let current = outcome
                .current_server
                .ok_or_else(|| ExitError::failure("server did not report its identity"))?;
            run_workflow(backend, store, repo, &current).await
        }
        BootstrapState::LoggedIn => {
            println!("Logged in; nothing to import.");
            Ok(())
        }
        BootstrapState::LoggedOut => {
            eprintln!("Not logged in. Available servers:");
            for server in &outcome.available_servers {
                eprintln!("  {} ({})", server.name, server.server_id);
            }
            for message in &outcome.errors {
                eprintln!("  {message}");
            }
            Err(ExitError::failure("log in and retry the link").into())
        }
        BootstrapState::Error | BootstrapState::Loading => {
            Err(ExitError::failure(outcome.errors.join("; ")).into())
        }
    }
}

/// Split a share link into its pathname and fragment.
///
/// Accepts either a full URL or a bare `/path#fragment`.
fn split_link(link: &str) -> (&str, &str) {
    let (rest, fragment) = match link.split_once('#') {
        Some((rest, fragment)) => (rest, fragment),
        None => (link, ""),
    };
    let path = match rest.split_once("://") {
        Some((_, authority_and_path)) => match authority_and_path.find('/') {
            Some(index) => &authority_and_path[index..],
            None => "",
        },
        None => rest,
    };
    // Query strings never carry import parameters; drop them.
    let path = path.split_once('?').map(|(p, _)| p).unwrap_or(path);
    (path, fragment)
}

#[cfg(test)]
#[path = "open_tests.rs"]
mod tests;
