// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gantry launch <owner>/<name>`: explicit (non-link) entry into the
//! acquisition workflow.

use super::workflow::run_workflow;
use crate::exit_error::ExitError;
use gantry_adapters::{BackendAdapter, FileStore, HttpBackend, SessionStore};
use gantry_core::{RepositoryRef, StoreEntry};

pub async fn run(
    server: &str,
    slug: &str,
    dev_tool: &str,
    file_path: Option<&str>,
) -> anyhow::Result<()> {
    let repo = RepositoryRef::from_slug(slug)
        .ok_or_else(|| ExitError::usage(format!("expected owner/name, got '{slug}'")))?;

    let backend = HttpBackend::new(server);
    let auth = backend
        .resolve_auth()
        .await
        .map_err(|e| ExitError::failure(format!("cannot reach server: {e}")))?;
    if !auth.is_logged_in {
        return Err(ExitError::failure("not logged in; log in to the server first").into());
    }
    let current = auth
        .current_server
        .ok_or_else(|| ExitError::failure("server did not report its identity"))?;

    // Seed the same breadcrumbs an import link would have left, so the
    // workflow (and any resumed reload) reads one consistent session.
    let store = FileStore::open_default()?;
    store.set(&StoreEntry::DevTool, dev_tool)?;
    store.set(&StoreEntry::ServerId, current.server_id.as_str())?;
    store.set(&StoreEntry::Route, &repo.page_path())?;
    match file_path {
        Some(file_path) => store.set(&StoreEntry::FilePath, file_path)?,
        None => store.remove(&StoreEntry::FilePath)?,
    }

    run_workflow(backend, store, repo, &current).await
}
