// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup resolution: one auth round-trip decides the bootstrap state.
//!
//! Import links carry their parameters in the URL fragment so they never
//! reach the server. The fragment is consumed exactly once, its parameters
//! are persisted as breadcrumbs, and the auth result is classified into the
//! bootstrap machine's first transition.

use gantry_adapters::{BackendAdapter, ServerInfo, SessionStore};
use gantry_core::{
    BootstrapEvent, BootstrapMachine, BootstrapState, DevTool, RepositoryRef, ServerId,
    ServerSession, StoreEntry,
};

/// Message shown when the startup call fails without any detail.
pub const GENERIC_FETCH_ERROR: &str = "There was a problem fetching your data.";

/// Auto-import parameters carried in a URL fragment.
///
/// `#autoImport=true&serverId=…&devtool=…&filePath=…`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashParams {
    pub auto_import: bool,
    pub server_id: Option<String>,
    pub dev_tool: Option<String>,
    pub file_path: Option<String>,
}

impl HashParams {
    /// Parse a fragment (with or without the leading `#`).
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut params = HashParams::default();
        for pair in fragment.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };
            match key {
                "autoImport" => params.auto_import = value == "true",
                "serverId" if !value.is_empty() => params.server_id = Some(value.to_string()),
                "devtool" if !value.is_empty() => params.dev_tool = Some(value.to_string()),
                "filePath" if !value.is_empty() => params.file_path = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    /// Persist the breadcrumbs the workflow reads, including across the
    /// reload a successful launch triggers.
    pub fn persist<S: SessionStore>(&self, store: &S, pathname: &str) {
        if !self.auto_import {
            return;
        }
        let entries = [
            (StoreEntry::AutoImport, Some("true".to_string())),
            (StoreEntry::DevTool, Some(self.dev_tool.clone().unwrap_or_else(|| {
                DevTool::None.stored().to_string()
            }))),
            (StoreEntry::Route, Some(pathname.to_string())),
            (StoreEntry::ServerId, self.server_id.clone()),
            (StoreEntry::FilePath, self.file_path.clone()),
        ];
        for (entry, value) in entries {
            let Some(value) = value else { continue };
            if let Err(error) = store.set(&entry, &value) {
                tracing::warn!(entry = %entry, %error, "failed to persist import breadcrumb");
            }
        }
    }
}

/// What startup resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupOutcome {
    pub state: BootstrapState,
    pub available_servers: Vec<ServerInfo>,
    /// The authenticated server, when the backend reported one.
    pub current_server: Option<ServerInfo>,
    /// Repository the auto-import targets, when entering `Importing`.
    pub repository: Option<RepositoryRef>,
    pub errors: Vec<String>,
}

/// Resolve auth and server state once and classify the result.
pub async fn resolve_startup<B, S>(
    backend: &B,
    store: &S,
    fragment: &str,
    pathname: &str,
) -> StartupOutcome
where
    B: BackendAdapter,
    S: SessionStore,
{
    let params = HashParams::parse(fragment);
    params.persist(store, pathname);

    let mut machine = BootstrapMachine::new();
    match backend.resolve_auth().await {
        Ok(auth) if auth.is_logged_in => {
            let armed = matches!(
                store.get(&StoreEntry::AutoImport),
                Ok(Some(ref flag)) if flag == "true"
            );
            let repository = RepositoryRef::from_path(pathname);
            if armed && repository.is_some() {
                machine.transition(BootstrapEvent::Importing);
                StartupOutcome {
                    state: machine.state(),
                    available_servers: auth.available_servers,
                    current_server: auth.current_server,
                    repository,
                    errors: Vec::new(),
                }
            } else {
                machine.transition(BootstrapEvent::LoggedIn);
                StartupOutcome {
                    state: machine.state(),
                    available_servers: auth.available_servers,
                    current_server: auth.current_server,
                    repository: None,
                    errors: Vec::new(),
                }
            }
        }
        Ok(auth) => {
            machine.transition(BootstrapEvent::LoggedOut);
            StartupOutcome {
                state: machine.state(),
                available_servers: auth.available_servers,
                current_server: auth.current_server,
                repository: None,
                errors: Vec::new(),
            }
        }
        Err(failure) if !failure.available_servers.is_empty() => {
            // The user can still pick a server and log in.
            machine.transition(BootstrapEvent::LoggedOut);
            StartupOutcome {
                state: machine.state(),
                available_servers: failure.available_servers,
                current_server: None,
                repository: None,
                errors: failure.messages,
            }
        }
        Err(failure) => {
            machine.transition(BootstrapEvent::Error);
            let errors = if failure.messages.is_empty() {
                vec![GENERIC_FETCH_ERROR.to_string()]
            } else {
                failure.messages
            };
            StartupOutcome {
                state: machine.state(),
                available_servers: Vec::new(),
                current_server: None,
                repository: None,
                errors,
            }
        }
    }
}

/// Read the session the workflow was armed with. Storage read failures are
/// logged and treated as absent values.
pub fn load_session<S: SessionStore>(store: &S) -> ServerSession {
    let read = |entry: StoreEntry| match store.get(&entry) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(entry = %entry, %error, "failed to read session entry");
            None
        }
    };
    ServerSession {
        server_id: read(StoreEntry::ServerId).map(ServerId::from_string),
        dev_tool: DevTool::from_stored(read(StoreEntry::DevTool).as_deref()),
        file_path: read(StoreEntry::FilePath),
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
