// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend adapter: the remote mutations and queries the orchestrator
//! consumes.
//!
//! The backend only offers fire-and-forget job submission plus a polling
//! status endpoint; everything here returns quickly and long-running work is
//! tracked through [`JobKey`]s.

use async_trait::async_trait;
use gantry_core::{JobDescriptor, JobKey, RepositoryRef, RepositorySnapshot, ServerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod http;

pub use http::HttpBackend;

/// Errors from backend operations.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend rejected the mutation or query.
    #[error("backend rejected request: {0}")]
    Rejected(String),
    /// The request never produced a usable response.
    #[error("backend transport failed: {0}")]
    Transport(String),
    /// The response arrived but could not be decoded.
    #[error("backend response malformed: {0}")]
    Malformed(String),
}

/// Options for an image build submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    pub no_cache: bool,
}

/// Result of starting a dev tool: the path the tool is served under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DevToolStarted {
    pub path: String,
}

/// A backend server the user could authenticate against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub server_id: ServerId,
    pub name: String,
    pub base_url: String,
}

/// Resolved authentication and server state at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub is_logged_in: bool,
    pub available_servers: Vec<ServerInfo>,
    pub current_server: Option<ServerInfo>,
}

/// Startup auth resolution failure.
///
/// A rejection that still names available servers means the user simply has
/// to pick one and log in; a bare rejection is a genuine error.
#[derive(Debug, Clone, Error)]
#[error("auth resolution failed: {}", .messages.join("; "))]
pub struct AuthResolveError {
    pub available_servers: Vec<ServerInfo>,
    pub messages: Vec<String>,
}

/// Adapter over the backend's mutation/query surface.
#[async_trait]
pub trait BackendAdapter: Clone + Send + Sync + 'static {
    /// Submit a remote import. Returns the key of the queued job.
    async fn import_remote_repository(
        &self,
        repo: &RepositoryRef,
        remote_url: &str,
    ) -> Result<JobKey, BackendError>;

    /// Submit an image build. `None` means the image is already fresh and
    /// no job was queued.
    async fn build_image(
        &self,
        repo: &RepositoryRef,
        options: BuildOptions,
    ) -> Result<Option<JobKey>, BackendError>;

    /// Start the repository's container.
    async fn start_container(&self, repo: &RepositoryRef) -> Result<(), BackendError>;

    /// Start a dev tool inside the running container.
    async fn start_dev_tool(
        &self,
        repo: &RepositoryRef,
        tool: &str,
    ) -> Result<DevToolStarted, BackendError>;

    /// Fetch the current status of a background job.
    async fn job_status(&self, key: &JobKey) -> Result<JobDescriptor, BackendError>;

    /// Whether the repository exists locally, and its environment state.
    async fn repository_exists(
        &self,
        repo: &RepositoryRef,
    ) -> Result<Option<RepositorySnapshot>, BackendError>;

    /// Resolve authentication and server state once at startup.
    async fn resolve_auth(&self) -> Result<AuthSnapshot, AuthResolveError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{
        AuthResolveError, AuthSnapshot, BackendAdapter, BackendError, BuildOptions, DevToolStarted,
        ServerInfo,
    };
    use async_trait::async_trait;
    use gantry_core::{JobDescriptor, JobKey, RepositoryRef, RepositorySnapshot, ServerId};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    /// Recorded backend operation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum BackendCall {
        Import { repo: RepositoryRef, remote_url: String },
        BuildImage { repo: RepositoryRef, no_cache: bool },
        StartContainer { repo: RepositoryRef },
        StartDevTool { repo: RepositoryRef, tool: String },
        JobStatus { key: JobKey },
        RepositoryExists { repo: RepositoryRef },
        ResolveAuth,
    }

    struct FakeBackendState {
        calls: Vec<BackendCall>,
        snapshot: Option<RepositorySnapshot>,
        import_result: Result<JobKey, String>,
        build_result: Result<Option<JobKey>, String>,
        container_result: Result<(), String>,
        dev_tool_result: Result<DevToolStarted, String>,
        statuses: HashMap<JobKey, VecDeque<JobDescriptor>>,
        auth_result: Result<AuthSnapshot, AuthResolveError>,
    }

    /// Scripted backend for tests: replays configured responses and records
    /// every call.
    #[derive(Clone)]
    pub struct FakeBackend {
        inner: Arc<Mutex<FakeBackendState>>,
    }

    impl FakeBackend {
        /// A logged-in backend bound to the given server id, with successful
        /// defaults for every mutation.
        pub fn logged_in(server_id: &str) -> Self {
            let server = ServerInfo {
                server_id: ServerId::from_string(server_id),
                name: "test server".to_string(),
                base_url: "https://hub.test/".to_string(),
            };
            Self {
                inner: Arc::new(Mutex::new(FakeBackendState {
                    calls: Vec::new(),
                    snapshot: None,
                    import_result: Ok(JobKey::from_string("rq:job:import")),
                    build_result: Ok(Some(JobKey::from_string("rq:job:build"))),
                    container_result: Ok(()),
                    dev_tool_result: Ok(DevToolStarted { path: "/lab/tree/code".to_string() }),
                    statuses: HashMap::new(),
                    auth_result: Ok(AuthSnapshot {
                        is_logged_in: true,
                        available_servers: vec![server.clone()],
                        current_server: Some(server),
                    }),
                })),
            }
        }

        pub fn new() -> Self {
            Self::logged_in("srv-test")
        }

        /// All recorded calls, in order.
        pub fn calls(&self) -> Vec<BackendCall> {
            self.inner.lock().calls.clone()
        }

        /// Number of recorded calls matching the given predicate.
        pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
            self.inner.lock().calls.iter().filter(|c| pred(c)).count()
        }

        pub fn set_snapshot(&self, snapshot: Option<RepositorySnapshot>) {
            self.inner.lock().snapshot = snapshot;
        }

        pub fn set_import_job(&self, key: &str) {
            self.inner.lock().import_result = Ok(JobKey::from_string(key));
        }

        pub fn fail_import(&self, message: &str) {
            self.inner.lock().import_result = Err(message.to_string());
        }

        pub fn set_build_job(&self, key: &str) {
            self.inner.lock().build_result = Ok(Some(JobKey::from_string(key)));
        }

        pub fn set_build_already_fresh(&self) {
            self.inner.lock().build_result = Ok(None);
        }

        pub fn fail_build(&self, message: &str) {
            self.inner.lock().build_result = Err(message.to_string());
        }

        pub fn fail_container(&self, message: &str) {
            self.inner.lock().container_result = Err(message.to_string());
        }

        pub fn set_dev_tool_path(&self, path: &str) {
            self.inner.lock().dev_tool_result = Ok(DevToolStarted { path: path.to_string() });
        }

        pub fn fail_dev_tool(&self, message: &str) {
            self.inner.lock().dev_tool_result = Err(message.to_string());
        }

        /// Append a status snapshot to the given job's script. The final
        /// snapshot repeats once the script is exhausted.
        pub fn push_status(&self, key: &str, descriptor: JobDescriptor) {
            self.inner
                .lock()
                .statuses
                .entry(JobKey::from_string(key))
                .or_default()
                .push_back(descriptor);
        }

        pub fn set_auth(&self, auth: AuthSnapshot) {
            self.inner.lock().auth_result = Ok(auth);
        }

        pub fn fail_auth(&self, available_servers: Vec<ServerInfo>, messages: Vec<String>) {
            self.inner.lock().auth_result = Err(AuthResolveError { available_servers, messages });
        }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    fn rejected(message: &str) -> BackendError {
        BackendError::Rejected(message.to_string())
    }

    #[async_trait]
    impl BackendAdapter for FakeBackend {
        async fn import_remote_repository(
            &self,
            repo: &RepositoryRef,
            remote_url: &str,
        ) -> Result<JobKey, BackendError> {
            let mut state = self.inner.lock();
            state.calls.push(BackendCall::Import {
                repo: repo.clone(),
                remote_url: remote_url.to_string(),
            });
            state.import_result.clone().map_err(|m| rejected(&m))
        }

        async fn build_image(
            &self,
            repo: &RepositoryRef,
            options: BuildOptions,
        ) -> Result<Option<JobKey>, BackendError> {
            let mut state = self.inner.lock();
            state
                .calls
                .push(BackendCall::BuildImage { repo: repo.clone(), no_cache: options.no_cache });
            state.build_result.clone().map_err(|m| rejected(&m))
        }

        async fn start_container(&self, repo: &RepositoryRef) -> Result<(), BackendError> {
            let mut state = self.inner.lock();
            state.calls.push(BackendCall::StartContainer { repo: repo.clone() });
            state.container_result.clone().map_err(|m| rejected(&m))
        }

        async fn start_dev_tool(
            &self,
            repo: &RepositoryRef,
            tool: &str,
        ) -> Result<DevToolStarted, BackendError> {
            let mut state = self.inner.lock();
            state
                .calls
                .push(BackendCall::StartDevTool { repo: repo.clone(), tool: tool.to_string() });
            state.dev_tool_result.clone().map_err(|m| rejected(&m))
        }

        async fn job_status(&self, key: &JobKey) -> Result<JobDescriptor, BackendError> {
            let mut state = self.inner.lock();
            state.calls.push(BackendCall::JobStatus { key: key.clone() });
            let queue = state
                .statuses
                .get_mut(key)
                .ok_or_else(|| rejected(&format!("unknown job key: {key}")))?;
            if queue.len() > 1 {
                queue.pop_front().ok_or_else(|| rejected("status script exhausted"))
            } else {
                queue.front().cloned().ok_or_else(|| rejected("status script exhausted"))
            }
        }

        async fn repository_exists(
            &self,
            repo: &RepositoryRef,
        ) -> Result<Option<RepositorySnapshot>, BackendError> {
            let mut state = self.inner.lock();
            state.calls.push(BackendCall::RepositoryExists { repo: repo.clone() });
            Ok(state.snapshot.clone())
        }

        async fn resolve_auth(&self) -> Result<AuthSnapshot, AuthResolveError> {
            let mut state = self.inner.lock();
            state.calls.push(BackendCall::ResolveAuth);
            state.auth_result.clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{BackendCall, FakeBackend};

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
