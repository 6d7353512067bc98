// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three workflow steps, each wrapping one remote mutation.
//!
//! Steps are thin: they submit, poll where a job comes back, and report.
//! Phase decisions, storage writes, and state transitions stay in the
//! controller.

use crate::poller::{JobPoller, PollConfig, PollError};
use gantry_adapters::{
    BackendAdapter, BackendError, BuildOptions, LaunchOutcome, PopupAdapter, PopupError,
};
use gantry_core::{DevTool, JobDescriptor, JobKey, RepositoryRef};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from step execution.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error(transparent)]
    Popup(#[from] PopupError),
}

impl StepError {
    /// True when the step stopped because the caller cancelled it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StepError::Poll(PollError::Cancelled))
    }
}

/// Imports a remote repository into the local workspace.
pub struct ImportStep<B> {
    backend: B,
    poller: JobPoller<B>,
}

impl<B: BackendAdapter> ImportStep<B> {
    pub fn new(backend: B, poll: PollConfig) -> Self {
        let poller = JobPoller::new(backend.clone(), poll);
        Self { backend, poller }
    }

    /// Submit the import and poll its job to a terminal status.
    pub async fn execute<F>(
        &self,
        repo: &RepositoryRef,
        remote_url: &str,
        cancel: &CancellationToken,
        on_update: F,
    ) -> Result<JobDescriptor, StepError>
    where
        F: FnMut(&str) + Send,
    {
        let key = self.backend.import_remote_repository(repo, remote_url).await?;
        tracing::info!(repo = %repo, job_key = %key, "import job queued");
        Ok(self.poller.subscribe(&key, cancel, on_update).await?)
    }
}

/// What a build submission came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSubmission {
    /// The image is already fresh; no job was queued.
    AlreadyBuilt,
    /// A build job was queued under this key.
    Job(JobKey),
}

/// Builds the execution environment image.
pub struct BuildStep<B> {
    backend: B,
    poller: JobPoller<B>,
}

impl<B: BackendAdapter> BuildStep<B> {
    pub fn new(backend: B, poll: PollConfig) -> Self {
        let poller = JobPoller::new(backend.clone(), poll);
        Self { backend, poller }
    }

    /// Submit the build mutation. The caller persists the key before
    /// polling so a reload can resume it.
    pub async fn submit(&self, repo: &RepositoryRef) -> Result<BuildSubmission, StepError> {
        match self.backend.build_image(repo, BuildOptions { no_cache: false }).await? {
            Some(key) => Ok(BuildSubmission::Job(key)),
            None => Ok(BuildSubmission::AlreadyBuilt),
        }
    }

    /// Poll an already-submitted (or resumed) build job to terminal.
    pub async fn watch<F>(
        &self,
        key: &JobKey,
        cancel: &CancellationToken,
        on_update: F,
    ) -> Result<JobDescriptor, StepError>
    where
        F: FnMut(&str) + Send,
    {
        Ok(self.poller.subscribe(key, cancel, on_update).await?)
    }
}

/// Outcome of a launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAttempt {
    /// The tool's tab opened; the workflow can hand off.
    Opened { target: String },
    /// The host refused the tab; retryable without resubmitting mutations.
    Blocked { target: String },
}

/// Starts the container and the chosen dev tool.
pub struct LaunchStep<B, P> {
    backend: B,
    popup: P,
    /// Absolute prefix for tool paths returned by the backend.
    host_base: String,
}

impl<B: BackendAdapter, P: PopupAdapter> LaunchStep<B, P> {
    pub fn new(backend: B, popup: P, host_base: impl Into<String>) -> Self {
        Self { backend, popup, host_base: host_base.into() }
    }

    /// Start the repository's container. Run once per workflow; the popup
    /// retry path skips this.
    pub async fn start_container(&self, repo: &RepositoryRef) -> Result<(), StepError> {
        Ok(self.backend.start_container(repo).await?)
    }

    /// The launch action proper: start the dev tool and open its tab.
    pub async fn launch_tool(
        &self,
        repo: &RepositoryRef,
        tool: &DevTool,
        file_path: Option<&str>,
    ) -> Result<LaunchAttempt, StepError> {
        let started = self.backend.start_dev_tool(repo, tool.stored()).await?;
        let mut path = started.path;
        if let Some(file_path) = file_path {
            path = rewrite_tool_path(&path, file_path);
        }
        let target = format!("{}{}", self.host_base, path);
        match self.popup.open_tab(&target, &tool.tab_name(repo)).await? {
            LaunchOutcome::Opened => Ok(LaunchAttempt::Opened { target }),
            LaunchOutcome::Blocked => Ok(LaunchAttempt::Blocked { target }),
        }
    }

    /// Same-tab navigation for flows that skip the dev tool.
    pub async fn navigate(&self, path: &str) -> Result<(), StepError> {
        let target = format!("{}{}", self.host_base, path);
        Ok(self.popup.navigate(&target).await?)
    }
}

/// Point the tool's default tree at the requested file path.
///
/// Tools serve `/lab/tree/code` by default; when that segment is missing the
/// path is grafted directly under `/lab/tree/`.
fn rewrite_tool_path(path: &str, file_path: &str) -> String {
    if path.contains("/lab/tree/code") {
        path.replacen("/lab/tree/code", &format!("/lab/tree/{file_path}"), 1)
    } else {
        path.replacen("/lab/tree/", &format!("/lab/tree/{file_path}"), 1)
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
