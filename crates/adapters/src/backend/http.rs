// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of [`BackendAdapter`].
//!
//! Speaks plain JSON to the client server's API. Every operation is a single
//! round-trip; long-running work comes back as a job key to poll.

use super::{
    AuthResolveError, AuthSnapshot, BackendAdapter, BackendError, BuildOptions, DevToolStarted,
};
use async_trait::async_trait;
use gantry_core::{
    EnvironmentState, JobDescriptor, JobKey, JobMetadata, JobStatus, RepositoryRef,
    RepositorySnapshot,
};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend adapter over the client server's HTTP API.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Base URL this adapter talks to (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, BackendError> {
        let url = self.url(path);
        tracing::debug!(%url, "backend mutation");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Rejected(reject_message(status, &text)));
        }
        serde_json::from_str(&text).map_err(|e| BackendError::Malformed(e.to_string()))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Option<T>, BackendError> {
        let url = self.url(path);
        tracing::debug!(%url, "backend query");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        let text = response.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Rejected(reject_message(status, &text)));
        }
        serde_json::from_str(&text).map(Some).map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

fn reject_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    job_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildResponse {
    background_job_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusResponse {
    status: JobStatus,
    job_metadata: Option<String>,
    failure_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotResponse {
    size_bytes: u64,
    environment: EnvironmentState,
}

#[async_trait]
impl BackendAdapter for HttpBackend {
    async fn import_remote_repository(
        &self,
        repo: &RepositoryRef,
        remote_url: &str,
    ) -> Result<JobKey, BackendError> {
        let body = serde_json::json!({
            "owner": repo.owner,
            "name": repo.name,
            "remoteUrl": remote_url,
        });
        let response: ImportResponse = self.post_json("/api/repository/import-remote", body).await?;
        tracing::info!(repo = %repo, job_key = %response.job_key, "import submitted");
        Ok(JobKey::from_string(response.job_key))
    }

    async fn build_image(
        &self,
        repo: &RepositoryRef,
        options: BuildOptions,
    ) -> Result<Option<JobKey>, BackendError> {
        let body = serde_json::json!({
            "owner": repo.owner,
            "name": repo.name,
            "noCache": options.no_cache,
        });
        let response: Option<BuildResponse> =
            self.post_json("/api/environment/build-image", body).await?;
        let key = response.and_then(|r| r.background_job_key).map(JobKey::from_string);
        match &key {
            Some(key) => tracing::info!(repo = %repo, job_key = %key, "build submitted"),
            None => tracing::info!(repo = %repo, "image already fresh, no build job"),
        }
        Ok(key)
    }

    async fn start_container(&self, repo: &RepositoryRef) -> Result<(), BackendError> {
        let body = serde_json::json!({ "owner": repo.owner, "name": repo.name });
        let _: serde_json::Value = self.post_json("/api/container/start", body).await?;
        tracing::info!(repo = %repo, "container started");
        Ok(())
    }

    async fn start_dev_tool(
        &self,
        repo: &RepositoryRef,
        tool: &str,
    ) -> Result<DevToolStarted, BackendError> {
        let body = serde_json::json!({
            "owner": repo.owner,
            "name": repo.name,
            "devTool": tool,
        });
        let started: DevToolStarted = self.post_json("/api/container/start-dev-tool", body).await?;
        tracing::info!(repo = %repo, tool, path = %started.path, "dev tool started");
        Ok(started)
    }

    async fn job_status(&self, key: &JobKey) -> Result<JobDescriptor, BackendError> {
        let response: JobStatusResponse = self
            .get_json(&format!("/api/jobs/{key}"))
            .await?
            .ok_or_else(|| BackendError::Rejected(format!("unknown job key: {key}")))?;
        Ok(JobDescriptor {
            key: key.clone(),
            status: response.status,
            metadata: response.job_metadata.as_deref().and_then(JobMetadata::from_wire),
            failure_message: response.failure_message,
        })
    }

    async fn repository_exists(
        &self,
        repo: &RepositoryRef,
    ) -> Result<Option<RepositorySnapshot>, BackendError> {
        let response: Option<SnapshotResponse> = self
            .get_json(&format!("/api/repository/{}/{}", repo.owner, repo.name))
            .await?;
        Ok(response.map(|r| RepositorySnapshot {
            size_bytes: r.size_bytes,
            environment: r.environment,
        }))
    }

    async fn resolve_auth(&self) -> Result<AuthSnapshot, AuthResolveError> {
        let url = self.url("/api/auth");
        let response = self.client.get(&url).send().await.map_err(|e| AuthResolveError {
            available_servers: Vec::new(),
            messages: vec![e.to_string()],
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| AuthResolveError {
            available_servers: Vec::new(),
            messages: vec![e.to_string()],
        })?;
        if !status.is_success() {
            // A rejection can still name the servers the user could log
            // in to; surface them so startup classifies as logged-out.
            let partial: Option<AuthSnapshot> = serde_json::from_str(&text).ok();
            return Err(AuthResolveError {
                available_servers: partial.map(|p| p.available_servers).unwrap_or_default(),
                messages: vec![reject_message(status, &text)],
            });
        }
        serde_json::from_str(&text).map_err(|e| AuthResolveError {
            available_servers: Vec::new(),
            messages: vec![e.to_string()],
        })
    }
}
