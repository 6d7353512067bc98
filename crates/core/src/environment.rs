// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution environment state for a repository.

use serde::{Deserialize, Serialize};

/// Build state of a repository's environment image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStatus {
    DoesNotExist,
    BuildQueued,
    BuildInProgress,
    BuildFailed,
    Exists,
    Stale,
}

impl ImageStatus {
    /// The image can be launched without building first.
    pub fn is_ready(&self) -> bool {
        matches!(self, ImageStatus::Exists)
    }

    /// A build job is already running; resume its key instead of submitting.
    pub fn is_building(&self) -> bool {
        matches!(self, ImageStatus::BuildInProgress)
    }
}

crate::simple_display! {
    ImageStatus {
        DoesNotExist => "does not exist",
        BuildQueued => "build queued",
        BuildInProgress => "build in progress",
        BuildFailed => "build failed",
        Exists => "exists",
        Stale => "stale",
    }
}

/// Run state of a repository's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerStatus {
    NotRunning,
    Starting,
    Running,
    Stopping,
}

crate::simple_display! {
    ContainerStatus {
        NotRunning => "not running",
        Starting => "starting",
        Running => "running",
        Stopping => "stopping",
    }
}

/// Environment state read once per phase decision; never written by the
/// orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentState {
    pub image_status: Option<ImageStatus>,
    pub container_status: Option<ContainerStatus>,
}

/// What the backend knows about a locally-present repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    pub size_bytes: u64,
    pub environment: EnvironmentState,
}

impl RepositorySnapshot {
    /// An empty clone is treated the same as an absent repository; the
    /// import has to run before anything can be built or launched.
    pub fn is_materialized(&self) -> bool {
        self.size_bytes > 0
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
