// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background job descriptors.
//!
//! The backend queue only exposes fire-and-forget submission plus a polling
//! status endpoint; everything the orchestrator knows about a job lives in
//! the [`JobDescriptor`] snapshots observed while polling.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque key identifying a background job.
    ///
    /// Issued by the backend on submission and treated as unique per
    /// submission; it is the only external identifier usable to resume
    /// polling after a restart.
    pub struct JobKey("job-");
}

/// Job method reported for a finished remote import.
pub const METHOD_IMPORT_FROM_REMOTE: &str = "import_from_remote";

/// Job method reported for a finished image build.
pub const METHOD_BUILD_IMAGE: &str = "build_image";

/// Status of a background job as reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Started,
    Finished,
    Failed,
}

impl JobStatus {
    /// Polling stops once a terminal status is observed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Started => "started",
        Finished => "finished",
        Failed => "failed",
    }
}

/// Free-form metadata attached to a job's status payload.
///
/// Arrives on the wire as a JSON-encoded string inside the status response;
/// absent or malformed metadata decodes to nothing rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub method: Option<String>,
}

impl JobMetadata {
    /// Decode the JSON string carried in the status payload.
    pub fn from_wire(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Snapshot of a background job, created when a mutation returns a job key
/// and updated only as new statuses are observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub key: JobKey,
    pub status: JobStatus,
    pub metadata: Option<JobMetadata>,
    pub failure_message: Option<String>,
}

impl JobDescriptor {
    /// Latest cumulative feedback text, empty when none was attached.
    pub fn feedback(&self) -> &str {
        self.metadata.as_ref().map(|m| m.feedback.as_str()).unwrap_or("")
    }

    /// Job method recorded in the metadata, if any.
    pub fn method(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.method.as_deref())
    }
}

crate::builder! {
    pub struct JobDescriptorBuilder => JobDescriptor {
        into {
            key: JobKey = "rq:job:test",
        }
        set {
            status: JobStatus = JobStatus::Queued,
        }
        option {
            metadata: JobMetadata = None,
            failure_message: String = None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobDescriptorBuilder {
    /// Shorthand for metadata with the given feedback and method.
    pub fn progress(self, feedback: impl Into<String>, method: Option<&str>) -> Self {
        self.metadata(JobMetadata {
            feedback: feedback.into(),
            method: method.map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
