// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status polling.
//!
//! Polls the status endpoint for one job key until a terminal status is
//! observed. Single-flight by construction: the next request is only issued
//! after the previous one resolves, so overlapping polls for the same key
//! cannot occur.

use gantry_adapters::BackendAdapter;
use gantry_core::{JobDescriptor, JobKey, JobStatus};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Polling cadence and hardening guards.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between status requests.
    pub interval: Duration,
    /// Consecutive transport failures tolerated before escalating.
    pub transport_retries: u32,
    /// Optional cap on total status requests. The job queue is trusted to
    /// reach a terminal state, so there is no cap by default.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: Duration::from_millis(1000), transport_retries: 3, max_attempts: None }
    }
}

impl PollConfig {
    gantry_core::setters! {
        set {
            interval: Duration,
            transport_retries: u32,
        }
        option {
            max_attempts: u32,
        }
    }
}

/// Terminal failure of the job itself, with the feedback accrued so far
/// concatenated with the final failure feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub descriptor: JobDescriptor,
    pub feedback: String,
}

/// Why polling stopped without a successful terminal status.
#[derive(Debug, Clone, Error)]
pub enum PollError {
    /// The job reached `Failed`. Distinct from failures of the polling
    /// mechanism: this one carries a failure message fit for display.
    #[error("job failed: {}", .0.descriptor.failure_message.as_deref().unwrap_or("unknown failure"))]
    JobFailed(JobFailure),
    /// The poll requests themselves kept failing.
    #[error("status polling failed after {attempts} attempts: {message}")]
    Transport { message: String, attempts: u32 },
    /// The `max_attempts` hardening guard tripped.
    #[error("job did not settle within {0} status checks")]
    AttemptsExhausted(u32),
    /// The caller tore the subscription down.
    #[error("polling cancelled")]
    Cancelled,
}

/// Polls one job key at a time on behalf of the workflow controller.
#[derive(Clone)]
pub struct JobPoller<B> {
    backend: B,
    config: PollConfig,
}

impl<B: BackendAdapter> JobPoller<B> {
    pub fn new(backend: B, config: PollConfig) -> Self {
        Self { backend, config }
    }

    /// Poll `key` until terminal, delivering new feedback to `on_update`.
    ///
    /// Feedback is cumulative, so an update is delivered only when the text
    /// already delivered does not contain the newly observed text. Resolves
    /// with the terminal descriptor on `Finished`; fails with
    /// [`PollError::JobFailed`] on `Failed`. No further requests are issued
    /// after a terminal status or after `cancel` fires.
    pub async fn subscribe<F>(
        &self,
        key: &JobKey,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> Result<JobDescriptor, PollError>
    where
        F: FnMut(&str) + Send,
    {
        let mut delivered = String::new();
        let mut attempts: u32 = 0;
        let mut transport_failures: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }
            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Err(PollError::AttemptsExhausted(max));
                }
            }
            attempts += 1;

            match self.backend.job_status(key).await {
                Ok(descriptor) => {
                    transport_failures = 0;
                    // A failing snapshot's feedback is folded into the
                    // JobFailure instead of the live update stream, so the
                    // text accrued so far is preserved for the composition.
                    if descriptor.status != JobStatus::Failed {
                        let feedback = descriptor.feedback();
                        if !feedback.is_empty() && !delivered.contains(feedback) {
                            delivered = feedback.to_string();
                            on_update(&delivered);
                        }
                    }
                    match descriptor.status {
                        JobStatus::Finished => {
                            tracing::info!(job_key = %key, attempts, "job finished");
                            return Ok(descriptor);
                        }
                        JobStatus::Failed => {
                            tracing::warn!(
                                job_key = %key,
                                attempts,
                                failure = descriptor.failure_message.as_deref().unwrap_or(""),
                                "job failed"
                            );
                            let feedback = compose_failure_feedback(&delivered, &descriptor);
                            return Err(PollError::JobFailed(JobFailure { descriptor, feedback }));
                        }
                        JobStatus::Queued | JobStatus::Started => {}
                    }
                }
                Err(error) => {
                    transport_failures += 1;
                    tracing::warn!(
                        job_key = %key,
                        consecutive = transport_failures,
                        %error,
                        "status request failed"
                    );
                    if transport_failures >= self.config.transport_retries {
                        return Err(PollError::Transport {
                            message: error.to_string(),
                            attempts: transport_failures,
                        });
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}

/// The failure feedback shown to the user is everything accrued so far plus
/// whatever the terminal snapshot added.
fn compose_failure_feedback(delivered: &str, descriptor: &JobDescriptor) -> String {
    let last = descriptor.feedback();
    if delivered.is_empty() {
        last.to_string()
    } else if last.is_empty() || delivered.contains(last) {
        delivered.to_string()
    } else if last.contains(delivered) {
        // Cumulative logs: the terminal snapshot already carries the text
        // accrued so far.
        last.to_string()
    } else {
        format!("{delivered}\n{last}")
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
