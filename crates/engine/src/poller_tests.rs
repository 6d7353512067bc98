// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gantry_adapters::{BackendCall, FakeBackend};
use gantry_core::{JobDescriptor, JobStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const KEY: &str = "rq:job:test";

fn poller(backend: &FakeBackend) -> JobPoller<FakeBackend> {
    JobPoller::new(backend.clone(), PollConfig::default().interval(Duration::from_millis(0)))
}

fn descriptor(status: JobStatus) -> JobDescriptor {
    JobDescriptor::builder().key(KEY).status(status).build()
}

fn with_feedback(status: JobStatus, feedback: &str) -> JobDescriptor {
    JobDescriptor::builder().key(KEY).status(status).progress(feedback, None).build()
}

fn status_requests(backend: &FakeBackend) -> usize {
    backend.count(|c| matches!(c, BackendCall::JobStatus { .. }))
}

#[tokio::test]
async fn resolves_on_finished_and_stops_polling() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, descriptor(JobStatus::Queued));
    backend.push_status(KEY, descriptor(JobStatus::Started));
    backend.push_status(KEY, descriptor(JobStatus::Finished));

    let key = KEY.into();
    let result =
        poller(&backend).subscribe(&key, &CancellationToken::new(), |_| {}).await.unwrap();

    assert_eq!(result.status, JobStatus::Finished);
    // Exactly one request per observed status; none after the terminal one.
    assert_eq!(status_requests(&backend), 3);
}

#[tokio::test]
async fn delivers_feedback_once_per_new_text() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, with_feedback(JobStatus::Started, "Step 1/4"));
    backend.push_status(KEY, with_feedback(JobStatus::Started, "Step 1/4"));
    backend.push_status(KEY, with_feedback(JobStatus::Started, "Step 1/4\nStep 2/4"));
    backend.push_status(KEY, with_feedback(JobStatus::Finished, "Step 1/4\nStep 2/4"));

    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    let key = KEY.into();
    poller(&backend)
        .subscribe(&key, &CancellationToken::new(), |fb| {
            sink.lock().unwrap().push(fb.to_string());
        })
        .await
        .unwrap();

    // The repeated snapshot and the terminal superset are both suppressed
    // by containment, not equality.
    assert_eq!(
        *updates.lock().unwrap(),
        vec!["Step 1/4".to_string(), "Step 1/4\nStep 2/4".to_string()]
    );
}

#[tokio::test]
async fn cumulative_feedback_is_not_redelivered() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, with_feedback(JobStatus::Started, "importing\nunpacking"));
    // A later snapshot carrying a subset (already-shown text) is suppressed.
    backend.push_status(KEY, with_feedback(JobStatus::Started, "unpacking"));
    backend.push_status(KEY, descriptor(JobStatus::Finished));

    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    let key = KEY.into();
    poller(&backend)
        .subscribe(&key, &CancellationToken::new(), |fb| {
            sink.lock().unwrap().push(fb.to_string());
        })
        .await
        .unwrap();

    assert_eq!(*updates.lock().unwrap(), vec!["importing\nunpacking".to_string()]);
}

#[tokio::test]
async fn failure_carries_accrued_plus_final_feedback() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, with_feedback(JobStatus::Started, "Step 1/2"));
    let failed = JobDescriptor::builder()
        .key(KEY)
        .status(JobStatus::Failed)
        .progress("error: base image not found", None)
        .failure_message("Dockerfile syntax error")
        .build();
    backend.push_status(KEY, failed);

    let key = KEY.into();
    let err =
        poller(&backend).subscribe(&key, &CancellationToken::new(), |_| {}).await.unwrap_err();

    match err {
        PollError::JobFailed(failure) => {
            assert_eq!(failure.feedback, "Step 1/2\nerror: base image not found");
            assert_eq!(failure.descriptor.failure_message.as_deref(), Some("Dockerfile syntax error"));
        }
        other => panic!("expected JobFailed, got {other:?}"),
    }
    assert_eq!(status_requests(&backend), 2);
}

#[tokio::test]
async fn transport_failures_escalate_after_bounded_retries() {
    let backend = FakeBackend::new();
    // No status script for this key: every poll is a transport-level error.
    let key = "rq:job:unknown".into();
    let err = JobPoller::new(
        backend.clone(),
        PollConfig::default().interval(Duration::from_millis(0)).transport_retries(3),
    )
    .subscribe(&key, &CancellationToken::new(), |_| {})
    .await
    .unwrap_err();

    assert!(matches!(err, PollError::Transport { attempts: 3, .. }));
    assert_eq!(status_requests(&backend), 3);
}

#[tokio::test]
async fn cancellation_stops_all_requests() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, descriptor(JobStatus::Queued));

    let cancel = CancellationToken::new();
    cancel.cancel();
    let key = KEY.into();
    let err = poller(&backend).subscribe(&key, &cancel, |_| {}).await.unwrap_err();

    assert!(matches!(err, PollError::Cancelled));
    assert_eq!(status_requests(&backend), 0);
}

#[tokio::test]
async fn cancellation_during_sleep_issues_no_further_requests() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, descriptor(JobStatus::Queued));

    let cancel = CancellationToken::new();
    let poller = JobPoller::new(
        backend.clone(),
        PollConfig::default().interval(Duration::from_secs(3600)),
    );
    let key: gantry_core::JobKey = KEY.into();
    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.subscribe(&key, &cancel, |_| {}).await })
    };

    // Let the first poll land, then cancel while the poller sleeps.
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();
    let result = task.await.unwrap();

    assert!(matches!(result, Err(PollError::Cancelled)));
    assert_eq!(status_requests(&backend), 1);
}

#[tokio::test]
async fn attempts_guard_trips_when_configured() {
    let backend = FakeBackend::new();
    backend.push_status(KEY, descriptor(JobStatus::Queued));

    let key = KEY.into();
    let err = JobPoller::new(
        backend.clone(),
        PollConfig::default().interval(Duration::from_millis(0)).max_attempts(5u32),
    )
    .subscribe(&key, &CancellationToken::new(), |_| {})
    .await
    .unwrap_err();

    assert!(matches!(err, PollError::AttemptsExhausted(5)));
    assert_eq!(status_requests(&backend), 5);
}
