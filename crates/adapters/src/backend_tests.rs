// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gantry_core::{JobDescriptor, JobStatus, RepositoryRef};

fn repo() -> RepositoryRef {
    RepositoryRef::new("alice", "quickstart")
}

#[tokio::test]
async fn fake_records_calls_in_order() {
    let backend = FakeBackend::new();
    backend.repository_exists(&repo()).await.unwrap();
    backend.import_remote_repository(&repo(), "https://hub.test/alice/quickstart").await.unwrap();

    let calls = backend.calls();
    assert!(matches!(calls[0], BackendCall::RepositoryExists { .. }));
    assert!(matches!(calls[1], BackendCall::Import { ref remote_url, .. }
        if remote_url == "https://hub.test/alice/quickstart"));
}

#[tokio::test]
async fn fake_status_script_drains_and_repeats_last() {
    let backend = FakeBackend::new();
    backend.push_status("rq:job:x", JobDescriptor::builder().key("rq:job:x").build());
    backend.push_status(
        "rq:job:x",
        JobDescriptor::builder().key("rq:job:x").status(JobStatus::Finished).build(),
    );

    let key = gantry_core::JobKey::from_string("rq:job:x");
    assert_eq!(backend.job_status(&key).await.unwrap().status, JobStatus::Queued);
    assert_eq!(backend.job_status(&key).await.unwrap().status, JobStatus::Finished);
    // Script exhausted: the terminal snapshot repeats.
    assert_eq!(backend.job_status(&key).await.unwrap().status, JobStatus::Finished);
}

#[tokio::test]
async fn fake_rejects_unknown_job_keys() {
    let backend = FakeBackend::new();
    let key = gantry_core::JobKey::from_string("rq:job:missing");
    let err = backend.job_status(&key).await.unwrap_err();
    assert!(matches!(err, BackendError::Rejected(ref m) if m.contains("rq:job:missing")));
}

#[tokio::test]
async fn fake_build_can_report_already_fresh() {
    let backend = FakeBackend::new();
    backend.set_build_already_fresh();
    let result = backend.build_image(&repo(), BuildOptions::default()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn fake_auth_failure_carries_servers_and_messages() {
    let backend = FakeBackend::new();
    backend.fail_auth(Vec::new(), vec!["token expired".to_string()]);
    let err = backend.resolve_auth().await.unwrap_err();
    assert!(err.available_servers.is_empty());
    assert_eq!(err.messages, vec!["token expired".to_string()]);
    assert!(err.to_string().contains("token expired"));
}

#[test]
fn http_backend_normalizes_base_url() {
    let backend = HttpBackend::new("http://localhost:10000/");
    assert_eq!(backend.base_url(), "http://localhost:10000");
}
