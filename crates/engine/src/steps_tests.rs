// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gantry_adapters::{BackendCall, FakeBackend, FakePopup, PopupCall};
use gantry_core::{JobDescriptor, JobStatus};
use std::time::Duration;

const HOST: &str = "http://localhost:10000";

fn repo() -> RepositoryRef {
    RepositoryRef::new("alice", "quickstart")
}

fn fast_poll() -> PollConfig {
    PollConfig::default().interval(Duration::from_millis(0))
}

#[yare::parameterized(
    default_tree = { "/lab/tree/code", "notebooks/intro.ipynb", "/lab/tree/notebooks/intro.ipynb" },
    nested_code  = { "/user/1/lab/tree/code?token=x", "data", "/user/1/lab/tree/data?token=x" },
    no_code_segment = { "/lab/tree/", "notebooks", "/lab/tree/notebooks" },
)]
fn tool_path_rewrites(path: &str, file_path: &str, expected: &str) {
    assert_eq!(rewrite_tool_path(path, file_path), expected);
}

#[tokio::test]
async fn import_step_submits_then_polls_to_terminal() {
    let backend = FakeBackend::new();
    backend.set_import_job("rq:job:imp");
    backend.push_status(
        "rq:job:imp",
        JobDescriptor::builder().key("rq:job:imp").status(JobStatus::Started).build(),
    );
    backend.push_status(
        "rq:job:imp",
        JobDescriptor::builder()
            .key("rq:job:imp")
            .status(JobStatus::Finished)
            .progress("done", Some(gantry_core::METHOD_IMPORT_FROM_REMOTE))
            .build(),
    );

    let step = ImportStep::new(backend.clone(), fast_poll());
    let cancel = tokio_util::sync::CancellationToken::new();
    let result = step
        .execute(&repo(), "https://hub.test/alice/quickstart", &cancel, |_| {})
        .await
        .unwrap();

    assert_eq!(result.status, JobStatus::Finished);
    assert_eq!(result.method(), Some(gantry_core::METHOD_IMPORT_FROM_REMOTE));
    assert_eq!(backend.count(|c| matches!(c, BackendCall::Import { .. })), 1);
}

#[tokio::test]
async fn build_step_reports_already_fresh_images() {
    let backend = FakeBackend::new();
    backend.set_build_already_fresh();

    let step = BuildStep::new(backend.clone(), fast_poll());
    assert_eq!(step.submit(&repo()).await.unwrap(), BuildSubmission::AlreadyBuilt);
}

#[tokio::test]
async fn build_step_hands_back_the_job_key() {
    let backend = FakeBackend::new();
    backend.set_build_job("rq:job:bld");

    let step = BuildStep::new(backend.clone(), fast_poll());
    match step.submit(&repo()).await.unwrap() {
        BuildSubmission::Job(key) => assert_eq!(key.as_str(), "rq:job:bld"),
        BuildSubmission::AlreadyBuilt => panic!("expected a queued job"),
    }
}

#[tokio::test]
async fn launch_tool_opens_named_tab_at_host_target() {
    let backend = FakeBackend::new();
    backend.set_dev_tool_path("/lab/tree/code");
    let popup = FakePopup::new();

    let step = LaunchStep::new(backend.clone(), popup.clone(), HOST);
    let tool = DevTool::Tool("jupyterlab".to_string());
    let attempt = step.launch_tool(&repo(), &tool, None).await.unwrap();

    assert_eq!(
        attempt,
        LaunchAttempt::Opened { target: format!("{HOST}/lab/tree/code") }
    );
    assert_eq!(
        popup.calls(),
        vec![PopupCall::OpenTab {
            url: format!("{HOST}/lab/tree/code"),
            tab_name: "jupyterlab-alice-quickstart".to_string(),
        }]
    );
}

#[tokio::test]
async fn launch_tool_applies_file_path_rewrite() {
    let backend = FakeBackend::new();
    backend.set_dev_tool_path("/lab/tree/code");
    let popup = FakePopup::new();

    let step = LaunchStep::new(backend.clone(), popup.clone(), HOST);
    let tool = DevTool::Tool("jupyterlab".to_string());
    let attempt = step.launch_tool(&repo(), &tool, Some("notebooks/intro.ipynb")).await.unwrap();

    assert_eq!(
        attempt,
        LaunchAttempt::Opened { target: format!("{HOST}/lab/tree/notebooks/intro.ipynb") }
    );
}

#[tokio::test]
async fn launch_tool_reports_blocked_tabs() {
    let backend = FakeBackend::new();
    let popup = FakePopup::new();
    popup.push_outcome(gantry_adapters::LaunchOutcome::Blocked);

    let step = LaunchStep::new(backend.clone(), popup.clone(), HOST);
    let tool = DevTool::Tool("jupyterlab".to_string());
    let attempt = step.launch_tool(&repo(), &tool, None).await.unwrap();

    assert!(matches!(attempt, LaunchAttempt::Blocked { .. }));
    // The mutation itself succeeded; only the tab was refused.
    assert_eq!(backend.count(|c| matches!(c, BackendCall::StartDevTool { .. })), 1);
}

#[tokio::test]
async fn launch_tool_surfaces_mutation_failures() {
    let backend = FakeBackend::new();
    backend.fail_dev_tool("no such dev tool: rstudio");
    let popup = FakePopup::new();

    let step = LaunchStep::new(backend.clone(), popup.clone(), HOST);
    let tool = DevTool::Tool("rstudio".to_string());
    let err = step.launch_tool(&repo(), &tool, None).await.unwrap_err();

    assert!(matches!(err, StepError::Backend(_)));
    // No tab is opened for a failed mutation.
    assert!(popup.calls().is_empty());
}
