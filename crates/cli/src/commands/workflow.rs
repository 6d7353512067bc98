// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared workflow driver for `open` and `launch`.

use crate::exit_error::ExitError;
use crate::output::print_interstitial;
use crate::render::ProgressRenderer;
use gantry_adapters::{FileStore, HttpBackend, ServerInfo};
use gantry_core::{RepositoryRef, SystemClock};
use gantry_engine::{
    load_session, Handoff, Interstitial, PollConfig, WorkflowConfig, WorkflowController,
    WorkflowDeps, WorkflowState,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Run the acquisition workflow for `repo` against `server`, rendering
/// progress and handling the popup-blocked retry loop on stdin.
pub async fn run_workflow(
    backend: HttpBackend,
    store: FileStore,
    repo: RepositoryRef,
    current_server: &ServerInfo,
) -> anyhow::Result<()> {
    let session = load_session(&store);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let config = WorkflowConfig {
        host_base: backend.base_url().to_string(),
        remote_base: current_server.base_url.clone(),
        poll: PollConfig::default(),
    };
    let popup = gantry_adapters::DesktopPopup::new();
    let mut controller = WorkflowController::new(
        WorkflowDeps { backend, store, popup },
        config,
        repo.clone(),
        session,
        current_server.server_id.clone(),
        SystemClock,
        event_tx,
    );

    let renderer = tokio::spawn(async move {
        let renderer = ProgressRenderer::new();
        while let Some(event) = event_rx.recv().await {
            renderer.apply(&event);
        }
        renderer.finish();
    });

    let cancel = CancellationToken::new();
    let mut state = controller.run(&cancel).await.clone();

    loop {
        let target = match &state {
            WorkflowState::PopupBlocked(target) => target.clone(),
            _ => break,
        };
        print_interstitial(&Interstitial::popup_blocked(), Some(&target), None);
        if !confirm_retry().await? {
            break;
        }
        state = controller.retry_launch().await.clone();
    }

    drop(controller);
    let _ = renderer.await;

    match state {
        WorkflowState::Done(Handoff::Reload) => {
            println!("Launched '{repo}'.");
            Ok(())
        }
        WorkflowState::Done(Handoff::Navigate(route)) => {
            println!("Opened '{repo}' at {route}.");
            Ok(())
        }
        WorkflowState::Error(error) => {
            let interstitial = error.interstitial();
            let route = error.recovery().route(&repo);
            print_interstitial(&interstitial, Some(error.message()), route.as_deref());
            Err(ExitError::failure(error.message().to_string()).into())
        }
        WorkflowState::ServerMismatch => {
            let interstitial = Interstitial::server_mismatch();
            print_interstitial(&interstitial, None, Some("/projects/local"));
            Err(ExitError::failure("server mismatch").into())
        }
        WorkflowState::PopupBlocked(target) => {
            Err(ExitError::failure(format!("tab was blocked; open {target} manually")).into())
        }
        state => Err(ExitError::failure(format!("workflow stopped in {state}")).into()),
    }
}

/// Ask the user to retry a blocked launch.
async fn confirm_retry() -> anyhow::Result<bool> {
    eprint!("Launch again? [Y/n] ");
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await??;
    let answer = line.trim().to_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}
