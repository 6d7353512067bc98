// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow controller: Importing → Building → Launching.
//!
//! Phase state is a single tagged value written by one transition function,
//! never by individual async callbacks, so overlapping completions cannot
//! race each other into a stale state. Observers follow along on an event
//! channel; phases themselves execute strictly sequentially.

use crate::error::WorkflowError;
use crate::poller::{PollConfig, PollError};
use crate::steps::{BuildStep, BuildSubmission, ImportStep, LaunchAttempt, LaunchStep, StepError};
use gantry_adapters::{BackendAdapter, PopupAdapter, SessionStore};
use gantry_core::{
    Clock, JobKey, RepositoryRef, ServerId, ServerSession, StoreEntry, METHOD_BUILD_IMAGE,
    METHOD_IMPORT_FROM_REMOTE,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Observable phase label (the interstitial's header step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Importing,
    Building,
    Launching,
}

gantry_core::simple_display! {
    WorkflowPhase {
        Importing => "Importing",
        Building => "Building",
        Launching => "Launching",
    }
}

/// How a finished workflow hands control back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Full reload so bootstrap re-evaluates into the logged-in view.
    Reload,
    /// Same-tab navigation to the given route (no dev tool was chosen).
    Navigate(String),
}

/// The workflow's control state. One value, one writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Importing,
    Building,
    Launching,
    /// The tool's tab was refused; retryable without resubmitting mutations.
    PopupBlocked(String),
    Done(Handoff),
    Error(WorkflowError),
    /// The stored server id does not match the authenticated server.
    ServerMismatch,
}

gantry_core::simple_display! {
    WorkflowState {
        Importing => "Importing",
        Building => "Building",
        Launching => "Launching",
        PopupBlocked(..) => "PopupBlocked",
        Done(..) => "Done",
        Error(..) => "Error",
        ServerMismatch => "ServerMismatch",
    }
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Done(_) | WorkflowState::Error(_) | WorkflowState::ServerMismatch
        )
    }

    /// Phase label for display while the workflow is live.
    pub fn header_step(&self) -> Option<WorkflowPhase> {
        match self {
            WorkflowState::Importing => Some(WorkflowPhase::Importing),
            WorkflowState::Building => Some(WorkflowPhase::Building),
            WorkflowState::Launching | WorkflowState::PopupBlocked(_) => {
                Some(WorkflowPhase::Launching)
            }
            _ => None,
        }
    }
}

/// Observations emitted as the workflow progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    StateChanged { state: WorkflowState, at_ms: u64 },
    FeedbackChanged { feedback: String, at_ms: u64 },
}

/// The adapters a workflow run needs.
pub struct WorkflowDeps<B, S, P> {
    pub backend: B,
    pub store: S,
    pub popup: P,
}

/// Host and cadence configuration for one workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Absolute prefix for routes and tool paths (scheme + host).
    pub host_base: String,
    /// Base URL remote repositories are imported from.
    pub remote_base: String,
    pub poll: PollConfig,
}

/// Which phase the workflow enters, decided once before any state is active.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Import,
    Build,
    ResumeBuild(JobKey),
    Launch,
}

/// Outcome of a phase that did not proceed to the next one.
enum Halt {
    /// A terminal display state was entered.
    Terminal,
    /// The caller tore the workflow down; no transition was made.
    Cancelled,
}

/// Sequences the acquisition workflow for one repository.
pub struct WorkflowController<B, S, P, C> {
    backend: B,
    store: S,
    import: ImportStep<B>,
    build: BuildStep<B>,
    launch: LaunchStep<B, P>,
    clock: C,
    repo: RepositoryRef,
    session: ServerSession,
    current_server: ServerId,
    remote_base: String,
    state: WorkflowState,
    feedback: String,
    event_tx: mpsc::UnboundedSender<WorkflowEvent>,
}

impl<B, S, P, C> WorkflowController<B, S, P, C>
where
    B: BackendAdapter,
    S: SessionStore,
    P: PopupAdapter,
    C: Clock,
{
    pub fn new(
        deps: WorkflowDeps<B, S, P>,
        config: WorkflowConfig,
        repo: RepositoryRef,
        session: ServerSession,
        current_server: ServerId,
        clock: C,
        event_tx: mpsc::UnboundedSender<WorkflowEvent>,
    ) -> Self {
        let WorkflowDeps { backend, store, popup } = deps;
        let import = ImportStep::new(backend.clone(), config.poll.clone());
        let build = BuildStep::new(backend.clone(), config.poll.clone());
        let launch = LaunchStep::new(backend.clone(), popup, config.host_base.clone());
        Self {
            backend,
            store,
            import,
            build,
            launch,
            clock,
            repo,
            session,
            current_server,
            remote_base: config.remote_base,
            state: WorkflowState::Importing,
            feedback: String::new(),
            event_tx,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repo
    }

    /// Run the workflow to its first resting state: terminal, or
    /// [`WorkflowState::PopupBlocked`] awaiting a user retry.
    pub async fn run(&mut self, cancel: &CancellationToken) -> &WorkflowState {
        if !self.session.matches_server(&self.current_server) {
            tracing::warn!(
                repo = %self.repo,
                expected = ?self.session.server_id,
                current = %self.current_server,
                "stored server does not match authenticated server"
            );
            self.clear_failure_breadcrumbs();
            self.transition(WorkflowState::ServerMismatch);
            return &self.state;
        }

        match self.decide_entry().await {
            Ok(entry) => {
                tracing::info!(repo = %self.repo, entry = ?entry, "workflow entry decided");
                if let Err(Halt::Cancelled) = self.run_from(entry, cancel).await {
                    tracing::info!(repo = %self.repo, "workflow cancelled");
                }
            }
            Err(Halt::Cancelled) => {
                tracing::info!(repo = %self.repo, "workflow cancelled");
            }
            Err(Halt::Terminal) => {}
        }
        &self.state
    }

    /// Re-invoke only the launch action after a blocked popup. The
    /// container is not restarted and no earlier phase is re-entered.
    pub async fn retry_launch(&mut self) -> &WorkflowState {
        if !matches!(self.state, WorkflowState::PopupBlocked(_)) {
            tracing::warn!(state = %self.state, "retry_launch ignored outside PopupBlocked");
            return &self.state;
        }
        self.transition(WorkflowState::Launching);
        let _ = self.launch_tool_once().await;
        &self.state
    }

    /// Decide which phase to enter from pre-existing repository state.
    async fn decide_entry(&mut self) -> Result<Entry, Halt> {
        match self.backend.repository_exists(&self.repo).await {
            Ok(Some(snapshot)) if snapshot.is_materialized() => {
                match snapshot.environment.image_status {
                    Some(status) if status.is_ready() => Ok(Entry::Launch),
                    Some(status) if status.is_building() => {
                        match self.store.get(&StoreEntry::BuildKey(self.repo.clone())) {
                            Ok(Some(key)) if !key.is_empty() => {
                                Ok(Entry::ResumeBuild(JobKey::from_string(key)))
                            }
                            _ => {
                                tracing::warn!(
                                    repo = %self.repo,
                                    "build in progress but no stored key; submitting a fresh build"
                                );
                                Ok(Entry::Build)
                            }
                        }
                    }
                    _ => Ok(Entry::Build),
                }
            }
            Ok(_) => Ok(Entry::Import),
            Err(error) => Err(self.fail_step(StepError::Backend(error), |m| {
                WorkflowError::Import { message: m }
            })),
        }
    }

    async fn run_from(&mut self, entry: Entry, cancel: &CancellationToken) -> Result<(), Halt> {
        match entry {
            Entry::Import => {
                self.import_phase(cancel).await?;
                self.build_phase(None, cancel).await?;
                self.launch_phase(cancel).await
            }
            Entry::Build => {
                self.build_phase(None, cancel).await?;
                self.launch_phase(cancel).await
            }
            Entry::ResumeBuild(key) => {
                self.build_phase(Some(key), cancel).await?;
                self.launch_phase(cancel).await
            }
            Entry::Launch => self.launch_phase(cancel).await,
        }
    }

    async fn import_phase(&mut self, cancel: &CancellationToken) -> Result<(), Halt> {
        self.transition(WorkflowState::Importing);
        self.set_feedback("Importing...");
        let remote_url = self.repo.remote_url(&self.remote_base);
        let on_update = self.feedback_sender();
        match self.import.execute(&self.repo, &remote_url, cancel, on_update).await {
            Ok(descriptor) => {
                if !descriptor.feedback().is_empty() {
                    self.set_feedback(descriptor.feedback().to_string());
                }
                if descriptor.method() == Some(METHOD_IMPORT_FROM_REMOTE) {
                    Ok(())
                } else {
                    tracing::warn!(
                        repo = %self.repo,
                        method = ?descriptor.method(),
                        "import job finished with unexpected method"
                    );
                    Err(self.fail(WorkflowError::import(
                        "import job finished with an unexpected method",
                    )))
                }
            }
            Err(error) => {
                Err(self.fail_step(error, |m| WorkflowError::Import { message: m }))
            }
        }
    }

    async fn build_phase(
        &mut self,
        resume: Option<JobKey>,
        cancel: &CancellationToken,
    ) -> Result<(), Halt> {
        self.transition(WorkflowState::Building);
        let key = match resume {
            Some(key) => {
                tracing::info!(repo = %self.repo, job_key = %key, "resuming build job");
                key
            }
            None => match self.build.submit(&self.repo).await {
                // Image already fresh: straight to launch.
                Ok(BuildSubmission::AlreadyBuilt) => return Ok(()),
                Ok(BuildSubmission::Job(key)) => {
                    // Persist before polling so a reload can resume this job.
                    if let Err(error) =
                        self.store.set(&StoreEntry::BuildKey(self.repo.clone()), key.as_str())
                    {
                        tracing::warn!(%error, "failed to persist build key");
                    }
                    key
                }
                Err(error) => {
                    return Err(self.fail_step(error, |m| WorkflowError::Build { message: m }))
                }
            },
        };
        let on_update = self.feedback_sender();
        match self.build.watch(&key, cancel, on_update).await {
            Ok(descriptor) => {
                if !descriptor.feedback().is_empty() {
                    self.set_feedback(descriptor.feedback().to_string());
                }
                if descriptor.method() == Some(METHOD_BUILD_IMAGE) {
                    Ok(())
                } else {
                    tracing::warn!(
                        repo = %self.repo,
                        method = ?descriptor.method(),
                        "build job finished with unexpected method"
                    );
                    Err(self.fail(WorkflowError::build(
                        "build job finished with an unexpected method",
                    )))
                }
            }
            Err(error) => Err(self.fail_step(error, |m| WorkflowError::Build { message: m })),
        }
    }

    async fn launch_phase(&mut self, cancel: &CancellationToken) -> Result<(), Halt> {
        if cancel.is_cancelled() {
            return Err(Halt::Cancelled);
        }
        self.transition(WorkflowState::Launching);

        // No tool chosen: clear the breadcrumbs and hand off to the
        // repository's own page in the same tab.
        if self.session.dev_tool.is_none() {
            let route = self.route_back();
            self.clear_success_breadcrumbs();
            if let Err(error) = self.launch.navigate(&route).await {
                tracing::warn!(%error, "same-tab navigation failed");
            }
            self.transition(WorkflowState::Done(Handoff::Navigate(route)));
            return Ok(());
        }

        self.append_feedback(&format!(
            "Starting {} in '{}'",
            self.session.dev_tool, self.repo
        ));
        if let Err(error) = self.launch.start_container(&self.repo).await {
            return Err(self.fail_step(error, |m| WorkflowError::Launch { message: m }));
        }
        self.launch_tool_once().await
    }

    /// The launch action: start the dev tool and open its tab. Shared by
    /// the launch phase and the popup retry.
    async fn launch_tool_once(&mut self) -> Result<(), Halt> {
        let file_path = self.session.file_path.clone();
        match self
            .launch
            .launch_tool(&self.repo, &self.session.dev_tool, file_path.as_deref())
            .await
        {
            Ok(LaunchAttempt::Opened { target }) => {
                tracing::info!(repo = %self.repo, %target, "dev tool tab opened");
                self.clear_success_breadcrumbs();
                self.transition(WorkflowState::Done(Handoff::Reload));
                Ok(())
            }
            Ok(LaunchAttempt::Blocked { target }) => {
                tracing::warn!(repo = %self.repo, %target, "dev tool tab was blocked");
                self.transition(WorkflowState::PopupBlocked(target));
                Ok(())
            }
            Err(error) => Err(self.fail_step(error, |m| WorkflowError::Launch { message: m })),
        }
    }

    /// The route the no-tool short-circuit navigates to: the pre-import
    /// pathname when one was stored, the repository page otherwise.
    fn route_back(&self) -> String {
        match self.store.get(&StoreEntry::Route) {
            Ok(Some(route)) if !route.is_empty() => route,
            _ => self.repo.page_path(),
        }
    }

    /// The single writer of the workflow state.
    fn transition(&mut self, next: WorkflowState) {
        tracing::info!(repo = %self.repo, from = %self.state, to = %next, "workflow transition");
        self.state = next;
        let _ = self.event_tx.send(WorkflowEvent::StateChanged {
            state: self.state.clone(),
            at_ms: self.clock.epoch_ms(),
        });
    }

    fn fail(&mut self, error: WorkflowError) -> Halt {
        self.clear_failure_breadcrumbs();
        self.transition(WorkflowState::Error(error));
        Halt::Terminal
    }

    /// Map a step error into the terminal error state, or propagate
    /// cancellation without any transition.
    fn fail_step(
        &mut self,
        error: StepError,
        make: impl FnOnce(String) -> WorkflowError,
    ) -> Halt {
        if error.is_cancelled() {
            return Halt::Cancelled;
        }
        let message = match error {
            StepError::Poll(PollError::JobFailed(failure)) => {
                self.set_feedback(failure.feedback.clone());
                failure
                    .descriptor
                    .failure_message
                    .clone()
                    .unwrap_or_else(|| "job failed".to_string())
            }
            other => other.to_string(),
        };
        self.fail(make(message))
    }

    fn feedback_sender(&self) -> impl FnMut(&str) + Send {
        let event_tx = self.event_tx.clone();
        let clock = self.clock.clone();
        move |feedback: &str| {
            let _ = event_tx.send(WorkflowEvent::FeedbackChanged {
                feedback: feedback.to_string(),
                at_ms: clock.epoch_ms(),
            });
        }
    }

    fn set_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback = feedback.into();
        self.emit_feedback();
    }

    fn append_feedback(&mut self, line: &str) {
        if self.feedback.is_empty() {
            self.feedback = line.to_string();
        } else {
            self.feedback.push('\n');
            self.feedback.push_str(line);
        }
        self.emit_feedback();
    }

    fn emit_feedback(&self) {
        let _ = self.event_tx.send(WorkflowEvent::FeedbackChanged {
            feedback: self.feedback.clone(),
            at_ms: self.clock.epoch_ms(),
        });
    }

    /// Remove the auto-import breadcrumbs a successful launch leaves
    /// behind. The dev-tool choice and the build key survive the reload.
    fn clear_success_breadcrumbs(&self) {
        self.remove_entries(&[StoreEntry::AutoImport, StoreEntry::FilePath, StoreEntry::Route]);
    }

    /// Remove every breadcrumb so a stale reload cannot re-trigger the
    /// workflow after a terminal failure.
    fn clear_failure_breadcrumbs(&self) {
        self.remove_entries(&[
            StoreEntry::AutoImport,
            StoreEntry::DevTool,
            StoreEntry::FilePath,
            StoreEntry::Route,
            StoreEntry::ServerId,
        ]);
    }

    fn remove_entries(&self, entries: &[StoreEntry]) {
        for entry in entries {
            if let Err(error) = self.store.remove(entry) {
                tracing::warn!(entry = %entry, %error, "failed to clear storage entry");
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
