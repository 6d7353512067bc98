// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow failure taxonomy and recovery routing.
//!
//! Each failed phase surfaces one terminal display state with a
//! human-readable message and a single recovery action: import failures
//! route to the listing, build failures to the environment editor (almost
//! always a bad environment definition), launch failures back to the
//! repository page.

use crate::controller::WorkflowPhase;
use gantry_core::RepositoryRef;
use thiserror::Error;

/// A phase-level failure captured by the controller and turned into one
/// terminal display state. Never silently swallowed, never auto-retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{message}")]
    Import { message: String },
    #[error("{message}")]
    Build { message: String },
    #[error("{message}")]
    Launch { message: String },
}

impl WorkflowError {
    pub fn import(message: impl Into<String>) -> Self {
        WorkflowError::Import { message: message.into() }
    }

    pub fn build(message: impl Into<String>) -> Self {
        WorkflowError::Build { message: message.into() }
    }

    pub fn launch(message: impl Into<String>) -> Self {
        WorkflowError::Launch { message: message.into() }
    }

    /// Which phase failed.
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            WorkflowError::Import { .. } => WorkflowPhase::Importing,
            WorkflowError::Build { .. } => WorkflowPhase::Building,
            WorkflowError::Launch { .. } => WorkflowPhase::Launching,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            WorkflowError::Import { message }
            | WorkflowError::Build { message }
            | WorkflowError::Launch { message } => message,
        }
    }

    /// The single recovery action appropriate to the failed phase.
    pub fn recovery(&self) -> RecoveryAction {
        match self {
            WorkflowError::Import { .. } => RecoveryAction::ViewListing,
            WorkflowError::Build { .. } => RecoveryAction::ViewEnvironment,
            WorkflowError::Launch { .. } => RecoveryAction::ReopenRepository,
        }
    }

    /// Display copy for the failure interstitial.
    pub fn interstitial(&self) -> Interstitial {
        match self {
            WorkflowError::Import { .. } => Interstitial {
                header: "Project failed to launch",
                body: "The project could not be imported. This is most likely because \
                       you do not have access to it or it does not exist.",
                sub: "Please select a valid project to launch.",
                button: "View projects",
                action: RecoveryAction::ViewListing,
            },
            WorkflowError::Build { .. } => Interstitial {
                header: "Project failed to build",
                body: "The project's environment image could not be built. This is most \
                       likely due to an issue with the project's environment definition.",
                sub: "Please modify the environment and try again.",
                button: "View environment",
                action: RecoveryAction::ViewEnvironment,
            },
            WorkflowError::Launch { .. } => Interstitial {
                header: "Dev tool failed to launch",
                body: "The dev tool could not be started. This is most likely because \
                       it does not exist in the project's environment.",
                sub: "Please open the project and select a valid dev tool.",
                button: "Open project",
                action: RecoveryAction::ReopenRepository,
            },
        }
    }
}

/// The one recovery offered for each terminal display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Back to the local repository listing.
    ViewListing,
    /// Into the repository's environment editor.
    ViewEnvironment,
    /// Re-open the repository page (re-enters at the launch decision).
    ReopenRepository,
    /// Re-invoke only the launch action; no mutations are resubmitted.
    RetryLaunch,
}

gantry_core::simple_display! {
    RecoveryAction {
        ViewListing => "view projects",
        ViewEnvironment => "view environment",
        ReopenRepository => "open project",
        RetryLaunch => "launch again",
    }
}

impl RecoveryAction {
    /// Route this action navigates to, when it is a navigation.
    pub fn route(&self, repo: &RepositoryRef) -> Option<String> {
        match self {
            RecoveryAction::ViewListing => Some("/projects/local".to_string()),
            RecoveryAction::ViewEnvironment => Some(repo.environment_path()),
            RecoveryAction::ReopenRepository => Some(repo.page_path()),
            RecoveryAction::RetryLaunch => None,
        }
    }
}

/// Copy for a terminal interstitial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interstitial {
    pub header: &'static str,
    pub body: &'static str,
    pub sub: &'static str,
    pub button: &'static str,
    pub action: RecoveryAction,
}

impl Interstitial {
    /// Copy for the server-mismatch terminal state.
    pub fn server_mismatch() -> Self {
        Interstitial {
            header: "Server mismatch",
            body: "You are currently logged in to a different server than the one \
                   specified in the import link.",
            sub: "Please log out, log in to the specified server, and try again.",
            button: "View projects",
            action: RecoveryAction::ViewListing,
        }
    }

    /// Copy for the blocked-popup state.
    pub fn popup_blocked() -> Self {
        Interstitial {
            header: "Pop-up blocked",
            body: "The dev tool opens in a new tab, which was blocked.",
            sub: "Please allow pop-ups for this site and launch again.",
            button: "Launch again",
            action: RecoveryAction::RetryLaunch,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
