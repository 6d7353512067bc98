// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gantry-engine: the acquisition-and-launch orchestrator.
//!
//! Sequences Importing → Building → Launching over the backend job queue,
//! owns the visible phase/feedback state, and resolves the application's
//! bootstrap state on startup.

pub mod controller;
pub mod error;
pub mod poller;
pub mod startup;
pub mod steps;

pub use controller::{
    Handoff, WorkflowConfig, WorkflowController, WorkflowDeps, WorkflowEvent, WorkflowPhase,
    WorkflowState,
};
pub use error::{Interstitial, RecoveryAction, WorkflowError};
pub use poller::{JobFailure, JobPoller, PollConfig, PollError};
pub use startup::{load_session, resolve_startup, HashParams, StartupOutcome, GENERIC_FETCH_ERROR};
pub use steps::{BuildStep, BuildSubmission, ImportStep, LaunchAttempt, LaunchStep, StepError};
