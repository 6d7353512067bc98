// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gantry-adapters: environment-facing capabilities behind narrow traits.
//!
//! Each adapter has a production implementation and, behind the
//! `test-support` feature, a recording fake that other crates' tests drive.

pub mod backend;
pub mod popup;
pub mod store;

pub use backend::{
    AuthResolveError, AuthSnapshot, BackendAdapter, BackendError, BuildOptions, DevToolStarted,
    HttpBackend, ServerInfo,
};
#[cfg(any(test, feature = "test-support"))]
pub use backend::{BackendCall, FakeBackend};
pub use popup::{DesktopPopup, LaunchOutcome, PopupAdapter, PopupError};
#[cfg(any(test, feature = "test-support"))]
pub use popup::{FakePopup, PopupCall};
pub use store::{FileStore, SessionStore, StoreError};
#[cfg(any(test, feature = "test-support"))]
pub use store::FakeStore;
