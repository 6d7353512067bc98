// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Popup launcher: open a named tab for a URL and detect whether the host
//! refused to open it.
//!
//! Blocked-popup detection is inherently environment-specific, so the
//! orchestration logic only ever sees the two [`LaunchOutcome`]s.

use async_trait::async_trait;
use thiserror::Error;

/// What happened when a tab was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Opened,
    /// The host refused to open the tab. Retryable without resubmitting
    /// any backend mutation.
    Blocked,
}

gantry_core::simple_display! {
    LaunchOutcome {
        Opened => "opened",
        Blocked => "blocked",
    }
}

/// Errors from popup operations.
#[derive(Debug, Clone, Error)]
pub enum PopupError {
    #[error("no browser launcher available on this platform")]
    Unsupported,
}

/// Adapter for opening browser surfaces.
#[async_trait]
pub trait PopupAdapter: Clone + Send + Sync + 'static {
    /// Open `url` in a uniquely-named tab.
    async fn open_tab(&self, url: &str, tab_name: &str) -> Result<LaunchOutcome, PopupError>;

    /// Same-tab navigation (replaces the current surface).
    async fn navigate(&self, url: &str) -> Result<(), PopupError>;
}

/// Desktop implementation: hands the URL to the platform's default opener.
///
/// A launcher that fails to spawn or exits nonzero is reported as
/// [`LaunchOutcome::Blocked`] so the caller's retry path applies.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopPopup;

impl DesktopPopup {
    pub fn new() -> Self {
        Self
    }

    async fn spawn_opener(url: &str) -> Result<LaunchOutcome, PopupError> {
        #[cfg(target_os = "linux")]
        {
            let mut command = tokio::process::Command::new("xdg-open");
            command.arg(url);
            return Ok(run_opener(command, url).await);
        }

        #[cfg(target_os = "macos")]
        {
            let mut command = tokio::process::Command::new("open");
            command.arg(url);
            return Ok(run_opener(command, url).await);
        }

        #[cfg(target_os = "windows")]
        {
            let mut command = tokio::process::Command::new("cmd");
            command.args(["/C", "start", "", url]);
            return Ok(run_opener(command, url).await);
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            let _ = url;
            Err(PopupError::Unsupported)
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
async fn run_opener(mut command: tokio::process::Command, url: &str) -> LaunchOutcome {
    match command.status().await {
        Ok(status) if status.success() => LaunchOutcome::Opened,
        Ok(status) => {
            tracing::warn!(%url, code = ?status.code(), "browser launcher exited nonzero");
            LaunchOutcome::Blocked
        }
        Err(error) => {
            tracing::warn!(%url, %error, "browser launcher failed to spawn");
            LaunchOutcome::Blocked
        }
    }
}

#[async_trait]
impl PopupAdapter for DesktopPopup {
    async fn open_tab(&self, url: &str, tab_name: &str) -> Result<LaunchOutcome, PopupError> {
        tracing::info!(%url, tab_name, "opening tab");
        Self::spawn_opener(url).await
    }

    async fn navigate(&self, url: &str) -> Result<(), PopupError> {
        tracing::info!(%url, "navigating");
        match Self::spawn_opener(url).await? {
            LaunchOutcome::Opened => {}
            LaunchOutcome::Blocked => {
                tracing::warn!(%url, "navigation launcher was refused");
            }
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{LaunchOutcome, PopupAdapter, PopupError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Recorded popup operation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PopupCall {
        OpenTab { url: String, tab_name: String },
        Navigate { url: String },
    }

    struct FakePopupState {
        calls: Vec<PopupCall>,
        outcomes: VecDeque<LaunchOutcome>,
    }

    /// Fake popup launcher replaying scripted outcomes.
    ///
    /// Once the script is exhausted every further open succeeds.
    #[derive(Clone)]
    pub struct FakePopup {
        inner: Arc<Mutex<FakePopupState>>,
    }

    impl Default for FakePopup {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakePopupState {
                    calls: Vec::new(),
                    outcomes: VecDeque::new(),
                })),
            }
        }
    }

    impl FakePopup {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the outcome of the next unscripted `open_tab`.
        pub fn push_outcome(&self, outcome: LaunchOutcome) {
            self.inner.lock().outcomes.push_back(outcome);
        }

        pub fn calls(&self) -> Vec<PopupCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl PopupAdapter for FakePopup {
        async fn open_tab(&self, url: &str, tab_name: &str) -> Result<LaunchOutcome, PopupError> {
            let mut state = self.inner.lock();
            state.calls.push(PopupCall::OpenTab {
                url: url.to_string(),
                tab_name: tab_name.to_string(),
            });
            Ok(state.outcomes.pop_front().unwrap_or(LaunchOutcome::Opened))
        }

        async fn navigate(&self, url: &str) -> Result<(), PopupError> {
            self.inner.lock().calls.push(PopupCall::Navigate { url: url.to_string() });
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePopup, PopupCall};

#[cfg(test)]
#[path = "popup_tests.rs"]
mod tests;
