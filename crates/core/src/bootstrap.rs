// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application bootstrap state machine.
//!
//! Decides whether the app starts logged in, logged out, mid-import, or in
//! an error state. The transition table is the contract: undefined
//! transitions are rejected rather than silently applied.

use serde::{Deserialize, Serialize};

/// Where the application is in its startup lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    Loading,
    LoggedIn,
    LoggedOut,
    Importing,
    Error,
}

crate::simple_display! {
    BootstrapState {
        Loading => "loading",
        LoggedIn => "logged in",
        LoggedOut => "logged out",
        Importing => "importing",
        Error => "error",
    }
}

/// Events that drive the bootstrap machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapEvent {
    LoggedIn,
    LoggedOut,
    Importing,
    Error,
    /// Explicit user recovery from the error interstitial.
    Back,
}

crate::simple_display! {
    BootstrapEvent {
        LoggedIn => "logged in",
        LoggedOut => "logged out",
        Importing => "importing",
        Error => "error",
        Back => "back",
    }
}

impl BootstrapState {
    /// The transition table. Returns the next state, or `None` when the
    /// event is not valid from this state.
    pub fn on(self, event: BootstrapEvent) -> Option<BootstrapState> {
        use BootstrapEvent as E;
        use BootstrapState as S;
        match (self, event) {
            (S::Loading, E::LoggedIn) => Some(S::LoggedIn),
            (S::Loading, E::LoggedOut) => Some(S::LoggedOut),
            (S::Loading, E::Importing) => Some(S::Importing),
            (S::Loading, E::Error) => Some(S::Error),
            // A finished import hands off to the logged-in view.
            (S::Importing, E::LoggedIn) => Some(S::LoggedIn),
            // Settled states can still fail.
            (S::LoggedIn, E::Error) => Some(S::Error),
            (S::LoggedOut, E::Error) => Some(S::Error),
            // The only manual recovery edge.
            (S::Error, E::Back) => Some(S::LoggedOut),
            _ => None,
        }
    }
}

/// The machine itself: current state plus guarded transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMachine {
    state: BootstrapState,
}

impl BootstrapMachine {
    pub fn new() -> Self {
        Self { state: BootstrapState::Loading }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Apply an event. Returns true when the transition was valid; an
    /// invalid event leaves the state untouched.
    pub fn transition(&mut self, event: BootstrapEvent) -> bool {
        match self.state.on(event) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }
}

impl Default for BootstrapMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
