// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository identity.

use serde::{Deserialize, Serialize};

/// Immutable identity of a target repository, supplied externally
/// (URL path segments) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }

    /// Extract the owner/name pair from a route pathname.
    ///
    /// Routes look like `/projects/{owner}/{name}` (optionally with trailing
    /// segments); the owner and name are the third and fourth `/`-separated
    /// segments. Returns `None` when the path is too shallow to identify a
    /// repository.
    pub fn from_path(pathname: &str) -> Option<Self> {
        let segments: Vec<&str> = pathname.split('/').collect();
        if segments.len() <= 3 {
            return None;
        }
        let (owner, name) = (segments[2], segments[3]);
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Parse an `owner/name` pair as typed on a command line.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let (owner, name) = slug.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Remote location of the repository on the given server.
    pub fn remote_url(&self, base_url: &str) -> String {
        format!("{}{}/{}", base_url, self.owner, self.name)
    }

    /// Route to the repository's own page.
    pub fn page_path(&self) -> String {
        format!("/projects/{}/{}", self.owner, self.name)
    }

    /// Route to the repository's environment editor.
    pub fn environment_path(&self) -> String {
        format!("/projects/{}/{}/environment", self.owner, self.name)
    }

    /// Storage entry name under which a submitted build job key is persisted
    /// so a reload can resume polling it.
    pub fn build_key_entry(&self) -> String {
        format!("{}:{}:buildkey", self.owner, self.name)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
