// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable session state: storage entry names, the dev-tool choice, and the
//! server identity captured for one acquisition attempt.

use crate::repository::RepositoryRef;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identity of the backend server a session is bound to.
    pub struct ServerId("srv-");
}

/// Stored literal meaning "no dev tool was chosen".
const NO_TOOL_SENTINEL: &str = "undefined";

/// Named entries in the durable per-session store.
///
/// The orchestrator is the sole writer of these during its lifetime; they are
/// read once at phase-entry decision time and written only at well-defined
/// transition points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEntry {
    /// Flag that arms the workflow on the next bootstrap.
    AutoImport,
    /// Chosen dev tool, or the `"undefined"` sentinel.
    DevTool,
    /// Optional sub-path to open inside the launched tool.
    FilePath,
    /// Server the import link was minted for.
    ServerId,
    /// Pre-import pathname to restore after bootstrap.
    Route,
    /// Job key of an in-flight build, resumable across reloads.
    BuildKey(RepositoryRef),
}

impl StoreEntry {
    /// Storage key name for this entry.
    pub fn key(&self) -> String {
        match self {
            StoreEntry::AutoImport => "autoImport".to_string(),
            StoreEntry::DevTool => "devtool".to_string(),
            StoreEntry::FilePath => "filePath".to_string(),
            StoreEntry::ServerId => "serverId".to_string(),
            StoreEntry::Route => "route".to_string(),
            StoreEntry::BuildKey(repo) => repo.build_key_entry(),
        }
    }
}

impl std::fmt::Display for StoreEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// The user's dev-tool choice for a launch.
///
/// Import links that only want the repository page carry the literal string
/// `"undefined"`; that sentinel short-circuits the launch phase entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevTool {
    Tool(String),
    None,
}

impl DevTool {
    /// Decode a stored value; absent, empty, and the sentinel all mean
    /// "no tool chosen".
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored {
            Some(tool) if !tool.is_empty() && tool != NO_TOOL_SENTINEL => {
                DevTool::Tool(tool.to_string())
            }
            _ => DevTool::None,
        }
    }

    /// Value to persist for this choice.
    pub fn stored(&self) -> &str {
        match self {
            DevTool::Tool(tool) => tool,
            DevTool::None => NO_TOOL_SENTINEL,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DevTool::None)
    }

    /// Tab name for the launched tool, unique per repository.
    pub fn tab_name(&self, repo: &RepositoryRef) -> String {
        format!("{}-{}-{}", self.stored(), repo.owner, repo.name)
    }
}

impl std::fmt::Display for DevTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stored())
    }
}

/// Session state captured once at workflow start; read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSession {
    /// Server the workflow was armed for; `None` when the workflow was
    /// started explicitly rather than from an import link.
    pub server_id: Option<ServerId>,
    pub dev_tool: DevTool,
    pub file_path: Option<String>,
}

impl ServerSession {
    /// The workflow must refuse to proceed when the armed server does not
    /// match the authenticated one.
    pub fn matches_server(&self, current: &ServerId) -> bool {
        match &self.server_id {
            Some(expected) => expected == current,
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
