// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for sandbox filesystem events.
//!
//! This module contains message types for logging events related to:
//! * Sandbox creation
//! * Input staging and output harvesting
//! * Per-invocation teardown

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Sandbox directory created.
///
/// # Log Level
/// `debug!` - Setup detail
pub struct SandboxCreated<'a> {
    pub path: &'a str,
}

impl Display for SandboxCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Created sandbox directory at {}", self.path)
    }
}

/// Input files written into the sandbox.
///
/// # Log Level
/// `debug!` - Per-invocation detail
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::fs::FilesStaged;
///
/// let msg = FilesStaged {
///     file_count: 2,
///     total_bytes: 4096,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FilesStaged {
    pub file_count: usize,
    pub total_bytes: usize,
}

impl Display for FilesStaged {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Staged {} input file(s), {} bytes",
            self.file_count, self.total_bytes
        )
    }
}

impl StructuredLog for FilesStaged {
    fn log(&self) {
        tracing::debug!(
            file_count = self.file_count,
            total_bytes = self.total_bytes,
            "{}", self
        );
    }
}

/// Output files collected from the sandbox.
///
/// # Log Level
/// `debug!` - Per-invocation detail
pub struct FilesHarvested {
    pub file_count: usize,
    pub total_bytes: usize,
}

impl Display for FilesHarvested {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Harvested {} output file(s), {} bytes",
            self.file_count, self.total_bytes
        )
    }
}

impl StructuredLog for FilesHarvested {
    fn log(&self) {
        tracing::debug!(
            file_count = self.file_count,
            total_bytes = self.total_bytes,
            "{}", self
        );
    }
}

/// Sandbox cleared after an invocation.
///
/// # Log Level
/// `debug!` - Per-invocation detail
pub struct WorkspaceReset {
    pub removed_entries: usize,
}

impl Display for WorkspaceReset {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Reset sandbox: removed {} entries", self.removed_entries)
    }
}

/// Sandbox could not be fully cleared.
///
/// # Log Level
/// `error!` - The next invocation may see leftovers
pub struct WorkspaceResetFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkspaceResetFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to reset sandbox: {}", self.error)
    }
}

impl StructuredLog for WorkspaceResetFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}
