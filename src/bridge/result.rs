// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::CommandFailure;
use crate::fs::VirtualFile;
use serde::Serialize;

/// Everything one command produced.
///
/// A `CommandResult` is returned even when the command failed: `error` says
/// why, and any files or output produced before the failure are still here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Captured standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Files created or modified by the command, sorted by name.
    pub files: Vec<VirtualFile>,
    pub error: Option<CommandFailure>,
    /// Exit code when the tool exited; `None` after a trap or when the
    /// tool never ran.
    pub exit_status: Option<i32>,
}

impl CommandResult {
    /// A result for a command that failed before producing any output.
    pub fn failed(failure: CommandFailure) -> Self {
        Self {
            error: Some(failure),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Output file by name.
    pub fn file(&self, name: &str) -> Option<&VirtualFile> {
        self.files.iter().find(|file| file.name() == name)
    }

    /// Whether stdout or stderr contains `phrase`.
    ///
    /// For callers that look for phrases such as `Verified OK`; the exit
    /// status in `error`/`exit_status` is the authoritative signal.
    pub fn output_contains(&self, phrase: &str) -> bool {
        self.stdout.contains(phrase) || self.stderr.contains(phrase)
    }
}
