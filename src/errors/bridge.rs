// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Caller-facing error types.
//!
//! [`BridgeError`] is returned as `Err` and covers misuse plus host-level
//! conditions. [`CommandFailure`] travels inside a successful
//! `CommandResult` and covers everything that went wrong while the tool ran.

use crate::command::TokenizeError;
use crate::fs::FsError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// An input file name contains a separator, `..`, or a reserved name.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: &'static str },

    /// The command string could not be tokenized.
    #[error("Malformed command: {0}")]
    MalformedCommand(#[from] TokenizeError),

    /// Module loading, compilation, or worker creation failed.
    #[error("Failed to start command bridge: {0}")]
    Startup(String),

    /// The serializer has shut down and no longer accepts or answers requests.
    #[error("Command bridge is no longer running")]
    Unavailable,

    /// The caller stopped waiting; the invocation itself still runs to completion.
    #[error("Command timed out after {0:?}; the invocation keeps running in the background")]
    Timeout(Duration),
}

impl BridgeError {
    /// Maps a staging-time filesystem error onto the caller-facing taxonomy.
    pub(crate) fn from_staging(error: FsError) -> Self {
        match error {
            FsError::InvalidFileName { name, reason } => BridgeError::InvalidFileName { name, reason },
            other => BridgeError::Startup(other.to_string()),
        }
    }
}

/// Why a command did not succeed, reported inside the result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandFailure {
    /// The tool ran and exited with a nonzero status.
    #[error("{program} exited with status {status}")]
    ToolExecution { program: String, status: i32 },

    /// The module trapped, aborted, or could not be instantiated.
    #[error("{reason}")]
    ModuleTrap { reason: String },

    /// The sandbox could not be staged or harvested.
    #[error("Sandbox error: {message}")]
    Workspace { message: String },
}
