// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for sandbox filesystem operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    /// File name would escape the flat working directory or is otherwise unusable.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: &'static str },

    /// The sandbox directory itself could not be created.
    #[error("Failed to create sandbox directory: {0}")]
    SandboxCreation(#[source] std::io::Error),

    /// Reading or writing a file inside the sandbox failed.
    #[error("I/O error on '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub(crate) fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        FsError::Io {
            name: name.into(),
            source,
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;
