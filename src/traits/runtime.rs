// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The seam between the invocation lifecycle and whatever actually runs the tool.
//!
//! The lifecycle owns the sandbox and the argument vector; a `ToolRuntime`
//! only has to run one command against a prepared directory and report what
//! it printed and how it ended.

use std::path::Path;

/// One dispatch of the tool's entry point.
#[derive(Debug, Clone, Copy)]
pub struct ToolInvocation<'a> {
    /// Full argv, program name first.
    pub argv: &'a [String],
    /// Environment variables visible to the tool.
    pub env: &'a [(String, String)],
    /// Host directory the tool sees as its filesystem root.
    pub root: &'a Path,
}

impl ToolInvocation<'_> {
    /// The subcommand (argv[1]), or an empty string.
    pub fn subcommand(&self) -> &str {
        self.argv.get(1).map(String::as_str).unwrap_or_default()
    }
}

/// How the tool's entry point ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal return (status 0) or an explicit exit with this status.
    Exited(i32),
    /// The module trapped or aborted; the string describes why.
    Trapped(String),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Exited(code) => Some(*code),
            ExitStatus::Trapped(_) => None,
        }
    }
}

/// Captured streams and exit status of one dispatch.
///
/// Output written before a trap is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
}

/// Error raised when the runtime could not even start the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFailure(pub String);

impl std::fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RuntimeFailure {}

/// Runs single commands against a prepared sandbox.
///
/// Implementations are driven from exactly one thread at a time (the
/// serializer's worker), hence `&mut self` and `Send` without `Sync`.
pub trait ToolRuntime: Send {
    /// Runs the entry point once with fresh stdout/stderr capture.
    ///
    /// Traps are reported through [`ExitStatus::Trapped`]; `Err` is reserved
    /// for failures before the entry point ran (e.g. instantiation).
    fn invoke(&mut self, invocation: &ToolInvocation<'_>) -> Result<ToolOutput, RuntimeFailure>;

    /// Human-readable runtime description for logs.
    fn runtime_type(&self) -> &'static str;
}
