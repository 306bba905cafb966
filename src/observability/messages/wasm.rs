// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for WASM module loading and command execution events.
//!
//! This module contains message types for logging events related to:
//! * Tool binary loading and validation
//! * Engine creation and module compilation
//! * Command execution lifecycle, exit status and traps

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// WASM module loaded successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::wasm::ModuleLoaded;
///
/// let msg = ModuleLoaded {
///     module_path: "wasm/openssl.wasm",
///     size_bytes: 4096,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ModuleLoaded<'a> {
    pub module_path: &'a str,
    pub size_bytes: usize,
}

impl Display for ModuleLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded WASM module: {} ({} bytes)",
            self.module_path, self.size_bytes
        )
    }
}

/// WASM module loading failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::wasm::ModuleLoadFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
/// let msg = ModuleLoadFailed {
///     module_path: "wasm/missing.wasm",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleLoadFailed<'a> {
    pub module_path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ModuleLoadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to load WASM module '{}': {}",
            self.module_path, self.error
        )
    }
}

/// Module compiled and pre-linked against WASI Preview 1.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ModuleCompiled<'a> {
    pub module_path: &'a str,
    pub wasi_import_count: usize,
    pub duration: Duration,
}

impl Display for ModuleCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled WASM module '{}' with {} WASI imports in {:?}",
            self.module_path, self.wasi_import_count, self.duration
        )
    }
}

/// WASM engine creation started.
///
/// # Log Level
/// `debug!` - Setup detail
pub struct EngineCreationStarted {
    pub fuel_metering: bool,
}

impl Display for EngineCreationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Creating WASM engine (fuel metering {})",
            if self.fuel_metering { "on" } else { "off" }
        )
    }
}

/// Command dispatched to the module entry point.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::wasm::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     program: "openssl",
///     subcommand: "genpkey",
///     arg_count: 4,
///     fuel: 1_000_000,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub program: &'a str,
    pub subcommand: &'a str,
    pub arg_count: usize,
    pub fuel: u64,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executing '{} {}' with {} argument(s), fuel={}",
            self.program, self.subcommand, self.arg_count, self.fuel
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            program = self.program,
            subcommand = self.subcommand,
            arg_count = self.arg_count,
            fuel = self.fuel,
            "{}", self
        );
    }
}

/// Module returned or called `proc_exit`.
///
/// # Log Level
/// `info!` for status 0, `warn!` otherwise
pub struct ExecutionCompleted<'a> {
    pub subcommand: &'a str,
    pub exit_status: i32,
    pub stdout_bytes: usize,
    pub stderr_bytes: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' exited with status {} in {:?}: stdout={} bytes, stderr={} bytes",
            self.subcommand, self.exit_status, self.duration, self.stdout_bytes, self.stderr_bytes
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        if self.exit_status == 0 {
            tracing::info!(
                subcommand = self.subcommand,
                exit_status = self.exit_status,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                subcommand = self.subcommand,
                exit_status = self.exit_status,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }
}

/// Module trapped or aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::wasm::ModuleTrapped;
///
/// let msg = ModuleTrapped {
///     subcommand: "genpkey",
///     reason: "wasm trap: out of fuel",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ModuleTrapped<'a> {
    pub subcommand: &'a str,
    pub reason: &'a str,
}

impl Display for ModuleTrapped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "WASM module trapped during '{}': {}", self.subcommand, self.reason)
    }
}

impl StructuredLog for ModuleTrapped<'_> {
    fn log(&self) {
        tracing::error!(subcommand = self.subcommand, reason = self.reason, "{}", self);
    }
}
