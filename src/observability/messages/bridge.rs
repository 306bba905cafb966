// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for serializer and façade lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Bridge startup and shutdown
//! * Request validation and queueing
//! * Invocation completion and abandoned callers

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Bridge worker started and ready to accept commands.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BridgeStarted<'a> {
    pub runtime: &'a str,
    pub program: &'a str,
}

impl Display for BridgeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Command bridge ready: program '{}' on {} runtime",
            self.program, self.runtime
        )
    }
}

/// Bridge worker drained its queue and exited.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BridgeStopped {
    pub completed_invocations: u64,
}

impl Display for BridgeStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Command bridge stopped after {} invocation(s)",
            self.completed_invocations
        )
    }
}

/// Request rejected before reaching the queue.
///
/// # Log Level
/// `warn!` - Caller misuse
///
/// # Example
/// ```
/// use openssl_wasm_bridge::observability::messages::bridge::CommandRejected;
///
/// let error = std::io::Error::new(std::io::ErrorKind::InvalidInput, "unbalanced quote");
/// let msg = CommandRejected {
///     command: "req -subj \"/CN=x",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct CommandRejected<'a> {
    pub command: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for CommandRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected command '{}': {}", self.command, self.error)
    }
}

impl StructuredLog for CommandRejected<'_> {
    fn log(&self) {
        tracing::warn!(command = self.command, error = %self.error, "{}", self);
    }
}

/// Request appended to the FIFO queue.
///
/// # Log Level
/// `debug!` - Per-invocation detail
pub struct InvocationQueued<'a> {
    pub ticket: u64,
    pub subcommand: &'a str,
}

impl Display for InvocationQueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queued invocation #{} ({})", self.ticket, self.subcommand)
    }
}

impl StructuredLog for InvocationQueued<'_> {
    fn log(&self) {
        tracing::debug!(ticket = self.ticket, subcommand = self.subcommand, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "invocation",
            span_name = name,
            ticket = self.ticket,
            subcommand = self.subcommand,
        )
    }
}

/// Invocation finished its stage/dispatch/harvest/reset cycle.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InvocationCompleted<'a> {
    pub ticket: u64,
    pub subcommand: &'a str,
    pub outcome: &'a str,
    pub file_count: usize,
    pub duration: Duration,
}

impl Display for InvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation #{} ({}) finished: {}, {} output file(s) in {:?}",
            self.ticket, self.subcommand, self.outcome, self.file_count, self.duration
        )
    }
}

impl StructuredLog for InvocationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            ticket = self.ticket,
            subcommand = self.subcommand,
            outcome = self.outcome,
            file_count = self.file_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// Result produced after the caller stopped waiting.
///
/// # Log Level
/// `debug!` - Expected with caller-side timeouts
pub struct InvocationAbandoned {
    pub ticket: u64,
}

impl Display for InvocationAbandoned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invocation #{} completed after its caller stopped waiting; result dropped",
            self.ticket
        )
    }
}

/// Follow-up suggestion after a key was generated.
///
/// # Log Level
/// `info!` - Guidance for interactive users
pub struct PublicKeyHint<'a> {
    pub private_key: &'a str,
    pub public_key: &'a str,
}

impl Display for PublicKeyHint<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "To extract the public key, run: openssl pkey -in {} -pubout -out {}",
            self.private_key, self.public_key
        )
    }
}
