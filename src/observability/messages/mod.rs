// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output. Types that
//! carry fields worth querying also implement [`StructuredLog`], which emits the
//! same text together with those fields as tracing key/values.
//!
//! # Usage Pattern
//!
//! ```rust
//! use openssl_wasm_bridge::observability::messages::bridge::InvocationQueued;
//! use openssl_wasm_bridge::observability::messages::StructuredLog;
//!
//! let msg = InvocationQueued {
//!     ticket: 7,
//!     subcommand: "genpkey",
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod bridge;
pub mod fs;
pub mod wasm;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its designated level with structured fields attached.
    fn log(&self);

    /// Build a span carrying the message's fields.
    ///
    /// Messages without fields worth scoping over keep this bare span.
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("message", span_name = name)
    }
}
