// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the bridge. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep log wording in one place per subsystem
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::bridge` - Serializer and façade lifecycle events
//! * `messages::fs` - Sandbox staging, harvesting and teardown
//! * `messages::wasm` - Module loading and command execution events
//!
//! # Usage
//!
//! ```rust
//! use openssl_wasm_bridge::observability::messages::wasm::ModuleLoaded;
//!
//! let msg = ModuleLoaded {
//!     module_path: "wasm/openssl.wasm",
//!     size_bytes: 4096,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod messages;
