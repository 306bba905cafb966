// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // tool runtimes
pub mod bridge;     // caller-facing façade
pub mod command;    // tokenizer + per-command environment
pub mod config;     // YAML configuration
pub mod engine;     // invocation lifecycle + serializer
pub mod errors;     // error handling
pub mod fs;         // sandbox staging / harvesting
pub mod observability;
pub mod traits;     // runtime seam

pub use bridge::{CommandResult, OpenSslBridge, PendingResult};
pub use errors::{BridgeError, CommandFailure};
pub use fs::VirtualFile;
