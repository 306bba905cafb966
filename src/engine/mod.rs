// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution core: the per-command lifecycle and the queue that serializes it.

pub mod invocation;
pub mod serializer;

pub use invocation::Invoker;
pub use serializer::{PendingResult, Serializer};
