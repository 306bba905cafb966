// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod runtime;

pub use runtime::{ExitStatus, RuntimeFailure, ToolInvocation, ToolOutput, ToolRuntime};
