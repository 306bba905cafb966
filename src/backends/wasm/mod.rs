// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM backend: runs the WASI Preview 1 build of the tool under wasmtime.
//!
//! # Pipeline
//!
//! ```text
//! load_wasm_bytes → inspect_command → create_engine → compile + pre-link
//!                                                   ↓
//!                         per command: fresh Store → _start → ExitStatus
//! ```

pub mod detector;
pub mod engine;
pub mod error;
pub mod executor;
pub mod loader;

pub use detector::{inspect_command, CommandInterface, WASI_PREVIEW1_MODULE};
pub use error::{WasmError, WasmResult};
pub use executor::{WasiCommandRuntime, UNREACHABLE_TRAP_MESSAGE};
pub use loader::load_wasm_bytes;
