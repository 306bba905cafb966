// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tool runtime backends.
//!
//! Each backend implements [`crate::traits::ToolRuntime`] and is driven by the
//! serializer's worker thread, one command at a time.
//!
//! # Available Backends
//!
//! ## WASM Backend
//! Runs the WASI Preview 1 build of OpenSSL under wasmtime:
//! - **Isolation**: fresh store, fresh stdout/stderr pipes, sandbox preopened as `/`
//! - **Limits**: fuel budget and linear-memory ceiling per command
//! - **Traps**: reported as an exit status, never as a host error
//!
//! ## Stub Backend (Test-Only)
//! `ScriptedTool` answers subcommands with closures over the same sandbox,
//! for exercising the lifecycle without a real OpenSSL build.
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ```rust,no_run
//! use openssl_wasm_bridge::backends::wasm::WasiCommandRuntime;
//! use openssl_wasm_bridge::config::BridgeConfig;
//!
//! let runtime = WasiCommandRuntime::from_config(&BridgeConfig::new("wasm/openssl.wasm"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(test)]
pub mod stub;
pub mod wasm;
