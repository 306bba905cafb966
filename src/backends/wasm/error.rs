// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for loading and preparing the tool module.
//!
//! Execution-time problems (traps, nonzero exits) are not errors at this
//! layer; they are reported through [`crate::traits::ExitStatus`]. Everything
//! here happens before the first command runs and surfaces to callers as
//! `BridgeError::Startup`.

use thiserror::Error;

/// Error message for Component Model binaries, which this runtime does not host.
pub const WASM_UNSUPPORTED_ENCODING: &str = "Unsupported WASM binary: Component Model binary detected. \
The bridge runs WASI Preview 1 command modules (core WASM exporting `_start`).";

/// Error type for WASM module loading and preparation.
#[derive(Error, Debug)]
pub enum WasmError {
    /// Invalid or malformed WASM binary format.
    #[error("Invalid WASM binary: {0}")]
    InvalidWasmBinary(String),

    /// Module compilation, linking, or pre-instantiation error.
    #[error("WASM module error: {0}")]
    ModuleError(String),

    /// File I/O error during module loading.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The module does not fit the WASI command shape (size, imports, exports).
    #[error("Invalid module: {0}")]
    ValidationError(String),

    /// Wasmtime engine creation or configuration error.
    #[error("Engine creation error: {0}")]
    EngineError(String),

    /// Unsupported WASM encoding (Component Model).
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// WASM binary parsing error from wasmparser.
    #[error("WASM parser error: {0}")]
    ParserError(#[from] wasmparser::BinaryReaderError),
}

/// Result type alias for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
