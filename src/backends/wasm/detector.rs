// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! WASM binary shape detection
//!
//! Uses wasmparser to check, before compilation, that the binary is a WASI
//! Preview 1 command: a core module (not a component) whose imports all come
//! from `wasi_snapshot_preview1` and which exports a `_start` function.

use crate::backends::wasm::error::{WasmError, WASM_UNSUPPORTED_ENCODING};

use wasmparser::{Encoding, ExternalKind, Parser, Payload};

/// Import module name for WASI Preview 1.
pub const WASI_PREVIEW1_MODULE: &str = "wasi_snapshot_preview1";

/// Entry point exported by WASI command modules.
pub const COMMAND_ENTRY_POINT: &str = "_start";

/// What the bridge needs to know about a command module before running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInterface {
    /// Names of the WASI functions the module imports.
    pub wasi_imports: Vec<String>,
    /// Whether the module exports a `_start` function.
    pub has_entry_point: bool,
}

/// Parses a binary and describes its command interface.
///
/// # Errors
/// Returns an error if:
/// - The input is empty, truncated, or otherwise invalid per the WASM spec
/// - The binary is a Component Model component
/// - The module imports anything outside `wasi_snapshot_preview1`
///
/// A missing `_start` export is not an error here; see
/// [`require_entry_point`].
pub fn inspect_command(bytes: &[u8]) -> Result<CommandInterface, WasmError> {
    let mut encoding = None;
    let mut wasi_imports = Vec::new();
    let mut has_entry_point = false;

    for payload in Parser::new(0).parse_all(bytes) {
        match payload? {
            Payload::Version { encoding: enc, .. } => {
                if enc == Encoding::Component {
                    return Err(WasmError::UnsupportedEncoding(
                        WASM_UNSUPPORTED_ENCODING.to_string(),
                    ));
                }
                encoding = Some(enc);
            }
            Payload::ImportSection(reader) => {
                for import in reader {
                    let import = import?;
                    if import.module != WASI_PREVIEW1_MODULE {
                        return Err(WasmError::ValidationError(format!(
                            "import '{}::{}' is not provided; only {} imports are available",
                            import.module, import.name, WASI_PREVIEW1_MODULE
                        )));
                    }
                    wasi_imports.push(import.name.to_string());
                }
            }
            Payload::ExportSection(reader) => {
                for export in reader {
                    let export = export?;
                    if export.name == COMMAND_ENTRY_POINT && export.kind == ExternalKind::Func {
                        has_entry_point = true;
                    }
                }
            }
            _ => {}
        }
    }

    if encoding.is_none() {
        return Err(WasmError::InvalidWasmBinary("Invalid WASM binary".to_string()));
    }

    Ok(CommandInterface {
        wasi_imports,
        has_entry_point,
    })
}

/// Rejects modules that cannot be run as a command.
pub fn require_entry_point(interface: &CommandInterface) -> Result<(), WasmError> {
    if interface.has_entry_point {
        Ok(())
    } else {
        Err(WasmError::ValidationError(format!(
            "module does not export a `{}` function; expected a WASI command module",
            COMMAND_ENTRY_POINT
        )))
    }
}
