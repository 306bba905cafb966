// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! File name rules for the flat sandbox namespace.

use crate::fs::error::{FsError, FsResult};

/// Entries the bridge owns inside the sandbox for environment preparation.
///
/// They are never harvested and callers cannot stage files over them.
pub const RESERVED_NAMES: &[&str] = &["ssl", "random.seed", "tmp", "dev", "proc"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Checks that `name` addresses a single entry in the working directory.
///
/// Rejects empty names, `.`, anything containing `..`, path separators
/// (`/` or `\`), NUL bytes, and reserved environment entries.
///
/// # Example
/// ```
/// use openssl_wasm_bridge::fs::validate_file_name;
///
/// assert!(validate_file_name("ca.pem").is_ok());
/// assert!(validate_file_name("../etc/passwd").is_err());
/// ```
pub fn validate_file_name(name: &str) -> FsResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." {
        Some("name refers to the working directory")
    } else if name.contains("..") {
        Some("name contains '..'")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else if is_reserved(name) {
        Some("name is reserved for the tool environment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FsError::InvalidFileName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
