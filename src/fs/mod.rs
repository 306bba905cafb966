// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Virtual filesystem adapter: per-invocation staging, harvesting and teardown.

pub mod error;
mod name;
mod snapshot;
mod virtual_file;
mod workspace;

pub use error::{FsError, FsResult};
pub use name::{is_reserved, validate_file_name, RESERVED_NAMES};
pub use snapshot::{content_hash, ContentHash, Snapshot};
pub use virtual_file::VirtualFile;
pub use workspace::{TeardownGuard, Workspace};
