// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Content-addressed record of the sandbox at a point in time.
//!
//! A snapshot maps each top-level file name to the SHA-256 of its contents.
//! Harvesting compares the post-execution directory against it so that only
//! created or modified files come back to the caller.

use crate::fs::VirtualFile;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub type ContentHash = [u8; 32];

pub fn content_hash(data: &[u8]) -> ContentHash {
    Sha256::digest(data).into()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, ContentHash>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, data: &[u8]) {
        self.entries.insert(name.into(), content_hash(data));
    }

    /// Folds staged inputs into the snapshot so unchanged inputs are not harvested.
    ///
    /// Last write wins, matching staging semantics for repeated names.
    pub fn absorb(&mut self, files: &[VirtualFile]) {
        for file in files {
            self.record(file.name(), file.data());
        }
    }

    /// True when `name` was present with exactly these contents.
    pub fn is_unchanged(&self, name: &str, data: &[u8]) -> bool {
        self.entries
            .get(name)
            .is_some_and(|hash| *hash == content_hash(data))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
