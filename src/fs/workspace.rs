// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sandbox directory that serves as the wrapped tool's entire filesystem.
//!
//! The directory is private to one bridge, preopened to the module as `/`,
//! and removed from disk when the `Workspace` is dropped. Each invocation
//! runs the cycle `snapshot → stage → (execute) → harvest → reset`; the reset
//! is tied to a [`TeardownGuard`] so it runs on every exit path.

use crate::fs::error::{FsError, FsResult};
use crate::fs::name::{is_reserved, validate_file_name};
use crate::fs::snapshot::Snapshot;
use crate::fs::VirtualFile;
use crate::observability::messages::fs::{
    FilesHarvested, FilesStaged, SandboxCreated, WorkspaceReset, WorkspaceResetFailed,
};
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SANDBOX_PREFIX: &str = "openssl-bridge-";

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates an empty sandbox under the system temp directory.
    pub fn new() -> FsResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SANDBOX_PREFIX)
            .tempdir()
            .map_err(FsError::SandboxCreation)?;

        tracing::debug!(
            "{}",
            SandboxCreated {
                path: &dir.path().display().to_string(),
            }
        );

        Ok(Self { dir })
    }

    /// Host path of the sandbox root, i.e. what the module sees as `/`.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes each file under its bare name, overwriting silently.
    ///
    /// Every name is validated before anything is written, so a bad name
    /// leaves the sandbox untouched.
    pub fn stage(&self, files: &[VirtualFile]) -> FsResult<()> {
        for file in files {
            validate_file_name(file.name())?;
        }

        let mut total_bytes = 0;
        for file in files {
            fs::write(self.root().join(file.name()), file.data())
                .map_err(|e| FsError::io(file.name(), e))?;
            total_bytes += file.len();
        }

        FilesStaged {
            file_count: files.len(),
            total_bytes,
        }
        .log();

        Ok(())
    }

    /// Writes a bridge-owned environment file such as `ssl/openssl.cnf`.
    ///
    /// The first path component must be a reserved name; intermediate
    /// directories are created as needed.
    pub(crate) fn write_environment_file(&self, relative: &str, data: &[u8]) -> FsResult<()> {
        let top = relative.split('/').next().unwrap_or_default();
        if !is_reserved(top) {
            return Err(FsError::InvalidFileName {
                name: relative.to_string(),
                reason: "environment files must live under a reserved entry",
            });
        }

        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::io(relative, e))?;
        }
        fs::write(&path, data).map_err(|e| FsError::io(relative, e))
    }

    /// Records name and content hash of every non-reserved top-level file.
    pub fn snapshot(&self) -> FsResult<Snapshot> {
        let mut snapshot = Snapshot::new();
        for (name, path) in self.regular_files()? {
            let data = fs::read(&path).map_err(|e| FsError::io(&name, e))?;
            snapshot.record(name, &data);
        }
        Ok(snapshot)
    }

    /// Returns every file that is new or whose contents differ from `before`.
    ///
    /// Results are sorted by name.
    pub fn harvest(&self, before: &Snapshot) -> FsResult<Vec<VirtualFile>> {
        let mut harvested = Vec::new();
        let mut total_bytes = 0;

        for (name, path) in self.regular_files()? {
            let data = fs::read(&path).map_err(|e| FsError::io(&name, e))?;
            if before.is_unchanged(&name, &data) {
                continue;
            }
            total_bytes += data.len();
            harvested.push(VirtualFile::new(name, data));
        }

        FilesHarvested {
            file_count: harvested.len(),
            total_bytes,
        }
        .log();

        Ok(harvested)
    }

    /// Removes every entry in the sandbox, reserved ones included.
    ///
    /// Keeps going after a failed removal and reports the first error.
    pub fn reset(&self) -> FsResult<usize> {
        let mut removed = 0;
        let mut first_error = None;

        for entry in fs::read_dir(self.root()).map_err(|e| FsError::io("/", e))? {
            let entry = entry.map_err(|e| FsError::io("/", e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            let outcome = if is_dir {
                fs::remove_dir_all(entry.path())
            } else {
                fs::remove_file(entry.path())
            };

            match outcome {
                Ok(()) => removed += 1,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(FsError::io(name, e));
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                tracing::debug!("{}", WorkspaceReset { removed_entries: removed });
                Ok(removed)
            }
        }
    }

    /// Arms a guard that resets the sandbox when it goes out of scope.
    pub fn teardown_guard(&self) -> TeardownGuard<'_> {
        TeardownGuard { workspace: self }
    }

    /// Names of all top-level entries, reserved ones included, sorted.
    pub fn entries(&self) -> FsResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root()).map_err(|e| FsError::io("/", e))? {
            let entry = entry.map_err(|e| FsError::io("/", e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Non-reserved regular files at the top level, sorted by name.
    ///
    /// Directories, symlinks and non-UTF-8 names are skipped.
    fn regular_files(&self) -> FsResult<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(self.root()).map_err(|e| FsError::io("/", e))? {
            let entry = entry.map_err(|e| FsError::io("/", e))?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!("Skipping sandbox entry with a non UTF-8 name");
                continue;
            };
            if is_reserved(&name) {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| FsError::io(&name, e))?;
            if file_type.is_file() {
                files.push((name, entry.path()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

/// Resets the workspace on drop.
///
/// Failures are logged rather than returned. Anything left behind is
/// cleared by the explicit reset at the start of the next invocation.
pub struct TeardownGuard<'a> {
    workspace: &'a Workspace,
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.workspace.reset() {
            WorkspaceResetFailed { error: &error }.log();
        }
    }
}
