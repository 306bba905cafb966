// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use base64::Engine as _;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A named, immutable byte buffer standing in for a file inside the sandbox.
///
/// The name is flat (no directories). The buffer is reference counted so a
/// file can be handed to several invocations without copying, and it is
/// never mutated once built: inputs stay exactly as the caller supplied them
/// and harvested outputs are freshly read buffers owned by the result.
///
/// # Example
/// ```
/// use openssl_wasm_bridge::fs::VirtualFile;
///
/// let file = VirtualFile::new("data.txt", b"hello".to_vec());
/// assert_eq!(file.name(), "data.txt");
/// assert_eq!(file.data(), b"hello");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct VirtualFile {
    name: String,
    #[serde(serialize_with = "serialize_base64")]
    data: Arc<[u8]>,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Convenience constructor for text content such as PEM files.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.as_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lossy UTF-8 view of the contents.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Returns a copy of this file with one byte replaced, leaving `self` untouched.
    ///
    /// Handy for tamper checks: flip a byte of a signature and re-verify.
    pub fn with_byte(&self, index: usize, value: u8) -> Option<Self> {
        if index >= self.data.len() {
            return None;
        }
        let mut bytes = self.data.to_vec();
        bytes[index] = value;
        Some(Self::new(self.name.clone(), bytes))
    }
}

impl fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualFile")
            .field("name", &self.name)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

fn serialize_base64<S: Serializer>(data: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}
