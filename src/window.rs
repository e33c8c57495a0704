//! Sequence and raw window buffer types shared by every backend.

use crate::error::{Result, WinFreqError};

/// Immutable byte sequence assembled from the input records.
///
/// Bytes are opaque symbols; nothing here validates an alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    bytes: Vec<u8>,
}

impl Sequence {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

/// Host copy of the flat extraction output.
///
/// Holds `window_count` blocks of `window_len` bytes; block `i` is the window
/// starting at sequence offset `i`.
#[derive(Debug)]
pub struct WindowBuffer {
    data: Vec<u8>,
    window_len: usize,
    window_count: usize,
}

impl WindowBuffer {
    /// Wrap a read-back buffer, checking that its size matches the dispatch.
    pub fn from_raw(data: Vec<u8>, window_len: usize, window_count: usize) -> Result<Self> {
        let expected = window_len
            .checked_mul(window_count)
            .ok_or_else(|| WinFreqError::Extraction("window buffer size overflows".into()))?;
        if window_len == 0 || data.len() != expected {
            return Err(WinFreqError::Extraction(format!(
                "window buffer holds {} bytes, expected {} ({} windows of length {})",
                data.len(),
                expected,
                window_count,
                window_len
            )));
        }
        Ok(Self { data, window_len, window_count })
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Blocks in index order.
    pub fn blocks(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.window_len)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
