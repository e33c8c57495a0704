//! Host-side folding of the window buffer into a frequency table.

use crate::window::WindowBuffer;
use ahash::AHashMap;

/// Occurrence count per distinct window.
///
/// Insertion order is not kept; use [`FrequencyTable::sorted_rows`] for
/// ascending byte order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: AHashMap<Vec<u8>, u64>,
    window_len: usize,
    total: u64,
}

impl FrequencyTable {
    pub fn new(window_len: usize) -> Self {
        Self {
            counts: AHashMap::new(),
            window_len,
            total: 0,
        }
    }

    pub fn insert(&mut self, window: &[u8]) {
        debug_assert_eq!(window.len(), self.window_len);
        match self.counts.get_mut(window) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(window.to_vec(), 1);
            }
        }
        self.total += 1;
    }

    pub fn get(&self, window: &[u8]) -> Option<u64> {
        self.counts.get(window).copied()
    }

    /// Number of distinct windows.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the number of windows folded.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Rows in ascending lexicographic byte order.
    pub fn sorted_rows(&self) -> Vec<(&[u8], u64)> {
        let mut rows: Vec<(&[u8], u64)> = self
            .counts
            .iter()
            .map(|(k, &v)| (k.as_slice(), v))
            .collect();
        rows.sort_unstable_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

/// Fold every block of `buffer` into a new table.
///
/// Takes the buffer by value; it is dropped once the last block is counted.
pub fn aggregate(buffer: WindowBuffer) -> FrequencyTable {
    let mut table = FrequencyTable::new(buffer.window_len());
    for block in buffer.blocks() {
        table.insert(block);
    }
    tracing::debug!(
        "Folded {} windows into {} distinct keys",
        buffer.window_count(),
        table.len()
    );
    table
}
