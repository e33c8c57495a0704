//! Work partitioning: window count and dispatch shape.

use crate::error::{Result, WinFreqError};
use serde::Serialize;

/// Group size ceiling used when a backend does not report its own.
pub const DEFAULT_MAX_GROUP_SIZE: usize = 1024;

/// How the windows are split into work-items and groups.
///
/// `padded_global_size` is `total_work_items` rounded up to a multiple of
/// `group_size`. Work-items with an index at or beyond `total_work_items` do
/// nothing, so every window is produced exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchShape {
    pub window_len: usize,
    pub total_work_items: usize,
    pub group_size: usize,
    pub padded_global_size: usize,
}

impl DispatchShape {
    pub fn group_count(&self) -> usize {
        self.padded_global_size / self.group_size
    }

    /// Bytes needed for the flat output buffer.
    pub fn output_len(&self) -> usize {
        self.total_work_items * self.window_len
    }
}

/// Validate the window length and return the number of windows.
///
/// Runs before any device resource is acquired.
pub fn window_count(sequence_len: usize, window_len: i64) -> Result<usize> {
    let invalid = || WinFreqError::InvalidWindowLength { window_len, sequence_len };

    if window_len <= 0 || sequence_len == 0 {
        return Err(invalid());
    }
    let len = usize::try_from(window_len).map_err(|_| invalid())?;
    if len > sequence_len {
        return Err(invalid());
    }
    let total = sequence_len - len + 1;
    total
        .checked_mul(len)
        .ok_or_else(|| WinFreqError::InvalidConfig("window buffer size overflows".into()))?;
    Ok(total)
}

/// Plan the dispatch for a sequence of `sequence_len` bytes.
///
/// Group size is capped by the window count, then by `device_max_group`,
/// then by `core_hint`. The hint is never exceeded or rounded up.
pub fn plan(
    sequence_len: usize,
    window_len: i64,
    core_hint: usize,
    device_max_group: usize,
) -> Result<DispatchShape> {
    let total_work_items = window_count(sequence_len, window_len)?;
    if core_hint == 0 {
        return Err(WinFreqError::InvalidConfig("core hint must be at least 1".into()));
    }
    let window_len = sequence_len - total_work_items + 1;

    let group_size = total_work_items
        .min(device_max_group.max(1))
        .min(core_hint);
    let padded_global_size = total_work_items.div_ceil(group_size) * group_size;

    Ok(DispatchShape {
        window_len,
        total_work_items,
        group_size,
        padded_global_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_capped_by_total() {
        let sequence_len = 1000 + 3 - 1;
        let shape = plan(sequence_len, 3, 2048, DEFAULT_MAX_GROUP_SIZE).unwrap();
        assert_eq!(shape.total_work_items, 1000);
        assert_eq!(shape.group_size, 1000);
        assert_eq!(shape.padded_global_size, 1000);
    }

    #[test]
    fn test_group_capped_by_device_then_hint() {
        let shape = plan(5000, 1, 4096, 1024).unwrap();
        assert_eq!(shape.group_size, 1024);

        let shape = plan(5000, 1, 64, 1024).unwrap();
        assert_eq!(shape.group_size, 64);
    }

    #[test]
    fn test_uneven_total_is_padded() {
        // 10 windows, groups of 4: three groups, two idle work-items
        let shape = plan(12, 3, 4, 1024).unwrap();
        assert_eq!(shape.total_work_items, 10);
        assert_eq!(shape.group_size, 4);
        assert_eq!(shape.padded_global_size, 12);
        assert_eq!(shape.group_count(), 3);
        assert!(shape.padded_global_size >= shape.total_work_items);
        assert!(shape.padded_global_size - shape.total_work_items < shape.group_size);
    }

    #[test]
    fn test_window_equal_to_sequence() {
        let shape = plan(4, 4, 1, 1024).unwrap();
        assert_eq!(shape.total_work_items, 1);
        assert_eq!(shape.group_size, 1);
        assert_eq!(shape.output_len(), 4);
    }

    #[test]
    fn test_invalid_window_lengths() {
        for (n, l) in [(4, 0), (4, -2), (4, 5), (0, 1), (0, 3)] {
            match plan(n, l, 1, 1024) {
                Err(WinFreqError::InvalidWindowLength { window_len, sequence_len }) => {
                    assert_eq!(window_len, l);
                    assert_eq!(sequence_len, n);
                }
                other => panic!("expected InvalidWindowLength for n={} l={}, got {:?}", n, l, other),
            }
        }
    }

    #[test]
    fn test_window_count() {
        assert_eq!(window_count(4, 2).unwrap(), 3);
        assert_eq!(window_count(4, 4).unwrap(), 1);
        assert!(window_count(0, 1).is_err());
    }

    #[test]
    fn test_zero_core_hint_rejected() {
        assert!(matches!(plan(10, 2, 0, 1024), Err(WinFreqError::InvalidConfig(_))));
    }

    #[test]
    fn test_group_size_at_least_one() {
        for n in 1..40usize {
            for l in 1..=n {
                for hint in [1usize, 3, 7, 2048] {
                    let shape = plan(n, l as i64, hint, 16).unwrap();
                    assert_eq!(shape.total_work_items, n - l + 1);
                    assert!(shape.group_size >= 1);
                    assert!(shape.group_size <= hint.min(16));
                    assert_eq!(shape.padded_global_size % shape.group_size, 0);
                }
            }
        }
    }
}
