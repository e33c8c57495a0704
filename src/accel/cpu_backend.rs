use crate::accel::backend::WindowExtractor;
use crate::error::{Result, WinFreqError};
use crate::partition::{DispatchShape, DEFAULT_MAX_GROUP_SIZE};
use crate::window::{Sequence, WindowBuffer};
use rayon::prelude::*;
use rayon::ThreadPool;

/// CPU-based extraction backend using Rayon for parallelization
///
/// Runs on its own pool so the thread count follows the core hint without
/// touching the global pool. The pool never exceeds the available cores.
pub struct CpuExtractor {
    pool: ThreadPool,
    num_threads: usize,
}

impl CpuExtractor {
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        if num_threads == 0 {
            return Err(WinFreqError::InvalidConfig("thread count must be at least 1".into()));
        }
        let available = num_cpus::get().max(1);
        let num_threads = if num_threads > available {
            tracing::warn!(
                "Requested {} threads but only {} cores are available; using {}",
                num_threads,
                available,
                available
            );
            available
        } else {
            num_threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("winfreq-cpu-{}", i))
            .build()
            .map_err(|e| WinFreqError::Extraction(format!("Failed to build thread pool: {}", e)))?;
        Ok(Self { pool, num_threads })
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}

impl WindowExtractor for CpuExtractor {
    fn extract(&self, sequence: &Sequence, shape: &DispatchShape) -> Result<WindowBuffer> {
        let k = shape.window_len;
        let bytes = sequence.as_bytes();
        if bytes.len() < k || bytes.len() - k + 1 != shape.total_work_items {
            return Err(WinFreqError::Extraction(format!(
                "dispatch shape ({} windows of length {}) does not match sequence length {}",
                shape.total_work_items,
                k,
                bytes.len()
            )));
        }

        let mut out = vec![0u8; shape.output_len()];
        // Each block is written by exactly one task; group size sets the
        // smallest unit of work handed to a thread.
        self.pool.install(|| {
            out.par_chunks_mut(k)
                .with_min_len(shape.group_size)
                .enumerate()
                .for_each(|(i, block)| block.copy_from_slice(&bytes[i..i + k]));
        });

        WindowBuffer::from_raw(out, k, shape.total_work_items)
    }

    fn max_group_size(&self) -> usize {
        DEFAULT_MAX_GROUP_SIZE
    }

    fn name(&self) -> String {
        format!("CPU (Rayon, {} threads)", self.num_threads)
    }

    fn is_gpu(&self) -> bool {
        false
    }
}
