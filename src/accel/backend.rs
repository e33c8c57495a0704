use crate::error::Result;
use crate::partition::DispatchShape;
use crate::window::{Sequence, WindowBuffer};

/// Which extraction backend a run may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Try the GPU, fall back to the CPU when no device is found
    #[default]
    Auto,
    /// GPU only; a missing device is fatal
    Gpu,
    /// CPU thread pool only
    Cpu,
}

/// Trait for window extraction backends (CPU or GPU)
///
/// This abstraction allows swapping between CPU (Rayon) and GPU (OpenCL)
/// implementations transparently.
pub trait WindowExtractor: Send + Sync {
    /// Copy every window of `sequence` into a flat buffer
    ///
    /// # Arguments
    /// * `sequence` - Input sequence, read-only
    /// * `shape` - Dispatch shape from [`crate::partition::plan`]
    ///
    /// # Returns
    /// Buffer whose block `i` equals `sequence[i..i + shape.window_len]`
    fn extract(&self, sequence: &Sequence, shape: &DispatchShape) -> Result<WindowBuffer>;

    /// Largest group size this backend accepts
    fn max_group_size(&self) -> usize;

    /// Returns the name of this backend
    fn name(&self) -> String;

    /// Returns whether this backend is GPU-accelerated
    fn is_gpu(&self) -> bool;
}
