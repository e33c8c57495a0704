pub mod backend;
pub mod cpu_backend;
pub mod gpu_backend;

pub use backend::{BackendKind, WindowExtractor};
pub use cpu_backend::CpuExtractor;
pub use gpu_backend::GpuExtractor;

use crate::error::{Result, WinFreqError};

/// Create the extraction backend for a run
///
/// # Arguments
/// * `kind` - Requested backend
/// * `core_hint` - Thread count for the CPU backend
/// * `program_source` - Device program built when a GPU is opened
///
/// # Returns
/// Box containing the selected backend
pub fn create_extractor(
    kind: BackendKind,
    core_hint: usize,
    program_source: &str,
) -> Result<Box<dyn WindowExtractor>> {
    select_extractor(kind, core_hint, || GpuExtractor::open(program_source))
}

/// Pick a backend given a way to open the GPU
///
/// `open_gpu` is only called for `Gpu` and `Auto`. `Auto` falls back to the
/// CPU on `DeviceUnavailable` alone; any other error, a failed program build
/// included, is returned unchanged.
pub fn select_extractor<F>(
    kind: BackendKind,
    core_hint: usize,
    open_gpu: F,
) -> Result<Box<dyn WindowExtractor>>
where
    F: FnOnce() -> Result<GpuExtractor>,
{
    match kind {
        BackendKind::Cpu => Ok(Box::new(CpuExtractor::with_threads(core_hint)?)),
        BackendKind::Gpu => Ok(Box::new(open_gpu()?)),
        BackendKind::Auto => match open_gpu() {
            Ok(gpu) => {
                tracing::info!("Using GPU backend");
                Ok(Box::new(gpu))
            }
            Err(WinFreqError::DeviceUnavailable(reason)) => {
                tracing::warn!("GPU not available ({}), using CPU backend", reason);
                Ok(Box::new(CpuExtractor::with_threads(core_hint)?))
            }
            Err(e) => Err(e),
        },
    }
}
