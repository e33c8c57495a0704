//! GPU window extraction - optional OpenCL acceleration
#[cfg(feature = "gpu")]
pub mod session;

#[cfg(feature = "gpu")]
pub use session::{get_gpu_info, is_gpu_available, DeviceSession, KERNEL_NAME};

/// Embedded copy of the extraction program.
pub const EXTRACT_KERNEL_SOURCE: &str = include_str!("kernels/extract_windows.cl");

#[cfg(not(feature = "gpu"))]
pub fn is_gpu_available() -> bool {
    false
}

#[cfg(not(feature = "gpu"))]
pub fn get_gpu_info() -> Option<String> {
    None
}
