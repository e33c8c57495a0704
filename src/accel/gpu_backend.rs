use crate::accel::backend::WindowExtractor;
use crate::error::{Result, WinFreqError};
use crate::partition::DispatchShape;
use crate::window::{Sequence, WindowBuffer};

#[cfg(feature = "gpu")]
use crate::gpu::DeviceSession;

/// GPU-accelerated extraction backend using OpenCL
///
/// Owns the device session for one run. Dropping the backend releases the
/// program, queue and context.
pub struct GpuExtractor {
    #[cfg(feature = "gpu")]
    session: DeviceSession,
}

impl GpuExtractor {
    /// Acquire a device and build the extraction program on it
    #[cfg(feature = "gpu")]
    pub fn open(program_source: &str) -> Result<Self> {
        let mut session = DeviceSession::open()?;
        session.compile(program_source)?;
        Ok(GpuExtractor { session })
    }

    #[cfg(not(feature = "gpu"))]
    pub fn open(_program_source: &str) -> Result<Self> {
        Err(WinFreqError::DeviceUnavailable(
            "GPU support not compiled in. Build with --features gpu".to_string(),
        ))
    }

    /// Release the device session
    pub fn close(self) {
        #[cfg(feature = "gpu")]
        self.session.close();
    }
}

impl WindowExtractor for GpuExtractor {
    #[cfg(feature = "gpu")]
    fn extract(&self, sequence: &Sequence, shape: &DispatchShape) -> Result<WindowBuffer> {
        if shape.group_size > self.session.max_group_size() {
            return Err(WinFreqError::Extraction(format!(
                "group size {} exceeds device limit {}",
                shape.group_size,
                self.session.max_group_size()
            )));
        }
        let buffer = self.session.extract(sequence, shape)?;
        tracing::debug!(
            "GPU extraction successful: {} windows in {} groups",
            buffer.window_count(),
            shape.group_count()
        );
        Ok(buffer)
    }

    #[cfg(not(feature = "gpu"))]
    fn extract(&self, _sequence: &Sequence, _shape: &DispatchShape) -> Result<WindowBuffer> {
        Err(WinFreqError::DeviceUnavailable("GPU support not compiled in".to_string()))
    }

    fn max_group_size(&self) -> usize {
        #[cfg(feature = "gpu")]
        {
            self.session.max_group_size()
        }
        #[cfg(not(feature = "gpu"))]
        {
            1
        }
    }

    fn name(&self) -> String {
        #[cfg(feature = "gpu")]
        {
            format!("GPU (OpenCL, {})", self.session.device_name())
        }
        #[cfg(not(feature = "gpu"))]
        {
            "GPU (not available)".to_string()
        }
    }

    fn is_gpu(&self) -> bool {
        cfg!(feature = "gpu")
    }
}
