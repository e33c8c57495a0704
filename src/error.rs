use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error types for a window-counting run.
///
/// Every variant is fatal for the run; there is no retry path.
#[derive(Debug)]
#[non_exhaustive]
pub enum WinFreqError {
    /// The sequence source (or a kernel file) could not be opened or read.
    Input { path: PathBuf, source: io::Error },
    /// Window length is not positive or exceeds the sequence length.
    InvalidWindowLength { window_len: i64, sequence_len: usize },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// No compatible compute device or platform was found.
    DeviceUnavailable(String),
    /// The device program failed to build; carries the build log.
    Compile(String),
    /// A device-side fault during buffer setup, dispatch or read-back.
    Extraction(String),
    /// The output table could not be created or written.
    Output { path: PathBuf, source: io::Error },
}

impl WinFreqError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input { .. }
            | Self::Output { .. }
            | Self::InvalidConfig(_)
            | Self::InvalidWindowLength { .. } => 1,
            Self::DeviceUnavailable(_) => 3,
            Self::Compile(_) => 4,
            Self::Extraction(_) => 5,
        }
    }
}

impl fmt::Display for WinFreqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input { path, source } => {
                write!(f, "unable to read input {}: {}", path.display(), source)
            }
            Self::InvalidWindowLength { window_len, sequence_len } => write!(
                f,
                "invalid window length {} for a sequence of length {}",
                window_len, sequence_len
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::DeviceUnavailable(msg) => write!(f, "no compute device available: {}", msg),
            Self::Compile(log) => write!(f, "failed to build device program:\n{}", log),
            Self::Extraction(msg) => write!(f, "window extraction failed: {}", msg),
            Self::Output { path, source } => {
                write!(f, "unable to write output {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for WinFreqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input { source, .. } | Self::Output { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WinFreqError>;
