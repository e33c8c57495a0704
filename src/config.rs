//! Run configuration injected into the pipeline.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::accel::BackendKind;
use crate::cli_main::CountArgs;
use crate::error::{Result, WinFreqError};
use crate::gpu::EXTRACT_KERNEL_SOURCE;

pub const DEFAULT_WINDOW_LEN: i64 = 3;
pub const DEFAULT_CORE_HINT: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Signed so that non-positive lengths reach the partitioner and are
    /// reported as invalid window lengths.
    pub window_len: i64,
    pub core_hint: usize,
    pub backend: BackendKind,
    pub kernel_path: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            window_len: DEFAULT_WINDOW_LEN,
            core_hint: DEFAULT_CORE_HINT,
            backend: BackendKind::Auto,
            kernel_path: None,
            report: None,
        }
    }

    pub fn with_window_len(mut self, window_len: i64) -> Self {
        self.window_len = window_len;
        self
    }

    pub fn with_core_hint(mut self, core_hint: usize) -> Self {
        self.core_hint = core_hint;
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn from_args(args: &CountArgs) -> Result<Self> {
        let core_hint = usize::try_from(args.cores)
            .ok()
            .filter(|&c| c >= 1)
            .ok_or_else(|| {
                WinFreqError::InvalidConfig(format!("cores must be at least 1, got {}", args.cores))
            })?;
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));

        Ok(Self {
            input: args.input.clone(),
            output,
            window_len: args.window_len,
            core_hint,
            backend: args.backend,
            kernel_path: args.kernel.clone(),
            report: args.report.clone(),
        })
    }

    /// Device program source: the configured file, or the built-in copy.
    pub fn kernel_source(&self) -> Result<Cow<'static, str>> {
        match &self.kernel_path {
            Some(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| WinFreqError::Input {
                    path: path.clone(),
                    source,
                }),
            None => Ok(Cow::Borrowed(EXTRACT_KERNEL_SOURCE)),
        }
    }
}

/// `<dir>/<stem>_windows.csv`, with `.gz` and the FASTA extension stripped.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut stem = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string());
    if let Some(s) = stem.strip_suffix(".gz") {
        stem = s.to_string();
    }
    if let Some((base, _ext)) = stem.rsplit_once('.') {
        if !base.is_empty() {
            stem = base.to_string();
        }
    }
    input.with_file_name(format!("{}_windows.csv", stem))
}
