use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{Result, WinFreqError};

/// Summary of a finished run
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sequence_len: usize,
    pub window_len: usize,
    pub total_windows: usize,
    pub distinct_windows: usize,
    pub group_size: usize,
    pub padded_global_size: usize,
    pub backend: String,
    pub core_hint: usize,
    pub elapsed_secs: f64,
    /// Peak resident set size in KB; 0 where `/proc` is unavailable
    pub peak_rss_kb: u64,
}

/// Parse peak RSS (`VmHWM`, in KB) from `/proc/self/status` content.
pub fn parse_peak_rss_kb(status_content: &str) -> u64 {
    status_content
        .lines()
        .find(|line| line.starts_with("VmHWM:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse().ok())
        .unwrap_or(0)
}

/// Read the peak resident set size of this process in KB.
pub fn peak_rss_kb() -> u64 {
    let status = std::fs::read_to_string("/proc/self/status").unwrap_or_default();
    parse_peak_rss_kb(&status)
}

/// Write the run summary to a JSON file
pub fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).map_err(|source| WinFreqError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary).map_err(|e| {
        WinFreqError::Output {
            path: path.to_path_buf(),
            source: e.into(),
        }
    })?;
    Ok(())
}
