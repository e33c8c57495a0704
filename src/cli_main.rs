use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::accel::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "winfreq", version, about = "Count fixed-length windows of a sequence on a GPU or CPU", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count every window of a FASTA sequence and write a sorted CSV table
    Count(CountArgs),

    /// List OpenCL platforms and devices
    Devices,
}

#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    /// Input FASTA(.gz) file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file (default: <input stem>_windows.csv next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Window length
    #[arg(short = 'k', long, env = "MAXPROTLEN", default_value_t = 3, allow_negative_numbers = true)]
    pub window_len: i64,

    /// Work-group size hint; thread count for the CPU backend
    #[arg(short, long, env = "MAXCORES", default_value_t = 1, allow_negative_numbers = true)]
    pub cores: i64,

    /// Extraction backend
    #[arg(long, value_enum, default_value_t = BackendKind::Auto)]
    pub backend: BackendKind,

    /// Load the device program from this file instead of the built-in copy
    #[arg(long)]
    pub kernel: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
