//! Fixed-length window frequency counting.
//!
//! A sequence of N bytes is split into the N-L+1 overlapping windows of
//! length L. Window extraction runs in parallel on an OpenCL device (feature
//! `gpu`) or a Rayon thread pool; the host folds the extracted windows into a
//! frequency table and writes it as sorted `window,count` rows.

pub mod accel;
pub mod aggregate;
pub mod cli_main;
pub mod config;
pub mod error;
pub mod gpu;
pub mod io;
pub mod partition;
pub mod pipeline;
pub mod window;

pub use aggregate::{aggregate, FrequencyTable};
pub use config::RunConfig;
pub use error::{Result, WinFreqError};
pub use partition::{plan, DispatchShape};
pub use window::{Sequence, WindowBuffer};
