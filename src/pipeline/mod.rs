pub mod count;

pub use count::{count_windows, run};
