//! Utility functions for loading and logging
//!
//! This module groups the Arrow, Parquet, date and logging helpers used by
//! the encounter loaders.

pub mod arrow;
pub mod date;
pub mod io;
pub mod logging;

pub use io::{find_parquet_files, read_parquet};
pub use logging::{log_operation_complete, log_operation_start, log_warning};
