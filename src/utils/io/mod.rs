//! IO utilities for file operations
//!
//! This module provides utilities for locating and reading Parquet files.

pub mod parquet;

// Re-export commonly used functions for convenience
pub use parquet::{
    find_parquet_files, load_parquet_files_parallel, read_parquet, validate_directory,
};
