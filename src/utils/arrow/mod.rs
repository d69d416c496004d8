//! Arrow data handling utilities
//!
//! This module contains helpers for pulling typed values out of Arrow
//! record batches.

pub mod extractors;

// Re-export commonly used functions for convenience
pub use extractors::{
    downcast_array, extract_dates, extract_strings, get_column, require_column,
};
