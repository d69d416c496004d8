//! Filtering capabilities for classified encounters
//!
//! This module provides the predicates report queries use to restrict the
//! classified encounter set to a date window.

pub mod core;
pub mod date;

pub use self::core::{EncounterFilter, apply_filter};
pub use date::DateRange;
