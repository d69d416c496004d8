//! Algorithm implementations for encounter analysis
//!
//! This module contains the cohort-flow classifier and the report
//! aggregation built on it.

pub mod cohort;
