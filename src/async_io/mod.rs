//! Async encounter loading
//!
//! Reads Parquet sources with the parquet crate's async reader on tokio, for
//! callers that load data from inside an async runtime.

pub mod file_ops;
pub mod loader;

pub use file_ops::{find_parquet_files_async, read_parquet_async};
pub use loader::{load_encounters_async, load_parquet_files_async};
