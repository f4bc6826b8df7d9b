//! Shared infrastructure utilities for hostprint.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)
//! - **`json`**: Pretty JSON with a configurable indent width

pub mod atomic_write;
pub mod json;

pub use atomic_write::{FileSyncPolicy, atomic_write, atomic_write_with_policy};
pub use json::to_pretty_json;
