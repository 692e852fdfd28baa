//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to locate configuration, history and log files.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
