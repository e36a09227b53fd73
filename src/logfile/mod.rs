//! Core log file reader module
//!
//! ```text
//! pattern ──▶ enumerate ──▶ FileList ──▶ for each file:
//!                                         fs.open ──▶ iter::decode ──▶ render
//! ```

pub mod config;
pub mod enumerate;
pub mod format;
pub mod fs;
pub mod iter;
pub mod printer;
pub mod render;
pub mod types;
mod utils;

pub use types::error::{CorruptReason, LogFileError, Result};
