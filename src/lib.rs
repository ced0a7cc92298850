//! Bookstore application library
//!
//! Application modules for the bookstore service; the binary lives in `crates/cli`.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
