//! Reporting utilities: terminal tables and run headers.

pub mod format;

pub use format::*;
