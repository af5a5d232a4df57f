//! Input/output helpers.
//!
//! - whitespace column ingest and power-spectrum loading (`ingest`)
//! - CSV exports of result rows (`export`)
//! - result JSON read/write (`results`)

pub mod export;
pub mod ingest;
pub mod results;

pub use export::*;
pub use ingest::*;
pub use results::*;
