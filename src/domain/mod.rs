//! Domain types used throughout the toolkit.
//!
//! This module defines:
//!
//! - physical constants (`constants`)
//! - run configurations, selection enums and result rows (`types`)

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
