//! Terminal plotting.

pub mod ascii;
pub mod figures;

pub use ascii::*;
pub use figures::*;
