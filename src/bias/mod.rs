//! Halo bias and peak height.
//!
//! Every operation has a scalar form and a slice form (`*_arr`). Slice forms
//! evaluate elements in parallel; each element is computed exactly as the
//! scalar form would, so the two agree bit for bit.

pub mod peak_height;
pub mod tinker;

pub use peak_height::*;
pub use tinker::*;
