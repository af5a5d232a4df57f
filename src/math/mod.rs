//! Numerical utilities: interpolation, quadrature, special functions, grids
//! and least squares.

pub mod grid;
pub mod interp;
pub mod ols;
pub mod quad;
pub mod special;

pub use grid::*;
pub use interp::*;
pub use ols::*;
pub use quad::*;
pub use special::*;
