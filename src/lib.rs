//! rhisto - color-occurrence histograms on a locality-preserving layout.
//!
//! Every 24-bit color is assigned to exactly one cell of a 4096x4096 grid
//! (a *profile*). Profiles can be optimized so that colors that are close in
//! RGB space, and frequent in the analyzed images, end up close in the grid.
//! A histogram is then rendered by drawing each color's density at its cell.

pub mod color;
pub mod density;
pub mod error;
pub mod histogram;
mod iter_utils;
pub mod normalize;
pub mod optimizer;
pub mod profile;

pub use color::{Color, Geometry, Position};
pub use error::{Error, Result};
pub use histogram::Histogram;
pub use profile::Profile;
