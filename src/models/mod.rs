pub mod geometry;
pub mod screenshot;

pub use geometry::*;
pub use screenshot::*;
