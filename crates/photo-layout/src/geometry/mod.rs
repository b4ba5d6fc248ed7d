//! Coordinate spaces and the transforms between them

mod transform;
mod types;

pub use transform::*;
pub use types::*;
