//! Annotation data, the per-photo store and editor interaction geometry

mod interaction;
mod model;
mod store;

pub use interaction::*;
pub use model::*;
pub use store::*;
