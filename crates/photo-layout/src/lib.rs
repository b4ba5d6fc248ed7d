pub mod annotation;
pub mod constants;
mod crop;
mod editor;
pub mod export;
pub mod geometry;
mod options;
pub mod pages;
pub mod project;
pub mod raster;
pub mod text;
mod types;

pub use annotation::*;
pub use crop::*;
pub use editor::EditSession;
pub use export::{export_pdf, save_pdf};
pub use geometry::*;
pub use options::*;
pub use pages::*;
pub use project::*;
pub use raster::*;
pub use text::*;
pub use types::*;
