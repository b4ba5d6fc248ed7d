//! Page layouts, photo distribution and section paging

mod distribute;
mod layout;
mod sections;

pub use distribute::*;
pub use layout::*;
pub use sections::*;
