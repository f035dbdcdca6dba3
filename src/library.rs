//! Local music library: directory scanning and conversion of scanned files
//! into track descriptors for the playback engine.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;
