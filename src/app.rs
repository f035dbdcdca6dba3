//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the scanned library and
//! the position in the play order.

mod model;

pub use model::*;
