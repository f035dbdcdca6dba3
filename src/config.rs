//! Host configuration: schema types and the loader.
//!
//! This is static configuration (paths, key steps, the defaults handed to the
//! settings store). User choices made at runtime live in [`crate::settings`].

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
