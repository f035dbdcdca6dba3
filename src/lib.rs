//! Playback controller for a streamed-music client.
//!
//! The crate decides which resources (native file, server transcode, or both)
//! are offered to the host's audio primitive, infers which one the primitive
//! actually committed to, applies the matching seek strategy and accounts
//! listening time for "now playing" / "listen finished" reporting.
//!
//! Host-facing collaborators are traits: [`playback::MediaElement`] for the
//! audio primitive, [`playback::MediaSession`] for the system media controls
//! and [`storage::KeyValueStore`] for persisted user state.

pub mod config;
pub mod error;
pub mod mpris;
pub mod playback;
pub mod settings;
pub mod storage;
pub mod track;

pub use error::{Error, Result};
