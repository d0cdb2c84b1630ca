//! Mediabro - browsable media catalogue server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod listing;
pub mod net;
pub mod playlist;
pub mod render;
pub mod resolve;
pub mod server;
pub mod streaming;
pub mod thumbs;

/// Fixed filename that names the playlist resource for a directory.
pub const MEDIALIST_M3U: &str = "medialist.m3u";

/// Query marker that selects the thumbnail variant of an image resource.
pub const THUMBNAIL_SELECTOR: &str = "mediabro-thumb.jpg";

/// Query flag that includes hidden entries in a directory listing.
pub const SHOW_ALL_FLAG: &str = "show=all";
