//! radiooooo - a terminal client for radiooooo.com
//!
//! Pick a country and a decade, and hear music from there and then. Tracks
//! are requested from the radiooooo.com API and streamed through a locally
//! installed player such as `mpv`.

/// Client modules for the remote service
pub mod clients;
/// Environment-driven configuration
pub mod config;
/// Terminal rendering of tracks and listings
pub mod display;
/// Playback through an external player process
pub mod player;
/// Filters and request building
pub mod query;
/// Listening sessions
pub mod radio;
