/// Tracks, countries and moods
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// radiooooo.com HTTP client
pub mod radiooooo;

pub use entities::{Country, Mood, MoodCatalog, Track};
pub use radiooooo::RadiooooClient;

use crate::query::Query;
use errors::Result;

/// Where tracks and catalog data come from.
///
/// Implemented by [`RadiooooClient`]; tests substitute in-memory fixtures.
#[allow(async_fn_in_trait)]
pub trait TrackSource {
    /// Every country the service knows, as `(iso, name)` pairs.
    async fn countries(&self) -> Result<Vec<Country>>;

    /// Countries with content for `decade`, grouped by mood.
    async fn mood_catalog(&self, decade: u16) -> Result<MoodCatalog>;

    /// One random track matching `query`, or [`errors::Error::NotFound`].
    async fn next_track(&self, query: &Query) -> Result<Track>;
}
