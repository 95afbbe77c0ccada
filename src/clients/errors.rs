use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("radiooooo API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No tracks found for this selection. Try different filters.")]
    NotFound,

    #[error("No audio URL found for {artist} - {title}")]
    NoStreamUrl { artist: String, title: String },

    #[error("No audio player found. Install mpv (brew install mpv / sudo apt install mpv)")]
    MissingPlayer,

    #[error("Player '{player}' could not be started: {source}")]
    PlayerLaunch {
        player: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Player '{player}' failed: {source}")]
    PlayerProcess {
        player: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid decade: '{0}'. Try: 1970, 70s, 70, 2000")]
    InvalidDecade(String),

    #[error("Decade {0} out of range (1900-2020)")]
    DecadeOutOfRange(u32),

    #[error("Unknown country: '{0}'. Try a country name (italy, japan) or ISO code (ITA, JPN)")]
    UnknownCountry(String),

    #[error("Multiple matches for '{query}': {}", .candidates.join(", "))]
    AmbiguousCountry {
        query: String,
        candidates: Vec<String>,
    },

    #[error("Multiple countries specified ('{0}' and '{1}'). Use one at a time.")]
    MultipleCountries(String, String),

    #[error("radiooooo deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
