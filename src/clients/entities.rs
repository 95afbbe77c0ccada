use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::clients::errors::{Error, Result};

/// Every decade the service catalogues, oldest first.
pub const DECADES: [u16; 13] = [
    1900, 1910, 1920, 1930, 1940, 1950, 1960, 1970, 1980, 1990, 2000, 2010, 2020,
];

/// Musical mood tag. Upper-case on the wire, lower-case on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Slow,
    Fast,
    Weird,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Slow, Mood::Fast, Mood::Weird];

    pub fn as_wire(self) -> &'static str {
        match self {
            Mood::Slow => "SLOW",
            Mood::Fast => "FAST",
            Mood::Weird => "WEIRD",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Slow => "slow",
            Mood::Fast => "fast",
            Mood::Weird => "weird",
        }
    }
}

/// A country known to the service, decoded from its `[iso, name]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Country {
    pub iso: String,
    pub name: String,
}

impl From<(String, String)> for Country {
    fn from((iso, name): (String, String)) -> Self {
        Country { iso, name }
    }
}

/// Countries with content for one decade, keyed by wire mood name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MoodCatalog(pub HashMap<String, Vec<String>>);

impl MoodCatalog {
    /// ISO codes catalogued under any of `moods`.
    pub fn countries_for(&self, moods: &[Mood]) -> BTreeSet<String> {
        moods
            .iter()
            .filter_map(|mood| self.0.get(mood.as_wire()))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn all_countries(&self) -> BTreeSet<String> {
        self.0.values().flatten().cloned().collect()
    }
}

/// One track as handed out by the service. Lives for a single playback cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub year: Option<String>,
    pub decade: Option<String>,
    pub country: Option<String>,
    pub mood: Option<String>,
    pub label: Option<String>,
    pub songwriter: Option<String>,
    pub length_secs: u64,
    pub stream_url: String,
}

impl Track {
    /// The playable URL; a track without one must never reach the player.
    pub fn stream_url(&self) -> Result<&str> {
        let url = self.stream_url.trim();
        if url.is_empty() {
            return Err(Error::NoStreamUrl {
                artist: self.artist.clone(),
                title: self.title.clone(),
            });
        }
        Ok(url)
    }
}
