use std::time::Duration;

use log::{debug, info};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::clients::{
    TrackSource,
    entities::{Country, MoodCatalog, Track},
    errors::{Error, Result},
};
use crate::query::Query;

pub const DEFAULT_API_BASE: &str = "https://radiooooo.com";

const USER_AGENT: &str = concat!("radiooooo-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug, Default)]
struct ApiLinks {
    mpeg: Option<String>,
}

// Shape of the `/play` response; the service omits fields freely.
#[derive(Deserialize, Debug)]
struct ApiTrack {
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    album: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    year: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    decade: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    mood: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    songwriter: Option<String>,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    links: ApiLinks,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    #[serde(default)]
    error: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// Lengths arrive as float seconds; `as` saturates, negatives and NaN become zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(length: f64) -> u64 {
    if length.is_finite() && length > 0.0 {
        length as u64
    } else {
        0
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ApiTrack> for Track {
    fn from(t: ApiTrack) -> Track {
        Track {
            artist: non_empty(t.artist).unwrap_or_else(|| "Unknown".to_string()),
            title: non_empty(t.title).unwrap_or_else(|| "Unknown".to_string()),
            album: non_empty(t.album),
            year: t.year,
            decade: t.decade,
            country: non_empty(t.country),
            mood: non_empty(t.mood).map(|m| m.to_lowercase()),
            label: non_empty(t.label),
            songwriter: non_empty(t.songwriter),
            length_secs: t.length.map_or(0, whole_seconds),
            stream_url: t.links.mpeg.unwrap_or_default(),
        }
    }
}

/// HTTP client for the radiooooo.com JSON API.
pub struct RadiooooClient {
    http: reqwest::Client,
    base_url: String,
}

impl RadiooooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(RadiooooClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn error_for(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::Api { status, body }
    }
}

impl TrackSource for RadiooooClient {
    async fn countries(&self) -> Result<Vec<Country>> {
        let url = self.url("/language/countries/en.json");
        debug!("Fetching country list from {url}");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body = response.text().await?;
        let countries: Vec<Country> = serde_json::from_str(&body)?;
        debug!("Fetched {} countries", countries.len());
        Ok(countries)
    }

    async fn mood_catalog(&self, decade: u16) -> Result<MoodCatalog> {
        let url = self.url("/country/mood");
        debug!("Fetching catalogued countries for the {decade}s");

        let response = self
            .http
            .get(&url)
            .query(&[("decade", decade)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn next_track(&self, query: &Query) -> Result<Track> {
        let url = self.url("/play");
        debug!("Requesting track: {query:?}");

        let response = self.http.post(&url).json(query).send().await?;
        let status = response.status();

        if status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            // The service answers 400 with {"error": "No track ..."} when nothing matches.
            if let Ok(err) = serde_json::from_str::<ApiError>(&body)
                && err.error.contains("No track")
            {
                info!("Service has no track for {query:?}");
                return Err(Error::NotFound);
            }
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            return Err(Self::error_for(response).await);
        }

        let body = response.text().await?;
        let track: ApiTrack = serde_json::from_str(&body)?;
        let track = Track::from(track);
        info!("Got track: {} - {}", track.artist, track.title);
        Ok(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_track_maps_to_track() {
        let json = r#"{
            "artist": "Os Mutantes",
            "title": "Panis et Circenses",
            "album": "",
            "year": 1968,
            "decade": "1960",
            "country": "BRA",
            "mood": "WEIRD",
            "length": 212,
            "links": {"mpeg": "https://asset.radiooooo.com/music/abc.mp3"}
        }"#;

        let track = Track::from(serde_json::from_str::<ApiTrack>(json).unwrap());
        assert_eq!(track.artist, "Os Mutantes");
        assert_eq!(track.album, None);
        assert_eq!(track.year.as_deref(), Some("1968"));
        assert_eq!(track.decade.as_deref(), Some("1960"));
        assert_eq!(track.mood.as_deref(), Some("weird"));
        assert_eq!(track.length_secs, 212);
        assert_eq!(
            track.stream_url().unwrap(),
            "https://asset.radiooooo.com/music/abc.mp3"
        );
    }

    #[test]
    fn missing_links_leave_track_unplayable() {
        let track = Track::from(serde_json::from_str::<ApiTrack>(r#"{"title": "x"}"#).unwrap());
        assert_eq!(track.artist, "Unknown");
        assert!(track.stream_url().is_err());
    }

    #[test]
    fn lengths_round_down_to_whole_seconds() {
        assert_eq!(whole_seconds(212.9), 212);
        assert_eq!(whole_seconds(0.4), 0);
        assert_eq!(whole_seconds(-3.0), 0);
        assert_eq!(whole_seconds(f64::NAN), 0);

        let track = Track::from(serde_json::from_str::<ApiTrack>(r#"{"length": -12.5}"#).unwrap());
        assert_eq!(track.length_secs, 0);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = RadiooooClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/play"), "http://localhost:8080/play");
    }
}
