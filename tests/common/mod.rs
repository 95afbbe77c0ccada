//! Shared fixtures: a local stand-in for the radiooooo.com API and a fake player.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use radiooooo::clients::{RadiooooClient, errors::Result};
use radiooooo::player::{Launcher, PlayerHandle};
use serde_json::{Value, json};

/// What the mock service should do on `POST /play`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayBehaviour {
    Track,
    NoTrack,
    TrackWithoutUrl,
    ServerError,
    /// Every route answers 200 with an HTML maintenance page.
    Garbled,
}

const MAINTENANCE_PAGE: &str = "<html><body>Down for maintenance</body></html>";

#[derive(Clone)]
pub struct MockApi {
    pub behaviour: PlayBehaviour,
    pub play_requests: Arc<Mutex<Vec<Value>>>,
    served: Arc<AtomicUsize>,
}

impl MockApi {
    pub fn new(behaviour: PlayBehaviour) -> Self {
        MockApi {
            behaviour,
            play_requests: Arc::new(Mutex::new(Vec::new())),
            served: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.play_requests.lock().unwrap().clone()
    }

    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/language/countries/en.json", get(countries))
            .route("/country/mood", get(mood_catalog))
            .route("/play", post(play))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub async fn client(&self) -> RadiooooClient {
        let base = self.spawn().await;
        RadiooooClient::new(&base, Duration::from_secs(5)).unwrap()
    }
}

pub fn stream_url(iso: &str, n: usize) -> String {
    format!("https://asset.radiooooo.com/music/{iso}-{n}.mp3")
}

async fn countries(State(api): State<MockApi>) -> Response {
    if api.behaviour == PlayBehaviour::Garbled {
        return MAINTENANCE_PAGE.into_response();
    }
    Json(json!([
        ["ITA", "Italy"],
        ["JPN", "Japan"],
        ["BRA", "Brazil"],
        ["FRA", "France"],
        ["USA", "United States"],
        ["GBR", "United Kingdom"]
    ]))
    .into_response()
}

// Fixture: the 1970s carry four countries, every other decade only the USA.
async fn mood_catalog(
    State(api): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if api.behaviour == PlayBehaviour::Garbled {
        return MAINTENANCE_PAGE.into_response();
    }
    let body = match params.get("decade").map(String::as_str) {
        Some("1970") => Json(json!({
            "SLOW": ["ITA", "FRA"],
            "FAST": ["BRA"],
            "WEIRD": ["JPN", "FRA"]
        })),
        _ => Json(json!({"SLOW": ["USA"], "FAST": ["USA"], "WEIRD": []})),
    };
    body.into_response()
}

async fn play(State(api): State<MockApi>, Json(body): Json<Value>) -> Response {
    api.play_requests.lock().unwrap().push(body.clone());
    let n = api.served.fetch_add(1, Ordering::SeqCst);
    let iso = body["isocodes"][0].as_str().unwrap_or("???").to_string();
    let decade = body["decades"][0].as_u64().unwrap_or(1970);

    if api.behaviour == PlayBehaviour::Garbled {
        return MAINTENANCE_PAGE.into_response();
    }
    let answer = match api.behaviour {
        PlayBehaviour::Track => (
            StatusCode::OK,
            Json(json!({
                "artist": "Artist",
                "title": format!("Track {n}"),
                "year": decade + 4,
                "decade": decade,
                "country": iso,
                "mood": "SLOW",
                "length": 200,
                "links": {"mpeg": stream_url(&iso, n)}
            })),
        ),
        PlayBehaviour::TrackWithoutUrl => (
            StatusCode::OK,
            Json(json!({"artist": "Artist", "title": "Silent", "links": {}})),
        ),
        PlayBehaviour::NoTrack => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No track found for this selection"})),
        ),
        PlayBehaviour::ServerError | PlayBehaviour::Garbled => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        ),
    };
    answer.into_response()
}

/// Records every URL it is asked to play instead of starting a process.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub launched: Arc<Mutex<Vec<String>>>,
    pub stopped: Arc<AtomicUsize>,
    /// When false the fake track never ends on its own.
    pub finishes: bool,
}

impl RecordingLauncher {
    pub fn finishing() -> Self {
        RecordingLauncher {
            finishes: true,
            ..Default::default()
        }
    }

    pub fn endless() -> Self {
        RecordingLauncher::default()
    }

    pub fn urls(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

pub struct FakeHandle {
    finishes: bool,
    stopped: Arc<AtomicUsize>,
}

impl PlayerHandle for FakeHandle {
    async fn wait(&mut self) -> Result<bool> {
        if self.finishes {
            Ok(true)
        } else {
            std::future::pending().await
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Launcher for RecordingLauncher {
    type Handle = FakeHandle;

    fn launch(&self, url: &str) -> Result<FakeHandle> {
        self.launched.lock().unwrap().push(url.to_string());
        Ok(FakeHandle {
            finishes: self.finishes,
            stopped: self.stopped.clone(),
        })
    }
}
