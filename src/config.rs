use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::clients::{
    RadiooooClient,
    errors::{Error, Result},
    radiooooo::DEFAULT_API_BASE,
};

pub const API_BASE_VAR: &str = "RADIOOOOO_API_BASE";
pub const PLAYER_VAR: &str = "RADIOOOOO_PLAYER";
pub const TIMEOUT_VAR: &str = "RADIOOOOO_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    /// Player executable; `None` means auto-detect.
    pub player: Option<PathBuf>,
    pub timeout: Duration,
}

impl Config {
    pub fn client(&self) -> Result<RadiooooClient> {
        RadiooooClient::new(&self.api_base, self.timeout)
    }
}

/// Builds a [`Config`] from explicit overrides, then environment, then defaults.
#[derive(Default)]
pub struct ConfigBuilder {
    api_base: Option<String>,
    player: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn player(mut self, player: impl Into<PathBuf>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Loads `.env` files (user config dir, then working directory) and reads the process environment.
    pub fn build(self) -> Result<Config> {
        if let Some(path) = dotenv_path()
            && path.is_file()
        {
            dotenvy::from_path(&path)
                .map_err(|e| Error::Configuration(format!("{}: {e}", path.display())))?;
            debug!("Loaded settings from {path:?}");
        }
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded settings from {path:?}");
        }

        self.build_with(|key| std::env::var(key).ok())
    }

    pub fn build_with(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let api_base = match self.api_base {
            Some(base) => base,
            None => lookup(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        };
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(Error::Configuration(format!(
                "{API_BASE_VAR} must be an http(s) URL, got '{api_base}'"
            )));
        }

        let player = self.player.or_else(|| {
            lookup(PLAYER_VAR)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        });

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => match lookup(TIMEOUT_VAR) {
                Some(raw) => {
                    let secs: u64 = raw.trim().parse().map_err(|_| {
                        Error::Configuration(format!(
                            "{TIMEOUT_VAR} must be a number of seconds, got '{raw}'"
                        ))
                    })?;
                    Duration::from_secs(secs)
                }
                None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        };
        if timeout.is_zero() {
            return Err(Error::Configuration(format!(
                "{TIMEOUT_VAR} must be greater than zero"
            )));
        }

        Ok(Config {
            api_base,
            player,
            timeout,
        })
    }
}

fn dotenv_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("radiooooo").join(".env"))
}
