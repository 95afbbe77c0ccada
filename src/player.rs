use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::process::{Child, Command};

use crate::clients::{
    Track,
    errors::{Error, Result},
};

/// Players tried in order when none is configured.
pub const DEFAULT_PLAYERS: [&str; 2] = ["mpv", "ffplay"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Mpv,
    Ffplay,
    Other,
}

impl PlayerKind {
    pub fn detect(binary: &Path) -> Self {
        let stem = binary
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_lowercase();
        if stem.contains("mpv") {
            PlayerKind::Mpv
        } else if stem.contains("ffplay") {
            PlayerKind::Ffplay
        } else {
            PlayerKind::Other
        }
    }

    /// Command-line arguments for playing `url` audio-only and quietly.
    pub fn args(self, url: &str) -> Vec<OsString> {
        let flags: &[&str] = match self {
            PlayerKind::Mpv => &["--no-video", "--really-quiet"],
            PlayerKind::Ffplay => &["-nodisp", "-autoexit", "-loglevel", "quiet"],
            PlayerKind::Other => &[],
        };
        flags
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(OsString::from(url)))
            .collect()
    }
}

/// Looks `name` up in the directories of a `PATH`-style variable.
pub fn find_on_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = path_var?;
    std::env::split_paths(path_var).find_map(|dir| {
        let full = dir.join(name);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// A running player that can be awaited or stopped early.
#[allow(async_fn_in_trait)]
pub trait PlayerHandle {
    /// Resolves when the player exits; `true` on a clean exit.
    async fn wait(&mut self) -> Result<bool>;

    async fn stop(&mut self) -> Result<()>;
}

/// Starts a player on a stream URL.
pub trait Launcher {
    type Handle: PlayerHandle;

    fn launch(&self, url: &str) -> Result<Self::Handle>;
}

/// An external media player executable such as `mpv`.
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    binary: PathBuf,
    kind: PlayerKind,
}

impl ExternalPlayer {
    pub fn new(binary: PathBuf) -> Self {
        let kind = PlayerKind::detect(&binary);
        ExternalPlayer { binary, kind }
    }

    /// Uses `configured` if given, otherwise the first of [`DEFAULT_PLAYERS`] on `PATH`.
    pub fn discover(configured: Option<&Path>) -> Result<Self> {
        let path_var = std::env::var_os("PATH");
        Self::discover_in(configured, path_var.as_deref())
    }

    pub fn discover_in(configured: Option<&Path>, path_var: Option<&OsStr>) -> Result<Self> {
        let found = match configured {
            Some(binary) => find_on_path(&binary.to_string_lossy(), path_var),
            None => DEFAULT_PLAYERS
                .iter()
                .find_map(|name| find_on_path(name, path_var)),
        };

        let binary = found.ok_or(Error::MissingPlayer)?;
        debug!("Using player {binary:?}");
        Ok(Self::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(self.kind.args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

impl Launcher for ExternalPlayer {
    type Handle = ChildHandle;

    fn launch(&self, url: &str) -> Result<ChildHandle> {
        let child = self.command(url).spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::MissingPlayer
            } else {
                Error::PlayerLaunch {
                    player: self.binary.display().to_string(),
                    source,
                }
            }
        })?;
        debug!("Spawned player pid {:?} for {url}", child.id());
        Ok(ChildHandle {
            child,
            player: self.binary.display().to_string(),
        })
    }
}

pub struct ChildHandle {
    child: Child,
    player: String,
}

impl ChildHandle {
    fn process_error(&self, source: std::io::Error) -> Error {
        Error::PlayerProcess {
            player: self.player.clone(),
            source,
        }
    }
}

impl PlayerHandle for ChildHandle {
    async fn wait(&mut self) -> Result<bool> {
        let status = match self.child.wait().await {
            Ok(status) => status,
            Err(e) => return Err(self.process_error(e)),
        };
        if !status.success() {
            debug!("Player exited with {status}");
        }
        Ok(status.success())
    }

    async fn stop(&mut self) -> Result<()> {
        let running = self
            .child
            .try_wait()
            .map_err(|e| self.process_error(e))?
            .is_none();
        if running && let Err(e) = self.child.kill().await {
            return Err(self.process_error(e));
        }
        Ok(())
    }
}

/// A line typed by the user while a track plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Next,
    Quit,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "n" | "next" => Some(Control::Next),
            "q" | "quit" | "exit" => Some(Control::Quit),
            _ => None,
        }
    }
}

/// Line-oriented keyboard controls read from stdin (or any buffered reader).
pub struct Controls<R> {
    lines: Option<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin> Controls<R> {
    pub fn new(reader: R) -> Self {
        Controls {
            lines: Some(reader.lines()),
        }
    }

    /// Waits for the next recognised command. Never resolves once input is exhausted.
    pub async fn next_command(&mut self) -> Control {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                return std::future::pending().await;
            };
            match lines.next_line().await {
                Ok(Some(line)) => match Control::parse(&line) {
                    Some(command) => return command,
                    None => debug!("Ignoring input {line:?}"),
                },
                Ok(None) => {
                    debug!("Input closed; tracks will play to the end");
                    self.lines = None;
                }
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    self.lines = None;
                }
            }
        }
    }
}

/// How one playback cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Skipped,
    Quit,
}

/// Plays one track at a time and reports why playback stopped.
pub struct PlaybackDriver<L, R> {
    launcher: L,
    controls: Option<Controls<R>>,
}

impl<L: Launcher, R: AsyncBufRead + Unpin> PlaybackDriver<L, R> {
    /// Without `controls` the driver only waits for the player to exit or Ctrl-C.
    pub fn new(launcher: L, controls: Option<Controls<R>>) -> Self {
        PlaybackDriver { launcher, controls }
    }

    async fn next_command(controls: &mut Option<Controls<R>>) -> Control {
        match controls {
            Some(controls) => controls.next_command().await,
            None => std::future::pending().await,
        }
    }

    /// Blocks until the track ends, the user skips or quits, or Ctrl-C arrives.
    pub async fn play(&mut self, track: &Track) -> Result<Outcome> {
        let url = track.stream_url()?;
        let mut handle = self.launcher.launch(url)?;
        info!("Playing {} - {}", track.artist, track.title);

        let outcome = tokio::select! {
            status = handle.wait() => {
                if !status? {
                    warn!("Player exited abnormally on {url}");
                }
                Outcome::Finished
            }
            command = Self::next_command(&mut self.controls) => match command {
                Control::Next => Outcome::Skipped,
                Control::Quit => Outcome::Quit,
            },
            _ = tokio::signal::ctrl_c() => Outcome::Quit,
        };

        if outcome != Outcome::Finished {
            handle.stop().await?;
        }
        debug!("Playback ended: {outcome:?}");
        Ok(outcome)
    }
}
