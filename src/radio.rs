use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::AsyncBufRead;

use crate::clients::{Country, TrackSource, errors::Result};
use crate::display;
use crate::player::{Launcher, Outcome, PlaybackDriver};
use crate::query::{CountryCatalog, Filters, QueryBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keep playing until the user quits.
    Continuous,
    /// One track, then exit.
    Single,
}

/// Countries to list for `--list`: all of them by name, or those catalogued for `decade` by code.
pub async fn list_countries<S: TrackSource>(
    source: &S,
    catalog: &CountryCatalog,
    decade: Option<u16>,
) -> Result<Vec<Country>> {
    let Some(decade) = decade else {
        return Ok(catalog.sorted_by_name());
    };

    let catalogued = source.mood_catalog(decade).await?.all_countries();
    debug!("{} countries catalogued for the {decade}s", catalogued.len());
    Ok(catalogued
        .into_iter()
        .map(|iso| Country {
            name: catalog.display_name(&iso).to_string(),
            iso,
        })
        .collect())
}

/// One listening session: request, play, repeat.
pub struct Radio<S, L, R> {
    source: S,
    driver: PlaybackDriver<L, R>,
    builder: QueryBuilder<StdRng>,
    catalog: CountryCatalog,
}

impl<S, L, R> Radio<S, L, R>
where
    S: TrackSource,
    L: Launcher,
    R: AsyncBufRead + Unpin,
{
    pub fn new(source: S, driver: PlaybackDriver<L, R>, catalog: CountryCatalog) -> Self {
        Radio {
            source,
            driver,
            builder: QueryBuilder::new(StdRng::from_os_rng()),
            catalog,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.builder = QueryBuilder::new(rng);
        self
    }

    /// Plays tracks matching `filters` and returns how many were started.
    ///
    /// Random filters are re-drawn for every track. Any error ends the session.
    pub async fn run(&mut self, filters: &Filters, mode: Mode) -> Result<usize> {
        if mode == Mode::Continuous {
            print!("{}", display::banner(filters, &self.catalog));
        }

        let mut played = 0;
        loop {
            let query = self.builder.resolve(filters, &self.source).await?;
            let track = self.source.next_track(&query).await?;
            print!("{}", display::track_card(&track, &self.catalog));

            let outcome = self.driver.play(&track).await?;
            played += 1;

            match (mode, outcome) {
                (Mode::Single, _) => break,
                (Mode::Continuous, Outcome::Quit) => {
                    print!("{}", display::goodbye());
                    break;
                }
                (Mode::Continuous, outcome) => debug!("{outcome:?}, fetching next track"),
            }
        }

        info!("Session over after {played} track(s)");
        Ok(played)
    }
}
