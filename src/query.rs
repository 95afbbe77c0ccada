use std::collections::BTreeSet;

use log::debug;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;

use crate::clients::{
    Country, Mood, TrackSource,
    entities::DECADES,
    errors::{Error, Result},
};

/// Parses `1970`, `70s`, `70` or `1975` into a catalogued decade.
///
/// Two-digit values `00`..=`20` land in the 2000s, the rest in the 1900s.
pub fn parse_decade(text: &str) -> Result<u16> {
    let trimmed = text.trim().to_lowercase();
    let digits = trimmed.strip_suffix('s').unwrap_or(&trimmed);
    let mut year: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidDecade(text.to_string()))?;

    if year < 100 {
        year += if year <= 20 { 2000 } else { 1900 };
    }
    let decade = year / 10 * 10;

    u16::try_from(decade)
        .ok()
        .filter(|d| DECADES.contains(d))
        .ok_or(Error::DecadeOutOfRange(decade))
}

fn looks_like_decade(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    let digits = trimmed.strip_suffix('s').unwrap_or(&trimmed);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Every country the service knows, held in memory for the whole run.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    countries: Vec<Country>,
}

impl CountryCatalog {
    pub fn new(countries: Vec<Country>) -> Self {
        CountryCatalog { countries }
    }

    pub async fn fetch<S: TrackSource>(source: &S) -> Result<Self> {
        Ok(Self::new(source.countries().await?))
    }

    pub fn name_of(&self, iso: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|c| c.iso.eq_ignore_ascii_case(iso))
            .map(|c| c.name.as_str())
    }

    /// Human name for `iso`, or the code itself when unknown.
    pub fn display_name<'a>(&'a self, iso: &'a str) -> &'a str {
        self.name_of(iso).unwrap_or(iso)
    }

    pub fn sorted_by_name(&self) -> Vec<Country> {
        let mut countries = self.countries.clone();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        countries
    }

    /// Resolves a country name or ISO code to an ISO code.
    ///
    /// Exact matches on code or name win; otherwise a unique substring match
    /// on the name is accepted.
    pub fn resolve(&self, query: &str) -> Result<String> {
        let q = query.trim().to_lowercase();

        if let Some(country) = self
            .countries
            .iter()
            .find(|c| c.iso.to_lowercase() == q || c.name.to_lowercase() == q)
        {
            return Ok(country.iso.clone());
        }

        let mut matches: Vec<&Country> = Vec::new();
        for country in &self.countries {
            // short names are skipped so "it" does not hit every three-letter code
            if country.name.len() > 3
                && country.name.to_lowercase().contains(&q)
                && !matches.iter().any(|m| m.iso == country.iso)
            {
                matches.push(country);
            }
        }

        match matches.as_slice() {
            [] => Err(Error::UnknownCountry(query.to_string())),
            [only] => Ok(only.iso.clone()),
            many => Err(Error::AmbiguousCountry {
                query: query.to_string(),
                candidates: many
                    .iter()
                    .take(10)
                    .map(|c| format!("{} ({})", c.name, c.iso))
                    .collect(),
            }),
        }
    }
}

/// What the user asked for. Empty fields mean "surprise me".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub country: Option<String>,
    pub decades: Vec<u16>,
    pub moods: Vec<Mood>,
}

impl Filters {
    /// Splits positional arguments into decades and at most one country.
    pub fn parse(args: &[String], moods: Vec<Mood>, catalog: &CountryCatalog) -> Result<Self> {
        let mut filters = Filters {
            moods,
            ..Default::default()
        };
        let mut country_arg: Option<&str> = None;

        for arg in args {
            if looks_like_decade(arg) {
                let decade = parse_decade(arg)?;
                if !filters.decades.contains(&decade) {
                    filters.decades.push(decade);
                }
                continue;
            }

            if let Some(previous) = country_arg {
                return Err(Error::MultipleCountries(previous.to_string(), arg.clone()));
            }
            filters.country = Some(catalog.resolve(arg)?);
            country_arg = Some(arg);
        }

        Ok(filters)
    }
}

/// Request body of `POST /play`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub mode: &'static str,
    pub isocodes: Vec<String>,
    pub decades: Vec<u16>,
    pub moods: Vec<Mood>,
}

/// Turns [`Filters`] into a fully populated [`Query`], filling gaps at random.
pub struct QueryBuilder<R> {
    rng: R,
}

impl<R: Rng> QueryBuilder<R> {
    pub fn new(rng: R) -> Self {
        QueryBuilder { rng }
    }

    /// Resolves every omitted filter to a valid value.
    ///
    /// Moods default to all of them. Without a decade, a country gets every
    /// decade; with neither, decades are tried in random order until one
    /// catalogues a country for the moods. Without a country, one is drawn
    /// from those the service catalogues for the chosen decades and moods.
    pub async fn resolve<S: TrackSource>(&mut self, filters: &Filters, source: &S) -> Result<Query> {
        let mut moods: Vec<Mood> = filters.moods.clone();
        moods.sort();
        moods.dedup();
        if moods.is_empty() {
            moods = Mood::ALL.to_vec();
        }

        let (decades, country) = match (&filters.country, filters.decades.is_empty()) {
            (Some(iso), true) => (DECADES.to_vec(), iso.clone()),
            (Some(iso), false) => (filters.decades.clone(), iso.clone()),
            (None, false) => {
                let country = self.draw_country(&filters.decades, &moods, source).await?;
                (filters.decades.clone(), country.ok_or(Error::NotFound)?)
            }
            (None, true) => {
                let mut shuffled = DECADES;
                shuffled.shuffle(&mut self.rng);
                let mut found = None;
                for decade in shuffled {
                    if let Some(country) = self.draw_country(&[decade], &moods, source).await? {
                        found = Some((vec![decade], country));
                        break;
                    }
                }
                found.ok_or(Error::NotFound)?
            }
        };

        Ok(Query {
            mode: "explore",
            isocodes: vec![country],
            decades,
            moods,
        })
    }

    async fn draw_country<S: TrackSource>(
        &mut self,
        decades: &[u16],
        moods: &[Mood],
        source: &S,
    ) -> Result<Option<String>> {
        let mut candidates = BTreeSet::new();
        for decade in decades {
            candidates.extend(source.mood_catalog(*decade).await?.countries_for(moods));
        }
        let candidates: Vec<String> = candidates.into_iter().collect();
        debug!(
            "{} candidate countries for {decades:?} / {moods:?}",
            candidates.len()
        );
        Ok(candidates.choose(&mut self.rng).cloned())
    }
}
