//! Terminal rendering of tracks, banners and country lists.

use crossterm::style::{Color, Stylize};

use crate::clients::{Country, Mood, Track};
use crate::query::{CountryCatalog, Filters};

const MAUVE: Color = Color::Rgb { r: 203, g: 166, b: 247 };
const PINK: Color = Color::Rgb { r: 245, g: 194, b: 231 };
const PEACH: Color = Color::Rgb { r: 250, g: 179, b: 135 };
const GREEN: Color = Color::Rgb { r: 166, g: 227, b: 161 };
const BLUE: Color = Color::Rgb { r: 137, g: 180, b: 250 };
const YELLOW: Color = Color::Rgb { r: 249, g: 226, b: 175 };
const RED: Color = Color::Rgb { r: 243, g: 139, b: 168 };
const TEXT: Color = Color::Rgb { r: 205, g: 214, b: 244 };
const SUBTEXT: Color = Color::Rgb { r: 166, g: 173, b: 200 };
const SURFACE: Color = Color::Rgb { r: 69, g: 71, b: 90 };

const RULE_WIDTH: usize = 50;

pub fn format_length(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn mood_color(mood: &str) -> Color {
    match mood {
        "slow" => BLUE,
        "fast" => PEACH,
        "weird" => MAUVE,
        _ => TEXT,
    }
}

fn rule() -> String {
    format!("  {}", "─".repeat(RULE_WIDTH).with(SURFACE))
}

// Every line, the last included, ends in a newline.
fn block(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

pub fn track_card(track: &Track, catalog: &CountryCatalog) -> String {
    let country = track
        .country
        .as_deref()
        .map_or("?", |iso| catalog.display_name(iso));
    let mood = track.mood.as_deref().unwrap_or("?");

    let mut lines = vec![
        String::new(),
        rule(),
        format!("  {}", format!("♫ {}", track.artist).with(PINK).bold()),
        format!("  {}", track.title.as_str().with(TEXT).bold()),
    ];
    if let Some(album) = &track.album {
        lines.push(format!("  {}", album.as_str().with(SUBTEXT)));
    }
    lines.push(String::new());
    lines.push(format!(
        "  {}  ·  {}  ·  {}  ·  {}",
        country.with(GREEN),
        track.year.as_deref().unwrap_or("?").with(YELLOW),
        mood.with(mood_color(mood)),
        format_length(track.length_secs).with(SUBTEXT),
    ));

    let mut credits = Vec::new();
    if let Some(label) = &track.label {
        credits.push(label.clone());
    }
    if let Some(songwriter) = &track.songwriter {
        credits.push(format!("written by {songwriter}"));
    }
    if !credits.is_empty() {
        lines.push(format!("  {}", credits.join(" · ").dim()));
    }
    lines.push(rule());
    block(&lines)
}

/// Header shown once at the start of continuous mode.
pub fn banner(filters: &Filters, catalog: &CountryCatalog) -> String {
    let mut lines = vec![
        String::new(),
        format!("  {}", "📻  radiooooo".with(MAUVE).bold()),
        format!("  {}", "Music from everywhere, everywhen".with(SUBTEXT)),
    ];

    let mut parts = Vec::new();
    if let Some(iso) = &filters.country {
        parts.push(catalog.display_name(iso).to_string());
    }
    if !filters.decades.is_empty() {
        let decades: Vec<String> = filters.decades.iter().map(|d| format!("{d}s")).collect();
        parts.push(decades.join(", "));
    }
    let mut moods = filters.moods.clone();
    moods.sort();
    moods.dedup();
    if !moods.is_empty() && moods != Mood::ALL {
        let moods: Vec<&str> = moods.iter().map(|m| m.as_str()).collect();
        parts.push(moods.join(", "));
    }
    if !parts.is_empty() {
        lines.push(format!("  {}", format!("Filters: {}", parts.join(" · ")).dim()));
    }

    lines.push(String::new());
    lines.push(format!("  {}", "[n] next  [q] quit".with(SUBTEXT)));
    block(&lines)
}

pub fn country_list(heading: &str, countries: &[Country]) -> String {
    let mut lines = vec![String::new(), format!("  {}", heading.bold()), String::new()];
    lines.extend(
        countries
            .iter()
            .map(|country| format!("  {}  {}", country.iso.as_str().with(BLUE), country.name)),
    );
    lines.push(String::new());
    lines.push(format!("  {}", format!("{} countries", countries.len()).dim()));
    block(&lines)
}

pub fn goodbye() -> String {
    format!("\n  {}\n", "goodbye 📻".dim())
}

pub fn error_message(message: &str) -> String {
    message.with(RED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CountryCatalog {
        CountryCatalog::new(vec![("ITA".to_string(), "Italy".to_string()).into()])
    }

    #[test]
    fn length_is_minutes_and_padded_seconds() {
        assert_eq!(format_length(0), "0:00");
        assert_eq!(format_length(185), "3:05");
        assert_eq!(format_length(3600), "60:00");
    }

    #[test]
    fn card_shows_metadata_and_country_name() {
        let track = Track {
            artist: "Mina".into(),
            title: "Se telefonando".into(),
            album: Some("Studio Uno 66".into()),
            year: Some("1966".into()),
            country: Some("ITA".into()),
            mood: Some("slow".into()),
            label: Some("Ri-Fi".into()),
            songwriter: Some("Ennio Morricone".into()),
            length_secs: 181,
            stream_url: "https://example.test/a.mp3".into(),
            ..Default::default()
        };

        let card = track_card(&track, &catalog());
        for needle in [
            "Mina",
            "Se telefonando",
            "Studio Uno 66",
            "Italy",
            "1966",
            "slow",
            "3:01",
            "written by Ennio Morricone",
        ] {
            assert!(card.contains(needle), "card is missing {needle}");
        }
    }

    #[test]
    fn unknown_country_code_is_shown_as_is() {
        let track = Track {
            country: Some("XYZ".into()),
            ..Default::default()
        };
        assert!(track_card(&track, &catalog()).contains("XYZ"));
    }

    #[test]
    fn banner_lists_filters_but_not_all_moods() {
        let filters = Filters {
            country: Some("ITA".into()),
            decades: vec![1970],
            moods: Mood::ALL.to_vec(),
        };
        let banner = banner(&filters, &catalog());
        assert!(banner.contains("Italy · 1970s"));
        assert!(!banner.contains("weird"));
    }

    #[test]
    fn country_list_counts_entries() {
        let listing = country_list("All countries:", &catalog().sorted_by_name());
        assert!(listing.contains("Italy"));
        assert!(listing.contains("1 countries"));
    }

    #[test]
    fn listing_is_one_line_per_country() {
        let countries: Vec<Country> = vec![
            ("ITA".to_string(), "Italy".to_string()).into(),
            ("JPN".to_string(), "Japan".to_string()).into(),
        ];
        let listing = country_list("All countries:", &countries);
        let lines: Vec<&str> = listing.lines().collect();
        // blank, heading, blank, two countries, blank, count
        assert_eq!(lines.len(), 7);
        assert!(lines[3].ends_with("Italy"));
        assert!(lines[4].ends_with("Japan"));
        assert!(listing.starts_with('\n'));
        assert!(lines[6].contains("2 countries"));
        assert!(listing.ends_with('\n'));
    }
}
