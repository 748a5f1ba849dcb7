use super::filters::GenreSelector;
use crate::models::{Song, UNKNOWN_GENRE};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Genre name meaning "any genre"
pub const MIXED_GENRE: &str = "mixed";
/// Genre name meaning "untagged or unknown songs"
pub const OTHER_GENRE: &str = "Other";

/// Distinct non-empty genre tags in the library, sorted
pub fn available_genres(songs: &[Song]) -> Vec<String> {
    songs
        .iter()
        .filter_map(|song| song.genre.as_deref())
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Turn the day's requested genre into a catalog selector.
///
/// The `mixed` and `Other` names match case-insensitively; real genre names
/// must match the library tag exactly, ignoring surrounding whitespace.
/// A genre the library does not carry falls back to untagged songs when the
/// library has `Unknown` tags, otherwise to no genre filter at all.
pub fn resolve_genre(requested: &str, available: &[String]) -> GenreSelector {
    let requested = requested.trim();
    if requested.eq_ignore_ascii_case(MIXED_GENRE) {
        return GenreSelector::Any;
    }
    if requested.eq_ignore_ascii_case(OTHER_GENRE) {
        return GenreSelector::Untagged;
    }
    if available.iter().any(|genre| genre == requested) {
        return GenreSelector::Exact(requested.to_string());
    }

    if available.iter().any(|genre| genre == UNKNOWN_GENRE) {
        warn!("Genre '{requested}' not found. Using 'Other' (Unknown/untagged songs)");
        GenreSelector::Untagged
    } else {
        warn!(
            "Genre '{requested}' not found. Available genres: {}",
            available.join(", ")
        );
        GenreSelector::Any
    }
}

/// Number of songs carrying one genre tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

/// Songs per genre, most common first. Untagged songs are grouped together.
pub fn genre_counts(songs: &[Song]) -> Vec<GenreCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for song in songs {
        let name = if song.is_untagged() {
            "Unknown/Other".to_string()
        } else {
            song.genre.as_deref().unwrap_or_default().trim().to_string()
        };
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut counts: Vec<GenreCount> = counts
        .into_iter()
        .map(|(name, count)| GenreCount { name, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Genre names accepted in a day configuration
pub fn valid_genre_names(songs: &[Song]) -> Vec<String> {
    let mut names: Vec<String> = available_genres(songs)
        .into_iter()
        .filter(|genre| genre != UNKNOWN_GENRE)
        .collect();
    names.push(OTHER_GENRE.to_string());
    names.push(MIXED_GENRE.to_string());
    names.sort();
    names
}
