use crate::models::{Song, SongId};
use crate::store::MusicStore;
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use std::collections::HashSet;
use std::fmt;

/// Which genre a catalog query accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreSelector {
    /// Exact genre name as tagged in the library
    Exact(String),
    /// Songs with no genre, an empty genre or the `Unknown` marker
    Untagged,
    /// No genre filter
    Any,
}

impl fmt::Display for GenreSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreSelector::Exact(genre) => write!(f, "{genre}"),
            GenreSelector::Untagged => write!(f, "Other"),
            GenreSelector::Any => write!(f, "mixed"),
        }
    }
}

/// Inclusive energy range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyBand {
    pub lo: u8,
    pub hi: u8,
}

impl EnergyBand {
    pub const FULL: EnergyBand = EnergyBand { lo: 1, hi: 10 };

    /// The +/-2 band around a target energy level, clamped to 1..=10
    pub fn around(level: u8) -> Self {
        let level = level.clamp(1, 10);
        Self {
            lo: level.saturating_sub(2).max(1),
            hi: (level + 2).min(10),
        }
    }

    pub fn contains(&self, energy: u8) -> bool {
        (self.lo..=self.hi).contains(&energy)
    }
}

/// A set of predicates over the catalog, combined with logical AND
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub genre: GenreSelector,
    pub energy: Option<EnergyBand>,
    pub exclude_recent_days: u32, // 0 disables the recent-play exclusion
    pub avoid_explicit: bool,
    pub prefer_instrumental: bool,
}

impl CatalogQuery {
    /// Run the query against a store. The result is an unordered pool.
    pub fn run(&self, store: &dyn MusicStore, now: NaiveDateTime) -> Result<Vec<Song>> {
        let recent = self.recently_played(store, now)?;
        Ok(store
            .songs()?
            .into_iter()
            .filter(|song| SongFilters::should_include_song(song, self, &recent))
            .collect())
    }

    fn recently_played(
        &self,
        store: &dyn MusicStore,
        now: NaiveDateTime,
    ) -> Result<HashSet<SongId>> {
        if self.exclude_recent_days == 0 {
            return Ok(HashSet::new());
        }
        let since = now - Duration::days(i64::from(self.exclude_recent_days));
        store.played_song_ids_since(since)
    }
}

/// Song filtering functionality using static helper functions
pub struct SongFilters;

impl SongFilters {
    /// Check if a song matches the genre selector
    pub fn matches_genre(song: &Song, genre: &GenreSelector) -> bool {
        match genre {
            GenreSelector::Any => true,
            GenreSelector::Untagged => song.is_untagged(),
            GenreSelector::Exact(name) => {
                song.genre.as_deref().map(str::trim) == Some(name.trim())
            }
        }
    }

    /// Check if a song's energy falls inside the band (no band accepts everything)
    pub fn matches_energy(song: &Song, energy: Option<&EnergyBand>) -> bool {
        energy.is_none_or(|band| band.contains(song.energy_level))
    }

    /// Check the explicit/instrumental preferences
    pub fn matches_preferences(song: &Song, avoid_explicit: bool, prefer_instrumental: bool) -> bool {
        !(avoid_explicit && song.explicit) && (!prefer_instrumental || song.instrumental)
    }

    /// Check that the song was not played inside the exclusion window
    pub fn not_recently_played(song: &Song, recent: &HashSet<SongId>) -> bool {
        !recent.contains(&song.id)
    }

    /// Apply all filters to determine if a song belongs in the pool
    pub fn should_include_song(song: &Song, query: &CatalogQuery, recent: &HashSet<SongId>) -> bool {
        Self::not_recently_played(song, recent)
            && Self::matches_genre(song, &query.genre)
            && Self::matches_energy(song, query.energy.as_ref())
            && Self::matches_preferences(song, query.avoid_explicit, query.prefer_instrumental)
    }
}
