use super::config::Preferences;
use super::filters::{CatalogQuery, EnergyBand, GenreSelector};
use super::metadata::CuratedPlaylist;
use crate::models::{PlayHistoryEntry, Song, SongId};
use crate::store::MusicStore;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Which rung of the fallback ladder produced the final pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// Requested genre, energy band, exclusion window and preferences
    Requested,
    /// Genre filter dropped
    AnyGenre,
    /// Only explicit/instrumental preferences kept
    Relaxed,
}

/// Everything the curator needs to know about today's selection
#[derive(Debug, Clone, PartialEq)]
pub struct CurationRequest {
    pub genre: GenreSelector,
    pub energy_level: u8,
    pub total_songs: usize,
    pub preferences: Preferences,
    pub exclude_recent_days: u32,
}

impl CurationRequest {
    /// Queries for each fallback tier, loosest last
    pub fn fallback_ladder(&self) -> [(SelectionTier, CatalogQuery); 3] {
        let requested = CatalogQuery {
            genre: self.genre.clone(),
            energy: Some(EnergyBand::around(self.energy_level)),
            exclude_recent_days: self.exclude_recent_days,
            avoid_explicit: self.preferences.avoid_explicit,
            prefer_instrumental: self.preferences.prefer_instrumental,
        };
        let any_genre = CatalogQuery {
            genre: GenreSelector::Any,
            ..requested.clone()
        };
        let relaxed = CatalogQuery {
            genre: GenreSelector::Any,
            energy: Some(EnergyBand::FULL),
            exclude_recent_days: 0,
            ..requested.clone()
        };
        [
            (SelectionTier::Requested, requested),
            (SelectionTier::AnyGenre, any_genre),
            (SelectionTier::Relaxed, relaxed),
        ]
    }
}

/// Picks today's songs from the store and records them in the play history
pub struct MusicCurator {
    record_history: bool,
}

impl MusicCurator {
    pub fn new() -> Self {
        Self {
            record_history: true,
        }
    }

    /// A curator that selects songs but leaves the play history untouched
    pub fn without_history() -> Self {
        Self {
            record_history: false,
        }
    }

    /// Walk the fallback ladder, sample the final pool and record the picks.
    ///
    /// A pool smaller than the target yields a shorter playlist; that is
    /// logged, not returned as an error.
    pub fn curate<R: Rng + ?Sized>(
        &self,
        store: &mut dyn MusicStore,
        request: &CurationRequest,
        now: NaiveDateTime,
        playlist_date: NaiveDate,
        rng: &mut R,
    ) -> Result<CuratedPlaylist> {
        let target = request.total_songs;
        let mut pool = Vec::new();
        let mut tier = SelectionTier::Requested;

        for (ladder_tier, query) in request.fallback_ladder() {
            match ladder_tier {
                SelectionTier::Requested => {}
                SelectionTier::AnyGenre => warn!(
                    "Only {} songs available for genre '{}', using all genres...",
                    pool.len(),
                    request.genre
                ),
                SelectionTier::Relaxed => warn!(
                    "Still only {} songs, removing recent play restriction and energy band...",
                    pool.len()
                ),
            }
            pool = query.run(&*store, now)?;
            tier = ladder_tier;
            if pool.len() >= target {
                break;
            }
        }

        if pool.len() < target {
            warn!(
                "Catalog only has {} eligible songs, playlist will be shorter than the requested {}",
                pool.len(),
                target
            );
        }

        let songs = select_songs(pool, target, rng);

        if self.record_history {
            for song in &songs {
                store.record_play(&PlayHistoryEntry {
                    song_id: song.id,
                    played_at: now,
                    playlist_date,
                })?;
            }
        }

        info!("Curated {} songs ({:?} tier)", songs.len(), tier);

        Ok(CuratedPlaylist::new(songs, tier, target, now))
    }
}

impl Default for MusicCurator {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniformly sample `min(pool.len(), target)` distinct songs
pub fn select_songs<R: Rng + ?Sized>(mut pool: Vec<Song>, target: usize, rng: &mut R) -> Vec<Song> {
    let mut seen: HashSet<SongId> = HashSet::new();
    pool.retain(|song| seen.insert(song.id));

    let count = target.min(pool.len());
    let (selected, _) = pool.partial_shuffle(rng, count);
    selected.to_vec()
}
