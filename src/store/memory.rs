use super::MusicStore;
use crate::models::{PlayHistoryEntry, Song, SongId};
use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Music store kept entirely in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryMusicStore {
    songs: Vec<Song>,
    history: Vec<PlayHistoryEntry>,
}

impl InMemoryMusicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-identified songs, keeping their ids
    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            songs,
            history: Vec::new(),
        }
    }

    fn next_id(&self) -> SongId {
        self.songs.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }
}

impl MusicStore for InMemoryMusicStore {
    fn songs(&self) -> Result<Vec<Song>> {
        Ok(self.songs.clone())
    }

    fn played_song_ids_since(&self, since: NaiveDateTime) -> Result<HashSet<SongId>> {
        Ok(self
            .history
            .iter()
            .filter(|entry| entry.played_at > since)
            .map(|entry| entry.song_id)
            .collect())
    }

    fn record_play(&mut self, entry: &PlayHistoryEntry) -> Result<()> {
        if !self.songs.iter().any(|s| s.id == entry.song_id) {
            bail!("Cannot record play for unknown song id {}", entry.song_id);
        }
        self.history.push(entry.clone());
        Ok(())
    }

    fn add_song(&mut self, song: &Song) -> Result<Option<SongId>> {
        if self.songs.iter().any(|s| s.file_path == song.file_path) {
            return Ok(None);
        }
        let id = self.next_id();
        self.songs.push(Song {
            id,
            ..song.clone()
        });
        Ok(Some(id))
    }

    fn play_history(&self) -> Result<Vec<PlayHistoryEntry>> {
        Ok(self.history.clone())
    }
}
