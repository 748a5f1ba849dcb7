mod memory;
mod sqlite;

pub use memory::InMemoryMusicStore;
pub use sqlite::SqliteMusicStore;

use crate::models::{PlayHistoryEntry, Song, SongId};
use anyhow::Result;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Song library plus the play history recorded against it.
///
/// One playlist is generated at a time, so implementations are single
/// writer and need no locking.
#[cfg_attr(test, mockall::automock)]
pub trait MusicStore {
    /// Every song in the library, in no particular order
    fn songs(&self) -> Result<Vec<Song>>;

    /// Ids of songs with a play recorded strictly after `since`
    fn played_song_ids_since(&self, since: NaiveDateTime) -> Result<HashSet<SongId>>;

    /// Append one play to the history. The song must already be in the
    /// library; an unknown id is an error.
    fn record_play(&mut self, entry: &PlayHistoryEntry) -> Result<()>;

    /// Add a song to the library. Returns `None` if a song with the same
    /// file path is already cataloged.
    fn add_song(&mut self, song: &Song) -> Result<Option<SongId>>;

    /// Full play history, oldest first
    fn play_history(&self) -> Result<Vec<PlayHistoryEntry>>;
}
