use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Row identifier of a song in the music library
pub type SongId = i64;

/// Duration assumed for songs whose length was never tagged
pub const DEFAULT_SONG_DURATION_SECONDS: u32 = 180;

/// Genre value used by the tagger for songs it could not classify
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A song from the local music library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub id: SongId,
    pub file_path: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    pub genre: Option<String>,
    pub duration_seconds: Option<u32>,
    #[serde(default = "default_energy_level")]
    pub energy_level: u8,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub instrumental: bool,
}

fn default_energy_level() -> u8 {
    5
}

pub(crate) fn default_title() -> String {
    "Unknown".to_string()
}

pub(crate) fn default_artist() -> String {
    "Unknown Artist".to_string()
}

impl Song {
    /// Duration used for timeline math
    pub fn duration_or_default(&self) -> u32 {
        self.duration_seconds
            .unwrap_or(DEFAULT_SONG_DURATION_SECONDS)
    }

    /// Whether the song carries no usable genre tag
    pub fn is_untagged(&self) -> bool {
        match self.genre.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(genre) => genre == UNKNOWN_GENRE,
        }
    }
}

impl Default for Song {
    fn default() -> Self {
        Song {
            id: 0,
            file_path: String::new(),
            title: default_title(),
            artist: default_artist(),
            album: String::new(),
            genre: None,
            duration_seconds: None,
            energy_level: default_energy_level(),
            explicit: false,
            instrumental: false,
        }
    }
}

/// One row of the append-only play history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayHistoryEntry {
    pub song_id: SongId,
    pub played_at: NaiveDateTime,
    pub playlist_date: NaiveDate,
}
