use super::config::{DaySelectionConfig, Mood};
use super::curator::SelectionTier;
use crate::models::Song;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Songs picked for the day, in the order they will play
#[derive(Debug, Clone, Serialize)]
pub struct CuratedPlaylist {
    pub songs: Vec<Song>,
    pub total_duration_seconds: u64,
    pub tier: SelectionTier,
    pub requested_songs: usize,
    pub created_at: NaiveDateTime,
}

impl CuratedPlaylist {
    pub fn new(
        songs: Vec<Song>,
        tier: SelectionTier,
        requested_songs: usize,
        created_at: NaiveDateTime,
    ) -> Self {
        let total_duration_seconds = songs
            .iter()
            .map(|song| u64::from(song.duration_or_default()))
            .sum();
        Self {
            songs,
            total_duration_seconds,
            tier,
            requested_songs,
            created_at,
        }
    }

    /// True when fallback could not fill the requested length
    pub fn is_short(&self) -> bool {
        self.songs.len() < self.requested_songs
    }
}

/// Where a scheduled clock time lands on the song timeline
#[derive(Debug, Clone, PartialEq)]
pub struct SpotPlacement {
    pub spot_number: usize,     // 1-based position in the schedule
    pub after_song_index: usize, // 1-based: the spot airs after this many songs
    pub elapsed_seconds: u64,
    pub estimated_at: NaiveDateTime,
    pub target_time: String,
    pub content_tags: Vec<String>,
}

impl SpotPlacement {
    pub fn approximate_time(&self) -> String {
        self.estimated_at.format("%H:%M").to_string()
    }

    pub fn accumulated_minutes(&self) -> f64 {
        self.elapsed_seconds as f64 / 60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SongStatus {
    JustPlayed,
    ComingUp,
}

/// A song mentioned around a DJ spot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongMention {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub status: SongStatus,
}

/// Songs surrounding a spot, for the script writer's narrative
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SongContext {
    pub recent_songs: Vec<SongMention>,
    pub upcoming_songs: Vec<SongMention>,
}

/// Day-level context handed to every spot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotContext {
    pub day_name: String,
    pub weather: Option<String>,
    pub mood: Mood,
    pub genre: String,
    pub special_occasion: Option<String>,
}

impl SpotContext {
    pub fn from_day(config: &DaySelectionConfig) -> Self {
        Self {
            day_name: config.day_name(),
            weather: config.weather.clone(),
            mood: config.mood,
            genre: config.genre.clone(),
            special_occasion: config.special_occasion.clone(),
        }
    }
}

/// A fully planned DJ spot, ready for script and speech generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpot {
    pub spot_number: usize,
    #[serde(rename = "type")]
    pub content_type: String,
    pub approximate_time: String,
    pub target_time: String,
    pub content_tags: Vec<String>,
    pub after_song_index: usize,
    pub accumulated_minutes: f64,
    pub context: SpotContext,
    pub song_context: SongContext,
    pub duration_target_seconds: u32,
    pub tone: String,
    pub include_elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistInfo {
    pub total_songs: usize,
    pub total_duration_seconds: u64,
}

/// The DJ spot plan for one playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotPlan {
    pub total_spots: usize,
    pub spots: Vec<ResolvedSpot>,
    pub playlist_info: PlaylistInfo,
}

/// Everything generated for one day
#[derive(Debug, Clone, Serialize)]
pub struct DailyPlaylist {
    pub date: NaiveDate,
    pub config: DaySelectionConfig,
    pub curated: CuratedPlaylist,
    pub spot_plan: SpotPlan,
}
