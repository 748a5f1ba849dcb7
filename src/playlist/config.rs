use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Overall feel of the day's programming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    Relaxed,
    Focused,
    Party,
    Morning,
    Evening,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Relaxed => "relaxed",
            Mood::Focused => "focused",
            Mood::Party => "party",
            Mood::Morning => "morning",
            Mood::Evening => "evening",
        }
    }
}

/// Listener preferences applied to every catalog query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_avoid_explicit")]
    pub avoid_explicit: bool,
    #[serde(default)]
    pub prefer_instrumental: bool,
}

fn default_avoid_explicit() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            avoid_explicit: default_avoid_explicit(),
            prefer_instrumental: false,
        }
    }
}

/// What to play today, as decided by the day profile (or a hand-written file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySelectionConfig {
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_mood")]
    pub mood: Mood,
    #[serde(default = "default_energy_level")]
    pub energy_level: u8, // center of the +/-2 energy band
    #[serde(default = "default_total_songs")]
    pub total_songs: usize,
    pub playlist_start_time: NaiveDateTime,
    #[serde(default)]
    pub preferences: Preferences,
    pub day_name: Option<String>,
    pub weather: Option<String>, // supplied by the weather collaborator, if any
    pub special_occasion: Option<String>,
}

fn default_genre() -> String {
    super::genres::MIXED_GENRE.to_string()
}

fn default_mood() -> Mood {
    Mood::Energetic
}

fn default_energy_level() -> u8 {
    5
}

fn default_total_songs() -> usize {
    100
}

impl DaySelectionConfig {
    /// Load a day configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read day config {}", path.display()))?;
        let config: DaySelectionConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse day config {}", path.display()))?;
        Ok(config)
    }

    /// Weekday name shown to listeners, derived from the start time unless overridden
    pub fn day_name(&self) -> String {
        self.day_name
            .clone()
            .unwrap_or_else(|| self.playlist_start_time.format("%A").to_string())
    }
}

/// One configured DJ spot: when it should air and what it may talk about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub content: Vec<String>,
}

/// The DJ schedule configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DjSchedule {
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

/// Schedule file as written on disk, before each entry is checked
#[derive(Deserialize)]
struct RawDjSchedule {
    #[serde(default)]
    schedules: Vec<serde_json::Value>,
}

impl DjSchedule {
    /// Load the schedule from JSON. A missing file means no DJ spots today.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "DJ schedule config file {} not found. Using empty schedule.",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read DJ schedule {}", path.display()));
            }
        };
        let raw: RawDjSchedule = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse DJ schedule {}", path.display()))?;

        let schedules = raw
            .schedules
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<ScheduleEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping DJ schedule entry {}: {e}", i + 1);
                    None
                }
            })
            .collect();
        Ok(Self { schedules })
    }
}
