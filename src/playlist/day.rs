use super::config::{DaySelectionConfig, Mood, Preferences};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

const PLAYLIST_DURATION_HOURS: usize = 8;
const SONGS_PER_HOUR: usize = 15;

/// Genre, mood and energy picked for a time of the week
#[derive(Debug, Clone, PartialEq)]
pub struct DayProfile {
    pub genre: String,
    pub mood: Mood,
    pub energy_level: u8,
}

impl DayProfile {
    fn new(genre: &str, mood: Mood, energy_level: u8) -> Self {
        Self {
            genre: genre.to_string(),
            mood,
            energy_level,
        }
    }

    /// Profile by weekday/weekend and hour of the playlist start
    pub fn for_datetime(start: NaiveDateTime) -> Self {
        let weekend = matches!(start.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = start.hour();

        if weekend {
            match hour {
                0..=9 => Self::new("Indie Folk", Mood::Morning, 3),
                10..=13 => Self::new("Indie Rock", Mood::Energetic, 8),
                14..=17 => Self::new("mixed", Mood::Party, 9),
                _ => Self::new("Alternative Dance", Mood::Evening, 6),
            }
        } else {
            match hour {
                0..=8 => Self::new("Other", Mood::Morning, 4),
                9..=11 => Self::new("Indie", Mood::Focused, 5),
                12..=16 => Self::new("Rock", Mood::Focused, 6),
                _ => Self::new("Art Rock", Mood::Relaxed, 3),
            }
        }
    }
}

/// Holiday name and the genre it overrides the day with
pub fn special_occasion(date: NaiveDate) -> Option<(&'static str, &'static str)> {
    match (date.month(), date.day()) {
        (12, 25) => Some(("Christmas", "holiday")),
        (10, 31) => Some(("Halloween", "spooky")),
        (7, 4) => Some(("Independence Day", "Rock")),
        _ => None,
    }
}

impl DaySelectionConfig {
    /// Build today's configuration from the playlist start time alone
    pub fn for_start(start: NaiveDateTime) -> Self {
        let profile = DayProfile::for_datetime(start);
        let occasion = special_occasion(start.date());
        let genre = occasion
            .map(|(_, genre)| genre.to_string())
            .unwrap_or(profile.genre);

        Self {
            genre,
            mood: profile.mood,
            energy_level: profile.energy_level,
            total_songs: PLAYLIST_DURATION_HOURS * SONGS_PER_HOUR,
            playlist_start_time: start,
            preferences: Preferences {
                avoid_explicit: true,
                prefer_instrumental: profile.mood == Mood::Focused,
            },
            day_name: Some(start.format("%A").to_string()),
            weather: None,
            special_occasion: occasion.map(|(name, _)| name.to_string()),
        }
    }
}
