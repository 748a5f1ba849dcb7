use super::metadata::{
    ResolvedSpot, SongContext, SongMention, SongStatus, SpotContext, SpotPlacement,
};
use crate::models::Song;
use chrono::Timelike;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::debug;

/// Content type used when a spot has no tags
pub const GENERAL_CONTENT: &str = "general";

const DEFAULT_TONE: &str = "friendly and professional";
const DEFAULT_ELEMENTS: &[&str] = &["general_content"];

const RECENT_SONGS: usize = 2;
const UPCOMING_SONGS: usize = 5;
const SPOKEN_SECONDS_MIN: u32 = 10;
const SPOKEN_SECONDS_MAX: u32 = 30;

/// Schedule tag -> internal content type
const TAG_MAPPING: &[(&str, &str)] = &[
    ("weather", "weather"),
    ("events", "event_mention"),
    ("motivation", "motivation"),
    ("facts", "fun_fact"),
    ("jokes", "joke"),
];

const TONES: &[(&str, &str)] = &[
    ("weather", "informative and pleasant"),
    ("motivation", "inspiring and upbeat"),
    ("fun_fact", "curious and engaging"),
    ("joke", "lighthearted and funny"),
    ("event_mention", "excited and informative"),
    ("general", "friendly and engaging"),
    ("trivia", "playful and curious"),
    ("random_thought", "reflective and warm"),
    ("music_info", "enthusiastic and knowledgeable"),
    ("morning_greeting", "warm and energetic"),
    ("daily_schedule", "encouraging and organized"),
    ("time_check", "brisk and friendly"),
    ("hour_announcement", "confident and crisp"),
    ("lunch_reminder", "relaxed and friendly"),
    ("afternoon_boost", "upbeat and encouraging"),
    ("evening_greeting", "warm and mellow"),
    ("dinner_suggestion", "cozy and inviting"),
    ("evening_wind_down", "calm and soothing"),
    ("tomorrow_preview", "hopeful and easygoing"),
];

const ELEMENTS: &[(&str, &[&str])] = &[
    ("weather", &["current_weather", "temperature", "weather_advice"]),
    ("motivation", &["inspirational_quote", "encouragement"]),
    ("fun_fact", &["interesting_fact", "did_you_know"]),
    ("joke", &["setup", "punchline"]),
    ("event_mention", &["event_details", "time_reference", "location_info"]),
    ("general", &["greeting", "music_transition"]),
    ("trivia", &["music_trivia", "music_transition"]),
    ("random_thought", &["reflection", "music_transition"]),
    ("music_info", &["genre_mention", "curation_note"]),
    ("morning_greeting", &["greeting", "day_reference"]),
    ("daily_schedule", &["time_reference", "day_reference"]),
    ("time_check", &["time_reference"]),
    ("hour_announcement", &["time_reference", "station_reminder"]),
    ("lunch_reminder", &["time_reference", "break_suggestion"]),
    ("afternoon_boost", &["energy_check", "encouragement"]),
    ("evening_greeting", &["greeting", "day_reference"]),
    ("dinner_suggestion", &["meal_reference", "music_transition"]),
    ("evening_wind_down", &["relaxation_cue", "music_transition"]),
    ("tomorrow_preview", &["tomorrow_reference", "sign_off"]),
];

/// Content categories that should air at most once per day
pub const ROTATING_CONTENT: &[&str] = &[
    "fun_fact",
    "trivia",
    "joke",
    "motivation",
    "random_thought",
    "music_info",
];

/// Map a schedule tag to its internal content type; unknown tags pass through
pub fn content_type_for_tag(tag: &str) -> &str {
    TAG_MAPPING
        .iter()
        .find(|(from, _)| *from == tag)
        .map(|(_, to)| *to)
        .unwrap_or(tag)
}

/// Delivery tone for a content type
pub fn tone_for(content_type: &str) -> &'static str {
    TONES
        .iter()
        .find(|(kind, _)| *kind == content_type)
        .map(|(_, tone)| *tone)
        .unwrap_or(DEFAULT_TONE)
}

/// Elements the script must contain for a content type
pub fn elements_for(content_type: &str) -> &'static [&'static str] {
    ELEMENTS
        .iter()
        .find(|(kind, _)| *kind == content_type)
        .map(|(_, elements)| *elements)
        .unwrap_or(DEFAULT_ELEMENTS)
}

/// Generic categories for a given hour, used once rotating content runs out
pub fn time_of_day_content(hour: u32) -> &'static [&'static str] {
    match hour {
        0..=11 => &["morning_greeting", "daily_schedule", "time_check"],
        12..=13 => &["lunch_reminder", "time_check", "hour_announcement"],
        14..=16 => &["afternoon_boost", "time_check", "hour_announcement"],
        17..=20 => &["evening_greeting", "dinner_suggestion", "evening_wind_down"],
        _ => &["evening_wind_down", "tomorrow_preview", "time_check"],
    }
}

/// The two songs before a spot and up to five after it
pub fn song_context(songs: &[Song], after_song_index: usize) -> SongContext {
    let split = after_song_index.min(songs.len());
    let mention = |song: &Song, status| SongMention {
        title: song.title.clone(),
        artist: song.artist.clone(),
        album: song.album.clone(),
        status,
    };

    SongContext {
        recent_songs: songs[split.saturating_sub(RECENT_SONGS)..split]
            .iter()
            .map(|song| mention(song, SongStatus::JustPlayed))
            .collect(),
        upcoming_songs: songs[split..(split + UPCOMING_SONGS).min(songs.len())]
            .iter()
            .map(|song| mention(song, SongStatus::ComingUp))
            .collect(),
    }
}

/// Decides what each DJ spot talks about.
///
/// With daily rotation enabled the assigner remembers which rotating
/// categories already aired, so one instance must be used per playlist.
#[derive(Debug, Default)]
pub struct ContentAssigner {
    used_today: Option<HashSet<String>>,
}

impl ContentAssigner {
    pub fn new() -> Self {
        Self { used_today: None }
    }

    pub fn with_daily_rotation() -> Self {
        Self {
            used_today: Some(HashSet::new()),
        }
    }

    /// Pick one content type from the spot's tags, uniformly at random
    pub fn choose_content_type<R: Rng + ?Sized>(
        &mut self,
        tags: &[String],
        hour: u32,
        rng: &mut R,
    ) -> String {
        let picked = tags
            .choose(rng)
            .map(|tag| content_type_for_tag(tag).to_string())
            .unwrap_or_else(|| GENERAL_CONTENT.to_string());

        match self.used_today.as_mut() {
            Some(used) => rotate(used, picked, hour, rng),
            None => picked,
        }
    }

    /// Attach content, tone, elements and song context to every placement
    pub fn assign<R: Rng + ?Sized>(
        &mut self,
        placements: &[SpotPlacement],
        songs: &[Song],
        context: &SpotContext,
        rng: &mut R,
    ) -> Vec<ResolvedSpot> {
        placements
            .iter()
            .map(|placement| {
                let content_type =
                    self.choose_content_type(&placement.content_tags, placement.estimated_at.hour(), rng);
                ResolvedSpot {
                    spot_number: placement.spot_number,
                    approximate_time: placement.approximate_time(),
                    target_time: placement.target_time.clone(),
                    content_tags: placement.content_tags.clone(),
                    after_song_index: placement.after_song_index,
                    accumulated_minutes: placement.accumulated_minutes(),
                    context: context.clone(),
                    song_context: song_context(songs, placement.after_song_index),
                    duration_target_seconds: rng.gen_range(SPOKEN_SECONDS_MIN..=SPOKEN_SECONDS_MAX),
                    tone: tone_for(&content_type).to_string(),
                    include_elements: elements_for(&content_type)
                        .iter()
                        .map(|e| e.to_string())
                        .collect(),
                    content_type,
                }
            })
            .collect()
    }
}

fn rotate<R: Rng + ?Sized>(
    used: &mut HashSet<String>,
    picked: String,
    hour: u32,
    rng: &mut R,
) -> String {
    if !ROTATING_CONTENT.contains(&picked.as_str()) {
        return picked;
    }
    if used.insert(picked.clone()) {
        return picked;
    }

    let unused: Vec<&str> = ROTATING_CONTENT
        .iter()
        .copied()
        .filter(|kind| !used.contains(*kind))
        .collect();
    let replacement = match unused.choose(rng) {
        Some(kind) => kind.to_string(),
        None => time_of_day_content(hour)
            .choose(rng)
            .copied()
            .unwrap_or(GENERAL_CONTENT)
            .to_string(),
    };
    debug!("'{picked}' already aired today, using '{replacement}'");
    used.insert(replacement.clone());
    replacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::config::Mood;
    use chrono::{NaiveDate, NaiveDateTime};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn songs(count: usize) -> Vec<Song> {
        (1..=count)
            .map(|i| Song {
                id: i as i64,
                title: format!("Song {i}"),
                artist: format!("Artist {i}"),
                album: format!("Album {i}"),
                duration_seconds: Some(200),
                ..Song::default()
            })
            .collect()
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 13)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn context() -> SpotContext {
        SpotContext {
            day_name: "Saturday".to_string(),
            weather: None,
            mood: Mood::Energetic,
            genre: "Indie Rock".to_string(),
            special_occasion: None,
        }
    }

    #[test]
    fn tags_map_to_internal_types_or_pass_through() {
        assert_eq!(content_type_for_tag("events"), "event_mention");
        assert_eq!(content_type_for_tag("facts"), "fun_fact");
        assert_eq!(content_type_for_tag("jokes"), "joke");
        assert_eq!(content_type_for_tag("weather"), "weather");
        assert_eq!(content_type_for_tag("traffic"), "traffic");
    }

    #[test]
    fn tone_and_elements_are_stable_lookups() {
        assert_eq!(tone_for("joke"), "lighthearted and funny");
        assert_eq!(tone_for("joke"), tone_for("joke"));
        assert_eq!(elements_for("weather"), elements_for("weather"));
        assert_eq!(elements_for("joke"), &["setup", "punchline"]);
        assert_eq!(tone_for("traffic"), "friendly and professional");
        assert_eq!(elements_for("traffic"), &["general_content"]);
    }

    #[test]
    fn empty_tags_mean_general_content() {
        let mut assigner = ContentAssigner::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(assigner.choose_content_type(&[], 9, &mut rng), "general");
    }

    #[test]
    fn chosen_type_comes_from_the_spot_tags() {
        let mut assigner = ContentAssigner::new();
        let mut rng = StdRng::seed_from_u64(11);
        let spot_tags = tags(&["weather", "events"]);
        for _ in 0..50 {
            let kind = assigner.choose_content_type(&spot_tags, 9, &mut rng);
            assert!(kind == "weather" || kind == "event_mention", "unexpected {kind}");
        }
    }

    #[test]
    fn without_rotation_content_may_repeat() {
        let mut assigner = ContentAssigner::new();
        let mut rng = StdRng::seed_from_u64(3);
        let spot_tags = tags(&["facts"]);
        assert_eq!(assigner.choose_content_type(&spot_tags, 9, &mut rng), "fun_fact");
        assert_eq!(assigner.choose_content_type(&spot_tags, 9, &mut rng), "fun_fact");
    }

    #[test]
    fn rotation_exhausts_pool_then_uses_time_of_day() {
        let mut assigner = ContentAssigner::with_daily_rotation();
        let mut rng = StdRng::seed_from_u64(5);
        let spot_tags = tags(&["facts"]);

        let mut aired = HashSet::new();
        for _ in 0..ROTATING_CONTENT.len() {
            let kind = assigner.choose_content_type(&spot_tags, 9, &mut rng);
            assert!(ROTATING_CONTENT.contains(&kind.as_str()));
            assert!(aired.insert(kind), "rotating content repeated");
        }

        let fallback = assigner.choose_content_type(&spot_tags, 13, &mut rng);
        assert!(time_of_day_content(13).contains(&fallback.as_str()));
    }

    #[test]
    fn rotation_leaves_non_rotating_content_alone() {
        let mut assigner = ContentAssigner::with_daily_rotation();
        let mut rng = StdRng::seed_from_u64(5);
        let spot_tags = tags(&["weather"]);
        for _ in 0..3 {
            assert_eq!(assigner.choose_content_type(&spot_tags, 9, &mut rng), "weather");
        }
    }

    #[test]
    fn song_context_takes_two_before_and_five_after() {
        let playlist = songs(10);

        let context = song_context(&playlist, 4);
        let recent: Vec<_> = context.recent_songs.iter().map(|s| s.title.as_str()).collect();
        let upcoming: Vec<_> = context.upcoming_songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(recent, vec!["Song 3", "Song 4"]);
        assert_eq!(upcoming, vec!["Song 5", "Song 6", "Song 7", "Song 8", "Song 9"]);
        assert!(context.recent_songs.iter().all(|s| s.status == SongStatus::JustPlayed));
        assert!(context.upcoming_songs.iter().all(|s| s.status == SongStatus::ComingUp));
    }

    #[test]
    fn song_context_is_clipped_at_playlist_edges() {
        let playlist = songs(3);

        let first = song_context(&playlist, 1);
        assert_eq!(first.recent_songs.len(), 1);
        assert_eq!(first.upcoming_songs.len(), 2);

        let last = song_context(&playlist, 3);
        assert_eq!(last.recent_songs.len(), 2);
        assert!(last.upcoming_songs.is_empty());
    }

    #[test]
    fn assign_builds_complete_spots() {
        let playlist = songs(6);
        let placements = vec![SpotPlacement {
            spot_number: 2,
            after_song_index: 3,
            elapsed_seconds: 600,
            estimated_at: at(8, 10),
            target_time: "810".to_string(),
            content_tags: tags(&["jokes"]),
        }];
        let mut rng = StdRng::seed_from_u64(42);

        let spots = ContentAssigner::new().assign(&placements, &playlist, &context(), &mut rng);

        assert_eq!(spots.len(), 1);
        let spot = &spots[0];
        assert_eq!(spot.spot_number, 2);
        assert_eq!(spot.content_type, "joke");
        assert_eq!(spot.tone, "lighthearted and funny");
        assert_eq!(spot.include_elements, vec!["setup", "punchline"]);
        assert_eq!(spot.approximate_time, "08:10");
        assert_eq!(spot.target_time, "810");
        assert_eq!(spot.after_song_index, 3);
        assert_eq!(spot.song_context.recent_songs.len(), 2);
        assert_eq!(spot.song_context.upcoming_songs.len(), 3);
        assert!((10..=30).contains(&spot.duration_target_seconds));
        assert_eq!(spot.context.day_name, "Saturday");
    }

    #[test]
    fn resolved_spot_serializes_type_field() {
        let placements = vec![SpotPlacement {
            spot_number: 1,
            after_song_index: 1,
            elapsed_seconds: 200,
            estimated_at: at(8, 3),
            target_time: "8:03".to_string(),
            content_tags: vec![],
        }];
        let mut rng = StdRng::seed_from_u64(1);
        let spots = ContentAssigner::new().assign(&placements, &songs(2), &context(), &mut rng);

        let json = serde_json::to_value(&spots[0]).unwrap();
        assert_eq!(json["type"], "general");
        assert_eq!(json["song_context"]["upcoming_songs"][0]["status"], "coming_up");
        assert_eq!(json["context"]["mood"], "energetic");
    }
}
