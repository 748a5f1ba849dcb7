#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_day_config_from_selector_output() {
        let file = write_temp(
            r#"{
                "timestamp": "2025-09-13T07:58:12.345678",
                "day_name": "Saturday",
                "genre": "Indie Folk",
                "mood": "morning",
                "energy_level": 3,
                "playlist_start_time": "2025-09-13T08:00:00",
                "total_songs": 120,
                "weather": "sunny and 68°F",
                "preferences": {
                    "avoid_explicit": true,
                    "prefer_instrumental": false,
                    "max_song_length_minutes": 7
                }
            }"#,
        );

        let config = DaySelectionConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.genre, "Indie Folk");
        assert_eq!(config.mood, Mood::Morning);
        assert_eq!(config.energy_level, 3);
        assert_eq!(config.total_songs, 120);
        assert_eq!(
            config.playlist_start_time,
            NaiveDate::from_ymd_opt(2025, 9, 13)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        );
        assert_eq!(config.day_name(), "Saturday");
        assert_eq!(config.weather.as_deref(), Some("sunny and 68°F"));
        assert_eq!(config.special_occasion, None);
    }

    #[test]
    fn test_day_config_defaults() {
        let file = write_temp(r#"{"playlist_start_time": "2025-09-15T09:30:00"}"#);

        let config = DaySelectionConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.genre, "mixed");
        assert_eq!(config.mood, Mood::Energetic);
        assert_eq!(config.energy_level, 5);
        assert_eq!(config.total_songs, 100);
        assert_eq!(config.preferences, Preferences::default());
        assert!(config.preferences.avoid_explicit);
        assert!(!config.preferences.prefer_instrumental);
        assert_eq!(config.day_name(), "Monday");
    }

    #[test]
    fn test_missing_preference_flags_use_defaults() {
        let file = write_temp(
            r#"{"playlist_start_time": "2025-09-15T09:30:00", "preferences": {"prefer_instrumental": true}}"#,
        );

        let config = DaySelectionConfig::load_from_file(file.path()).unwrap();

        assert!(config.preferences.avoid_explicit);
        assert!(config.preferences.prefer_instrumental);
    }

    #[test]
    fn test_day_config_requires_start_time() {
        let file = write_temp(r#"{"genre": "Rock"}"#);
        assert!(DaySelectionConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_schedule_loading() {
        let file = write_temp(
            r#"{
                "schedules": [
                    {"time": "615", "content": ["weather", "events"]},
                    {"time": "12:00", "content": ["jokes"]},
                    {"time": "1830"}
                ]
            }"#,
        );

        let schedule = DjSchedule::load_from_file(file.path()).unwrap();

        assert_eq!(schedule.schedules.len(), 3);
        assert_eq!(schedule.schedules[0].time, "615");
        assert_eq!(schedule.schedules[0].content, vec!["weather", "events"]);
        assert!(schedule.schedules[2].content.is_empty());
    }

    #[test]
    fn test_missing_schedule_file_is_empty_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let schedule = DjSchedule::load_from_file(dir.path().join("nope.json")).unwrap();
        assert!(schedule.schedules.is_empty());
    }

    #[test]
    fn test_mistyped_schedule_entry_is_skipped() {
        let file = write_temp(
            r#"{
                "schedules": [
                    {"time": 615, "content": ["jokes"]},
                    {"time": "8:10", "content": ["weather"]},
                    {"time": "12:00", "content": "jokes"}
                ]
            }"#,
        );

        let schedule = DjSchedule::load_from_file(file.path()).unwrap();

        assert_eq!(
            schedule.schedules,
            vec![ScheduleEntry {
                time: "8:10".to_string(),
                content: vec!["weather".to_string()],
            }]
        );
    }

    #[test]
    fn test_malformed_schedule_is_an_error() {
        let file = write_temp(r#"{"schedules": [{"time": 615}"#);
        assert!(DjSchedule::load_from_file(file.path()).is_err());
    }
}
