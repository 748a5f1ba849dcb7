use super::content::ContentAssigner;
use super::curator::{CurationRequest, MusicCurator};
use super::genres::{available_genres, resolve_genre};
use super::metadata::{DailyPlaylist, PlaylistInfo, SpotContext, SpotPlan};
use super::timeline::SpotTimeResolver;
use super::{DaySelectionConfig, DjSchedule};
use crate::store::MusicStore;
use anyhow::Result;
use chrono::NaiveDateTime;
use rand::Rng;
use tracing::info;

/// Knobs for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub exclude_recent_days: u32,
    pub rotate_daily_content: bool,
    pub record_history: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            exclude_recent_days: 1,
            rotate_daily_content: false,
            record_history: true,
        }
    }
}

/// Main playlist generator
pub struct PlaylistGenerator {
    settings: GeneratorSettings,
}

impl PlaylistGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Curate the day's songs and plan DJ spots between them
    pub fn generate_playlist<R: Rng + ?Sized>(
        &self,
        store: &mut dyn MusicStore,
        day: &DaySelectionConfig,
        schedule: &DjSchedule,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<DailyPlaylist> {
        let playlist_date = day.playlist_start_time.date();

        let genre = resolve_genre(&day.genre, &available_genres(&store.songs()?));
        let request = CurationRequest {
            genre,
            energy_level: day.energy_level,
            total_songs: day.total_songs,
            preferences: day.preferences.clone(),
            exclude_recent_days: self.settings.exclude_recent_days,
        };

        let curator = if self.settings.record_history {
            MusicCurator::new()
        } else {
            MusicCurator::without_history()
        };
        let curated = curator.curate(store, &request, now, playlist_date, rng)?;

        let resolver = SpotTimeResolver::new(day.playlist_start_time);
        let placements = resolver.resolve(&curated.songs, &schedule.schedules);

        // Fresh assigner per playlist so rotation state never leaks across days
        let mut assigner = if self.settings.rotate_daily_content {
            ContentAssigner::with_daily_rotation()
        } else {
            ContentAssigner::new()
        };
        let spots = assigner.assign(&placements, &curated.songs, &SpotContext::from_day(day), rng);

        info!(
            "Planned {} of {} scheduled DJ spots",
            spots.len(),
            schedule.schedules.len()
        );

        let spot_plan = SpotPlan {
            total_spots: spots.len(),
            spots,
            playlist_info: PlaylistInfo {
                total_songs: curated.songs.len(),
                total_duration_seconds: curated.total_duration_seconds,
            },
        };

        Ok(DailyPlaylist {
            date: playlist_date,
            config: day.clone(),
            curated,
            spot_plan,
        })
    }
}
