use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod playlist;
mod store;


use crate::config::load_config;
use crate::models::Song;
use crate::playlist::genres::{genre_counts, valid_genre_names};
use crate::playlist::{
    DailyPlaylist, DaySelectionConfig, DjSchedule, GeneratorSettings, PlaylistGenerator,
};
use crate::store::{MusicStore, SqliteMusicStore};

#[derive(Parser)]
#[command(name = "personal-dj")]
#[command(about = "Daily personal radio playlist generator with scheduled DJ spots")]
#[command(version)]
struct Args {
    /// Date the playlist starts (YYYY-MM-DD), defaults to today
    #[arg(long = "start-date")]
    start_date: Option<NaiveDate>,

    /// Time the playlist starts (HH:MM), defaults to 08:00 when only a date is given
    #[arg(long = "start-time")]
    start_time: Option<String>,

    /// Day configuration JSON to use instead of the built-in day profile
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// DJ schedule configuration JSON
    #[arg(short = 's', long = "schedule", default_value = "dj_schedule_config.json")]
    schedule_file: PathBuf,

    /// Seed for song and content selection, for reproducible playlists
    #[arg(long)]
    seed: Option<u64>,

    /// Never repeat rotating content (facts, trivia, jokes...) within the day
    #[arg(long = "rotate-content")]
    rotate_content: bool,

    /// Add songs from a JSON catalog file to the library and exit
    #[arg(long = "import-catalog")]
    import_catalog: Option<PathBuf>,

    /// List the genres in the library and exit
    #[arg(long = "list-genres")]
    list_genres: bool,

    /// Plan the playlist without recording play history or writing files
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Quiet mode - only warnings and errors are logged
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn init_tracing(debug: bool, quiet: bool) {
    let default_filter = if debug {
        "personal_dj=debug"
    } else if quiet {
        "personal_dj=warn"
    } else {
        "personal_dj=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug, args.quiet);

    let config = load_config()?;
    let mut store = SqliteMusicStore::open(&config.db_path)?;

    if let Some(catalog) = &args.import_catalog {
        return import_catalog(&mut store, catalog);
    }
    if args.list_genres {
        return list_genres(&store);
    }

    let now = Local::now().naive_local();
    let start = playlist_start(args.start_date, args.start_time.as_deref(), now)?;

    let mut day = match &args.config_file {
        Some(path) => DaySelectionConfig::load_from_file(path)?,
        None => DaySelectionConfig::for_start(start),
    };
    if args.config_file.is_some() && (args.start_date.is_some() || args.start_time.is_some()) {
        day.playlist_start_time = start;
    }
    info!(
        "Today's selection: genre '{}', mood {}, energy {}",
        day.genre,
        day.mood.as_str(),
        day.energy_level
    );

    let schedule = DjSchedule::load_from_file(&args.schedule_file)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generator = PlaylistGenerator::new(GeneratorSettings {
        exclude_recent_days: config.exclude_recent_days,
        rotate_daily_content: args.rotate_content,
        record_history: !args.dry_run,
    });
    let daily = generator.generate_playlist(&mut store, &day, &schedule, now, &mut rng)?;

    print_summary(&daily);

    if args.dry_run {
        println!("\nDry run: play history untouched, no files written.");
        return Ok(());
    }

    let playlist_dir = config
        .playlist_root
        .join(daily.date.format("%Y-%m-%d").to_string());
    std::fs::create_dir_all(&playlist_dir)
        .with_context(|| format!("Failed to create {}", playlist_dir.display()))?;
    write_json(&playlist_dir.join("playlist_config.json"), &daily.config)?;
    write_json(&playlist_dir.join("curated_playlist.json"), &daily.curated)?;
    write_json(&playlist_dir.join("dj_spot_plan.json"), &daily.spot_plan)?;

    println!("\nSaved playlist files to: {}", playlist_dir.display());
    Ok(())
}

/// Start of the playlist: now, or the given date/time with 08:00 as the default time
fn playlist_start(
    date: Option<NaiveDate>,
    time: Option<&str>,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    if date.is_none() && time.is_none() {
        return Ok(now);
    }
    let date = date.unwrap_or(now.date());
    let time = match time {
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .with_context(|| format!("Start time '{raw}' is not HH:MM"))?,
        None => NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
    };
    Ok(date.and_time(time))
}

fn import_catalog(store: &mut dyn MusicStore, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let songs: Vec<Song> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    let mut added = 0;
    for song in &songs {
        if store.add_song(song)?.is_some() {
            added += 1;
        }
    }
    println!(
        "Imported {added} new songs ({} already cataloged)",
        songs.len() - added
    );
    Ok(())
}

fn list_genres(store: &dyn MusicStore) -> Result<()> {
    let songs = store.songs()?;
    let total = songs.len();

    println!("\nAvailable genres in database ({total} total songs):");
    println!("{}", "-".repeat(40));
    for genre in genre_counts(&songs) {
        let percentage = genre.count as f64 / total.max(1) as f64 * 100.0;
        println!("{:25} {:3} songs ({:5.1}%)", genre.name, genre.count, percentage);
    }
    println!("{}", "-".repeat(40));
    println!("\nNote: 'Unknown' songs can be selected using genre='Other'");
    println!("\nValid genre names for configuration:");
    println!("{}", valid_genre_names(&songs).join(", "));
    Ok(())
}

fn print_summary(daily: &DailyPlaylist) {
    let curated = &daily.curated;
    println!("\n=== {} ===", daily.config.day_name());
    println!("Curated {} songs", curated.songs.len());
    if curated.is_short() {
        println!(
            "⚠️ Only {} of {} requested songs were available",
            curated.songs.len(),
            curated.requested_songs
        );
    }
    println!(
        "Total duration: {:.1} hours",
        curated.total_duration_seconds as f64 / 3600.0
    );

    if !curated.songs.is_empty() {
        println!("\nFirst 10 songs in playlist:");
        for (i, song) in curated.songs.iter().take(10).enumerate() {
            println!("  {}. {} - {}", i + 1, song.artist, song.title);
        }
        if curated.songs.len() > 10 {
            println!("  ... and {} more songs", curated.songs.len() - 10);
        }
    }

    println!("\nPlanned {} DJ spots", daily.spot_plan.total_spots);
    for spot in &daily.spot_plan.spots {
        println!(
            "  Spot {}: {} (target: {}, actual: ~{}) - Content: [{}]",
            spot.spot_number,
            spot.content_type,
            spot.target_time,
            spot.approximate_time,
            spot.content_tags.join(", ")
        );
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 13)
            .unwrap()
            .and_hms_opt(14, 37, 12)
            .unwrap()
    }

    #[test]
    fn start_defaults_to_now() {
        assert_eq!(playlist_start(None, None, now()).unwrap(), now());
    }

    #[test]
    fn date_without_time_starts_at_eight() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
        let start = playlist_start(Some(date), None, now()).unwrap();
        assert_eq!(start, date.and_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn time_without_date_uses_today() {
        let start = playlist_start(None, Some("06:30"), now()).unwrap();
        assert_eq!(start, now().date().and_hms_opt(6, 30, 0).unwrap());
        assert!(playlist_start(None, Some("6.30pm"), now()).is_err());
    }

    #[test]
    fn cli_parses_flags() {
        let args = Args::parse_from([
            "personal-dj",
            "--start-date",
            "2025-09-13",
            "--seed",
            "42",
            "--rotate-content",
            "--dry-run",
        ]);
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2025, 9, 13));
        assert_eq!(args.seed, Some(42));
        assert!(args.rotate_content);
        assert!(args.dry_run);
        assert_eq!(args.schedule_file, PathBuf::from("dj_schedule_config.json"));
    }
}
