use anyhow::{Context, Result};
use std::path::PathBuf;

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub playlist_root: PathBuf,
    pub exclude_recent_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("music_history.db"),
            playlist_root: PathBuf::from("playlists"),
            exclude_recent_days: 1,
        }
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from_lookup(|key| std::env::var(key).ok())
}

fn config_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let db_path = lookup("PERSONALDJ_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.db_path);
    let playlist_root = lookup("PERSONALDJ_PLAYLIST_ROOT")
        .map(PathBuf::from)
        .unwrap_or(defaults.playlist_root);
    let exclude_recent_days = match lookup("PERSONALDJ_EXCLUDE_RECENT_DAYS") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("PERSONALDJ_EXCLUDE_RECENT_DAYS is not a day count: '{raw}'"))?,
        None => defaults.exclude_recent_days,
    };

    Ok(Config {
        db_path,
        playlist_root,
        exclude_recent_days,
    })
}
