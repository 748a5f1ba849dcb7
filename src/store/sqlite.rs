use super::MusicStore;
use crate::models::{PlayHistoryEntry, Song, SongId, default_artist, default_title};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

struct Table {
    name: &'static str,
    schema: &'static str,
    indices: &'static [&'static str],
}

const MUSIC_LIBRARY_TABLE: Table = Table {
    name: "music_library",
    schema: "CREATE TABLE IF NOT EXISTS music_library (id INTEGER PRIMARY KEY AUTOINCREMENT, file_path TEXT UNIQUE NOT NULL, title TEXT, artist TEXT, album TEXT, genre TEXT, duration_seconds INTEGER, energy_level INTEGER, explicit BOOLEAN, instrumental BOOLEAN, added_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP)",
    indices: &[],
};

const PLAY_HISTORY_TABLE: Table = Table {
    name: "play_history",
    schema: "CREATE TABLE IF NOT EXISTS play_history (id INTEGER PRIMARY KEY AUTOINCREMENT, song_id INTEGER, played_at TIMESTAMP NOT NULL, playlist_date DATE NOT NULL, FOREIGN KEY (song_id) REFERENCES music_library (id))",
    indices: &[
        "CREATE INDEX IF NOT EXISTS idx_play_history_date ON play_history(playlist_date)",
        "CREATE INDEX IF NOT EXISTS idx_play_history_played ON play_history(played_at)",
    ],
};

const TABLES: &[Table] = &[MUSIC_LIBRARY_TABLE, PLAY_HISTORY_TABLE];

/// Music store backed by a SQLite database file
pub struct SqliteMusicStore {
    conn: Connection,
}

impl SqliteMusicStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open music database {}", path.display()))?;
        Self::initialize(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .context("Failed to enable foreign keys")?;
        for table in TABLES {
            conn.execute(table.schema, [])
                .with_context(|| format!("Failed to create table {}", table.name))?;
            for index in table.indices {
                conn.execute(index, [])?;
            }
        }
        Ok(Self { conn })
    }
}

impl MusicStore for SqliteMusicStore {
    fn songs(&self) -> Result<Vec<Song>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, title, artist, album, genre, duration_seconds, energy_level, explicit, instrumental FROM music_library",
        )?;
        let songs = stmt
            .query_map([], |row| {
                let energy: Option<i64> = row.get(7)?;
                let duration: Option<i64> = row.get(6)?;
                Ok(Song {
                    id: row.get(0)?,
                    file_path: row.get(1)?,
                    title: row
                        .get::<_, Option<String>>(2)?
                        .unwrap_or_else(default_title),
                    artist: row
                        .get::<_, Option<String>>(3)?
                        .unwrap_or_else(default_artist),
                    album: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    genre: row.get(5)?,
                    duration_seconds: duration.and_then(|d| u32::try_from(d).ok()),
                    energy_level: energy.unwrap_or(5).clamp(1, 10) as u8,
                    explicit: row.get::<_, Option<bool>>(8)?.unwrap_or(false),
                    instrumental: row.get::<_, Option<bool>>(9)?.unwrap_or(false),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn played_song_ids_since(&self, since: NaiveDateTime) -> Result<HashSet<SongId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT song_id FROM play_history WHERE played_at > ?1")?;
        let ids = stmt
            .query_map(params![since.format(TIMESTAMP_FORMAT).to_string()], |row| {
                row.get(0)
            })?
            .collect::<Result<HashSet<SongId>, _>>()?;
        Ok(ids)
    }

    fn record_play(&mut self, entry: &PlayHistoryEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO play_history (song_id, played_at, playlist_date) VALUES (?1, ?2, ?3)",
            params![
                entry.song_id,
                entry.played_at.format(TIMESTAMP_FORMAT).to_string(),
                entry.playlist_date.format(DATE_FORMAT).to_string(),
            ],
        )
        .with_context(|| format!("Failed to record play for song {}", entry.song_id))?;
        Ok(())
    }

    fn add_song(&mut self, song: &Song) -> Result<Option<SongId>> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO music_library (file_path, title, artist, album, genre, duration_seconds, energy_level, explicit, instrumental) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                song.file_path,
                song.title,
                song.artist,
                song.album,
                song.genre,
                song.duration_seconds.map(i64::from),
                i64::from(song.energy_level),
                song.explicit,
                song.instrumental,
            ],
        )?;
        if inserted == 0 {
            debug!("Song already cataloged: {}", song.file_path);
            return Ok(None);
        }
        Ok(Some(self.conn.last_insert_rowid()))
    }

    fn play_history(&self) -> Result<Vec<PlayHistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT song_id, played_at, playlist_date FROM play_history ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, SongId>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(song_id, played_at, playlist_date)| {
                Ok(PlayHistoryEntry {
                    song_id,
                    played_at: NaiveDateTime::parse_from_str(&played_at, TIMESTAMP_FORMAT)
                        .with_context(|| format!("Bad played_at timestamp '{played_at}'"))?,
                    playlist_date: NaiveDate::parse_from_str(&playlist_date, DATE_FORMAT)
                        .with_context(|| format!("Bad playlist_date '{playlist_date}'"))?,
                })
            })
            .collect()
    }
}
