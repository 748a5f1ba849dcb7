use super::config::ScheduleEntry;
use super::metadata::SpotPlacement;
use crate::models::Song;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

/// Parse a schedule clock time: `"6:15"`, `"06:15"`, `"615"` or `"1830"`.
///
/// Returns `None` for anything unparsable or outside 00:00..=23:59.
pub fn parse_clock_time(time_str: &str) -> Option<NaiveTime> {
    let time_str = time_str.trim();
    let (hour, minute) = if let Some((hour, minute)) = time_str.split_once(':') {
        (hour.trim().parse::<u32>().ok()?, minute.trim().parse::<u32>().ok()?)
    } else {
        if !time_str.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match time_str.len() {
            3 => (time_str[..1].parse().ok()?, time_str[1..].parse().ok()?),
            4 => (time_str[..2].parse().ok()?, time_str[2..].parse().ok()?),
            _ => return None,
        }
    };

    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Running total of song lengths: `C[i]` is the end of song `i`
pub fn cumulative_durations(songs: &[Song]) -> Vec<u64> {
    songs
        .iter()
        .scan(0u64, |total, song| {
            *total += u64::from(song.duration_or_default());
            Some(*total)
        })
        .collect()
}

/// Find the song boundary closest to `target_seconds`.
///
/// Returns a 1-based "after song N" index. Equidistant boundaries resolve
/// to the earliest one.
pub fn find_insertion_point(cumulative: &[u64], target_seconds: u64) -> Option<usize> {
    let first = *cumulative.first()?;
    let last = *cumulative.last()?;

    if target_seconds <= first {
        return Some(1);
    }
    if target_seconds >= last {
        return Some(cumulative.len());
    }

    let mut best_index = 1;
    let mut best_diff = first.abs_diff(target_seconds);
    for (i, &end) in cumulative.iter().enumerate() {
        let diff = end.abs_diff(target_seconds);
        if diff < best_diff {
            best_diff = diff;
            best_index = i + 1;
        }
    }
    Some(best_index)
}

/// Maps schedule clock times onto a playlist that starts at a fixed moment
pub struct SpotTimeResolver {
    start: NaiveDateTime,
}

impl SpotTimeResolver {
    /// Seconds and below are dropped from the start time
    pub fn new(playlist_start: NaiveDateTime) -> Self {
        let start = playlist_start
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(playlist_start);
        Self { start }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// The next occurrence of `time` at or after the playlist start
    pub fn target_datetime(&self, time: NaiveTime) -> NaiveDateTime {
        let target = self.start.date().and_time(time);
        if target < self.start {
            target + Duration::days(1)
        } else {
            target
        }
    }

    /// Place every parsable schedule entry after the closest song boundary
    pub fn resolve(&self, songs: &[Song], schedule: &[ScheduleEntry]) -> Vec<SpotPlacement> {
        if songs.is_empty() || schedule.is_empty() {
            return Vec::new();
        }

        let cumulative = cumulative_durations(songs);
        let mut placements = Vec::new();

        for (i, entry) in schedule.iter().enumerate() {
            let spot_number = i + 1;
            let Some(time) = parse_clock_time(&entry.time) else {
                debug!("Skipping DJ spot {spot_number}: unparsable time '{}'", entry.time);
                continue;
            };

            let target = self.target_datetime(time);
            let target_seconds = (target - self.start).num_seconds().max(0) as u64;

            let Some(after_song_index) = find_insertion_point(&cumulative, target_seconds) else {
                continue;
            };
            let elapsed_seconds = cumulative[after_song_index - 1];

            placements.push(SpotPlacement {
                spot_number,
                after_song_index,
                elapsed_seconds,
                estimated_at: self.start + Duration::seconds(elapsed_seconds as i64),
                target_time: entry.time.clone(),
                content_tags: entry.content.clone(),
            });
        }

        placements
    }
}
