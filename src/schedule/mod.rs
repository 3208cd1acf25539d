//! Pairing of buffered tracks with buffered artwork, and publish time-slot
//! arithmetic.

use crate::catalog::{Catalog, ItemState, Video};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use thiserror::Error;

/// Bounds the backwards scan when looking for the latest scheduled time.
const LATEST_TIME_WINDOW: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("No new music to schedule.")]
    NoBufferedTrack,

    #[error("No new artwork to schedule.")]
    NoBufferedArtwork,

    #[error("Empty schedule.")]
    EmptySchedule,

    #[error("Cannot unschedule published video.")]
    PublishedVideo,

    #[error("Upload time {0} is not valid (expected hh:mm:ss).")]
    InvalidUploadTime(String),
}

/// A batch of (track, artwork) pairings eligible to become videos.
///
/// Both lists hold positions into the catalog's backing lists, most recently
/// added first. Pairing is purely positional: the i-th most recent track goes
/// with the i-th most recent artwork, bounded by the smaller buffer.
#[derive(Debug)]
pub struct Batch {
    pub tracks: Vec<usize>,
    pub artwork: Vec<usize>,
}

impl Batch {
    /// Plan the maximal batch from the current buffers.
    pub fn plan(catalog: &Catalog) -> Result<Self, ScheduleError> {
        let mut tracks: Vec<usize> = (0..catalog.tracks.len())
            .rev()
            .filter(|&i| catalog.tracks[i].state == ItemState::Buffered)
            .collect();
        if tracks.is_empty() {
            return Err(ScheduleError::NoBufferedTrack);
        }

        let mut artwork: Vec<usize> = (0..catalog.artwork.len())
            .rev()
            .filter(|&i| catalog.artwork[i].state == ItemState::Buffered)
            .collect();
        if artwork.is_empty() {
            return Err(ScheduleError::NoBufferedArtwork);
        }

        let count = tracks.len().min(artwork.len());
        tracks.truncate(count);
        artwork.truncate(count);
        Ok(Self { tracks, artwork })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Latest `publish_at` among the most recent entries of the schedule, bounded
/// to a fixed window as a cost cap. Returns `None` when the schedule is
/// empty; falls back to `now` when no entry in the window carries a time.
pub fn latest_scheduled_time(schedule: &[Video], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if schedule.is_empty() {
        return None;
    }
    let latest = schedule
        .iter()
        .rev()
        .take(LATEST_TIME_WINDOW)
        .filter_map(|v| v.publish_at)
        .max();
    Some(latest.unwrap_or(now))
}

/// Compute the publish slot for the `position`-th video of a batch
/// (1-indexed, chronological order): `start + position * frequency` days,
/// with the time-of-day overwritten by the configured UTC upload time. Slots
/// that are not strictly in the future collapse to `now`.
pub fn slot_for(
    start: DateTime<Utc>,
    position: u32,
    frequency_days: u32,
    time_of_day: NaiveTime,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let day = start + Duration::days(i64::from(position) * i64::from(frequency_days));
    let slot = day.date_naive().and_time(time_of_day).and_utc();
    if slot > now {
        slot
    } else {
        now
    }
}

pub fn parse_upload_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .map_err(|_| ScheduleError::InvalidUploadTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Artwork, Track};
    use chrono::TimeZone;

    fn track(path: &str, state: ItemState) -> Track {
        Track {
            title: String::new(),
            by: String::new(),
            artists: vec![],
            description: String::new(),
            path: path.to_string(),
            state,
        }
    }

    fn artwork(path: &str, state: ItemState) -> Artwork {
        Artwork {
            artist: String::new(),
            path: path.to_string(),
            state,
        }
    }

    fn video(publish_at: Option<DateTime<Utc>>) -> Video {
        Video {
            title: String::new(),
            description: String::new(),
            path: String::new(),
            state: ItemState::Scheduled,
            publish_at,
            upload_id: None,
            audio: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn pairing_is_bounded_by_the_smaller_buffer() {
        let mut catalog = Catalog::default();
        for i in 0..3 {
            catalog.tracks.push(track(&format!("/t{i}"), ItemState::Buffered));
        }
        for i in 0..2 {
            catalog.artwork.push(artwork(&format!("/a{i}"), ItemState::Buffered));
        }

        let batch = Batch::plan(&catalog).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn pairing_prefers_most_recent_items() {
        let mut catalog = Catalog::default();
        catalog.tracks.push(track("/t0", ItemState::Buffered));
        catalog.tracks.push(track("/t1", ItemState::Scheduled));
        catalog.tracks.push(track("/t2", ItemState::Buffered));
        catalog.artwork.push(artwork("/a0", ItemState::Buffered));
        catalog.artwork.push(artwork("/a1", ItemState::Buffered));

        let batch = Batch::plan(&catalog).unwrap();

        // Reverse-chronological order, scheduled items skipped.
        assert_eq!(batch.tracks, vec![2, 0]);
        assert_eq!(batch.artwork, vec![1, 0]);
    }

    #[test]
    fn pairing_fails_without_buffered_tracks() {
        let mut catalog = Catalog::default();
        catalog.tracks.push(track("/t0", ItemState::Published));
        catalog.artwork.push(artwork("/a0", ItemState::Buffered));

        assert!(matches!(
            Batch::plan(&catalog),
            Err(ScheduleError::NoBufferedTrack)
        ));
    }

    #[test]
    fn pairing_fails_without_buffered_artwork() {
        let mut catalog = Catalog::default();
        catalog.tracks.push(track("/t0", ItemState::Buffered));

        assert!(matches!(
            Batch::plan(&catalog),
            Err(ScheduleError::NoBufferedArtwork)
        ));
    }

    #[test]
    fn latest_time_is_none_for_an_empty_schedule() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(latest_scheduled_time(&[], now), None);
    }

    #[test]
    fn latest_time_falls_back_to_now_without_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let schedule = vec![video(None), video(None)];
        assert_eq!(latest_scheduled_time(&schedule, now), Some(now));
    }

    #[test]
    fn latest_time_picks_the_maximum_in_the_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let schedule = vec![video(Some(t2)), video(None), video(Some(t1))];
        assert_eq!(latest_scheduled_time(&schedule, now), Some(t2));
    }

    #[test]
    fn latest_time_ignores_entries_beyond_the_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let far_future = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        let recent = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();

        let mut schedule = vec![video(Some(far_future)); 10];
        schedule.extend(std::iter::repeat_with(|| video(Some(recent))).take(LATEST_TIME_WINDOW));

        assert_eq!(latest_scheduled_time(&schedule, now), Some(recent));
    }

    #[test]
    fn slots_are_staggered_by_frequency_with_fixed_time_of_day() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 18, 30, 0).unwrap();
        let time_of_day = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let slot = slot_for(start, 2, 3, time_of_day, now);
        assert_eq!(slot, Utc.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap());
    }

    #[test]
    fn past_slots_collapse_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 18, 30, 0).unwrap();
        let time_of_day = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let slot = slot_for(start, 1, 1, time_of_day, now);
        assert_eq!(slot, now);
    }

    #[test]
    fn upload_time_parses_or_fails_loudly() {
        assert_eq!(
            parse_upload_time("12:00:00").unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_upload_time("noonish"),
            Err(ScheduleError::InvalidUploadTime("noonish".to_string()))
        );
    }
}
