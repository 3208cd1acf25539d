//! The `schedule` command: render buffered track/artwork pairs into video
//! files with staggered publish slots, list the schedule, or undo the most
//! recent entry.

use crate::catalog::{Catalog, ItemState, Video};
use crate::cli::ScheduleAction;
use crate::commands::desc::describe_video;
use crate::compose::VideoPlan;
use crate::config::AppConfig;
use crate::console::{self, Spinner};
use crate::schedule::{latest_scheduled_time, parse_upload_time, slot_for, Batch, ScheduleError};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;

pub async fn run(
    catalog: &mut Catalog,
    config: &AppConfig,
    action: Option<ScheduleAction>,
) -> Result<()> {
    match action {
        None => render_all(catalog, config, Utc::now()).await,
        Some(ScheduleAction::Undo) => undo(catalog),
        Some(ScheduleAction::List { short }) => list(catalog, short, Utc::now()),
    }
}

/// Delete the most recently scheduled video, returning its track and artwork
/// to the buffer. Published videos cannot be undone.
fn undo(catalog: &mut Catalog) -> Result<()> {
    match catalog.schedule.pop() {
        None => Err(ScheduleError::EmptySchedule.into()),
        Some(video) if video.state == ItemState::Published => {
            catalog.schedule.push(video);
            Err(ScheduleError::PublishedVideo.into())
        }
        Some(video) => {
            if let Some(track) = catalog.track_mut(&video.audio) {
                track.state = ItemState::Buffered;
            }
            if let Some(artwork) = catalog.artwork_mut(&video.image) {
                artwork.state = ItemState::Buffered;
            }
            let _ = fs::remove_file(&video.path);
            console::log("undo:", &video.title);
            Ok(())
        }
    }
}

fn list(catalog: &mut Catalog, short: bool, now: DateTime<Utc>) -> Result<()> {
    if catalog.schedule.is_empty() {
        return Err(ScheduleError::EmptySchedule.into());
    }
    if short {
        print_schedule(&catalog.schedule, now, 0);
        return Ok(());
    }
    // Short lines for the older videos, a full description for the newest.
    print_schedule(&catalog.schedule, now, 1);
    if let Some(last) = catalog.schedule.last() {
        println!();
        describe_video(last);
    }
    Ok(())
}

fn print_schedule(schedule: &[Video], now: DateTime<Utc>, skip_newest: usize) {
    for (i, video) in pending_videos(schedule, now, skip_newest).iter().enumerate() {
        println!("{}. {video}", i + 1);
    }
}

/// Pending videos in chronological order, without the `skip_newest` most
/// recent entries. Keeps everything still scheduled, plus videos already
/// uploaded whose publish time has not arrived yet.
fn pending_videos(schedule: &[Video], now: DateTime<Utc>, skip_newest: usize) -> Vec<&Video> {
    let end = schedule.len().saturating_sub(skip_newest);
    let mut pending: Vec<&Video> = schedule[..end]
        .iter()
        .filter(|v| {
            v.state == ItemState::Scheduled || v.publish_at.map_or(false, |t| t >= now)
        })
        .collect();
    pending.sort_by_key(|v| v.publish_at);
    pending
}

/// Render every buffered pair into the schedule directory. Each rendered
/// video gets the next free publish slot after the latest one already
/// scheduled. A render failure aborts the batch; videos already rendered
/// stay scheduled.
async fn render_all(catalog: &mut Catalog, config: &AppConfig, now: DateTime<Utc>) -> Result<()> {
    let batch = Batch::plan(catalog)?;
    let time_of_day = parse_upload_time(&config.upload.time_utc)?;
    let start = latest_scheduled_time(&catalog.schedule, now).unwrap_or(now);
    let count = batch.len();

    for offset in 0..count {
        // Batch indices are newest-first; render oldest pairs first so they
        // get the earliest slots.
        let i = count - 1 - offset;
        let slot_index = (offset + 1) as u32;

        let track = catalog.tracks[batch.tracks[i]].clone();
        let artwork = catalog.artwork[batch.artwork[i]].clone();
        let plan = VideoPlan::new(&track, &artwork, &config.templates, &config.encoder.extension);
        let mut video = plan.build(catalog, Some(&config.data_path))?;
        video.publish_at = Some(slot_for(
            start,
            slot_index,
            config.upload.frequency_days,
            time_of_day,
            now,
        ));

        let spinner = Spinner::start("render:", &video.to_string());
        let result = config
            .encoder
            .render(&video)
            .await
            .with_context(|| format!("Failed to render '{}'", video.title));
        spinner.finish(&video.to_string()).await;
        result?;

        video.state = ItemState::Scheduled;
        catalog.tracks[batch.tracks[i]].state = ItemState::Scheduled;
        catalog.artwork[batch.artwork[i]].state = ItemState::Scheduled;
        catalog.schedule.push(video);
    }
    Ok(())
}
