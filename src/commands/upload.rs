//! The `upload` command: push every scheduled video to YouTube, earliest
//! publish slot first.

use crate::catalog::{Catalog, ItemState};
use crate::config::AppConfig;
use crate::console::Spinner;
use crate::schedule::ScheduleError;
use crate::youtube::{oauth::Authenticator, YouTubeClient};
use anyhow::{Context, Result};

pub async fn run(catalog: &mut Catalog, config: &AppConfig) -> Result<()> {
    let mut pending: Vec<usize> = (0..catalog.schedule.len())
        .filter(|&i| catalog.schedule[i].state == ItemState::Scheduled)
        .collect();
    if pending.is_empty() {
        return Err(ScheduleError::EmptySchedule.into());
    }
    // None sorts first, so immediate publishes go out before slotted ones.
    pending.sort_by_key(|&i| catalog.schedule[i].publish_at);

    let auth = Authenticator::new(&config.client_secret, &config.root_path)?;
    let client = YouTubeClient::new(auth, config.upload.metadata.clone());

    for i in pending {
        let video = catalog.schedule[i].clone();
        let spinner = Spinner::start("upload:", &video.to_string());
        match client.upload(&video).await {
            Ok(id) => {
                let entry = &mut catalog.schedule[i];
                entry.upload_id = Some(id);
                entry.state = ItemState::Published;
                let audio = entry.audio.clone();
                let image = entry.image.clone();
                let done = entry.to_string();
                if let Some(track) = catalog.track_mut(&audio) {
                    track.state = ItemState::Published;
                }
                if let Some(artwork) = catalog.artwork_mut(&image) {
                    artwork.state = ItemState::Published;
                }
                spinner.finish(&done).await;
            }
            Err(e) => {
                spinner.finish(&video.title).await;
                return Err(e).with_context(|| format!("Failed to upload '{}'", video.path));
            }
        }
    }
    Ok(())
}
