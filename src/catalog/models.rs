//! Entity types held by the catalog.
//!
//! Every entity carries a stable unique id derived from its own data: the
//! storage path for tracks, artwork and videos, the lowercased name for
//! artists. Ids double as foreign keys (`Video::audio` / `Video::image`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a buffered entity.
///
/// Progression is `Buffered -> Scheduled -> Published`. `Removed` is a
/// terminal tombstone that permits re-adding an entity under the same
/// unique id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    Buffered,
    Scheduled,
    Published,
    Removed,
}

/// A buffered music track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    /// Primary artist display name, used for the video title.
    pub by: String,
    /// Ordered artist identifiers credited in the video description.
    pub artists: Vec<String>,
    pub description: String,
    pub path: String,
    pub state: ItemState,
}

impl Track {
    pub fn unique_id(&self) -> &str {
        &self.path
    }
}

/// A buffered artwork image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub artist: String,
    pub path: String,
    pub state: ItemState,
}

impl Artwork {
    pub fn unique_id(&self) -> &str {
        &self.path
    }
}

/// A rendered (or about to be rendered) video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub description: String,
    pub path: String,
    pub state: ItemState,
    /// Absence means "publish immediately".
    pub publish_at: Option<DateTime<Utc>>,
    /// Absence means "not yet uploaded".
    pub upload_id: Option<String>,
    /// Unique id of the track providing the audio.
    pub audio: String,
    /// Unique id of the artwork providing the image.
    pub image: String,
}

impl Video {
    pub fn unique_id(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.publish_at, &self.upload_id) {
            (None, _) => write!(f, "{}", self.title),
            (Some(at), None) => {
                write!(f, "{} @({})", self.title, at.format("%Y-%m-%d %H:%M"))
            }
            (Some(at), Some(id)) => write!(
                f,
                "{} @({}) (video id: {})",
                self.title,
                at.format("%Y-%m-%d %H:%M"),
                id
            ),
        }
    }
}

/// A credited artist with an ordered list of links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Case-insensitively unique.
    pub name: String,
    pub links: Vec<String>,
}

impl Artist {
    pub fn unique_id(&self) -> String {
        self.name.to_lowercase()
    }

    /// Append links, preserving insertion order and suppressing duplicates.
    pub fn add_links(&mut self, links: &[String]) {
        for link in links {
            if !self.links.contains(link) {
                self.links.push(link.clone());
            }
        }
    }
}
