//! The catalog: four ordered entity lists plus a lazily rebuilt lookup index.

use super::models::{Artist, Artwork, ItemState, Track, Video};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Cannot update {0} as it is already scheduled or published.")]
    ImmutableResource(&'static str),
}

/// Position of an entity inside one of the four backing lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Track(usize),
    Artwork(usize),
    Video(usize),
    Artist(usize),
}

/// Owner of all entity lists. The index is a derived cache mapping unique id
/// to a slot; it is excluded from serialization and rebuilt on demand.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub artwork: Vec<Artwork>,
    pub schedule: Vec<Video>,
    pub artists: Vec<Artist>,
    #[serde(skip)]
    index: HashMap<String, Slot>,
}

impl Catalog {
    /// Look up an entity slot by unique id.
    ///
    /// Staleness is detected by comparing the aggregate size of the four
    /// lists against the index size; on mismatch the index is cleared and
    /// repopulated. Truncating a backing list therefore self-heals on the
    /// next lookup.
    pub fn find(&mut self, id: &str) -> Option<Slot> {
        let sum =
            self.tracks.len() + self.artwork.len() + self.schedule.len() + self.artists.len();
        if sum != self.index.len() {
            self.rebuild_index();
        }
        self.index.get(id).copied()
    }

    pub fn contains(&mut self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        match self.find(id) {
            Some(Slot::Track(i)) => self.tracks.get_mut(i),
            _ => None,
        }
    }

    pub fn artwork_mut(&mut self, id: &str) -> Option<&mut Artwork> {
        match self.find(id) {
            Some(Slot::Artwork(i)) => self.artwork.get_mut(i),
            _ => None,
        }
    }

    pub fn artist(&mut self, id: &str) -> Option<&Artist> {
        match self.find(id) {
            Some(Slot::Artist(i)) => self.artists.get(i),
            _ => None,
        }
    }

    pub fn artist_mut(&mut self, id: &str) -> Option<&mut Artist> {
        match self.find(id) {
            Some(Slot::Artist(i)) => self.artists.get_mut(i),
            _ => None,
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, track) in self.tracks.iter().enumerate() {
            self.index.insert(track.unique_id().to_string(), Slot::Track(i));
        }
        for (i, artwork) in self.artwork.iter().enumerate() {
            self.index
                .insert(artwork.unique_id().to_string(), Slot::Artwork(i));
        }
        for (i, video) in self.schedule.iter().enumerate() {
            self.index.insert(video.unique_id().to_string(), Slot::Video(i));
        }
        for (i, artist) in self.artists.iter().enumerate() {
            self.index.insert(artist.unique_id(), Slot::Artist(i));
        }
    }

    /// Make sure every named artist exists, auto-creating placeholders with
    /// no links. Matching is case-insensitive.
    pub fn ensure_artists<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if self.contains(&name.to_lowercase()) {
                continue;
            }
            self.artists.push(Artist {
                name: name.to_string(),
                links: Vec::new(),
            });
        }
    }

    /// Add a track to the catalog. An existing track with the same unique id
    /// is replaced in place, unless it has already advanced to a different
    /// state (and is not Removed), in which case the insert fails.
    pub fn add_track(&mut self, track: Track) -> Result<(), CatalogError> {
        self.ensure_artists(track.artists.iter().map(String::as_str));
        if let Some(i) = self
            .tracks
            .iter()
            .position(|t| t.unique_id() == track.unique_id())
        {
            let current = &self.tracks[i];
            if current.state != track.state && current.state != ItemState::Removed {
                return Err(CatalogError::ImmutableResource("music"));
            }
            self.tracks[i] = track;
            return Ok(());
        }
        self.tracks.push(track);
        Ok(())
    }

    /// Add artwork to the catalog, with the same replacement rules as
    /// [`Catalog::add_track`].
    pub fn add_artwork(&mut self, artwork: Artwork) -> Result<(), CatalogError> {
        self.ensure_artists([artwork.artist.as_str()]);
        if let Some(i) = self
            .artwork
            .iter()
            .position(|a| a.unique_id() == artwork.unique_id())
        {
            let current = &self.artwork[i];
            if current.state != artwork.state && current.state != ItemState::Removed {
                return Err(CatalogError::ImmutableResource("art"));
            }
            self.artwork[i] = artwork;
            return Ok(());
        }
        self.artwork.push(artwork);
        Ok(())
    }

    /// Append links to an artist matching the name, creating the artist if
    /// absent. Duplicate links are suppressed.
    pub fn update_artist_links(&mut self, name: &str, links: &[String]) {
        if let Some(artist) = self.artist_mut(&name.to_lowercase()) {
            artist.add_links(links);
            return;
        }
        let mut artist = Artist {
            name: name.to_string(),
            links: Vec::new(),
        };
        artist.add_links(links);
        self.artists.push(artist);
    }

    pub fn video_status(&self) -> String {
        let scheduled = self
            .schedule
            .iter()
            .filter(|v| v.state == ItemState::Scheduled)
            .count();
        let published = self
            .schedule
            .iter()
            .filter(|v| v.state == ItemState::Published)
            .count();
        format!("scheduled: {scheduled}, published: {published}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(path: &str, state: ItemState) -> Track {
        Track {
            title: "Title".to_string(),
            by: "Artist".to_string(),
            artists: vec!["Artist".to_string()],
            description: String::new(),
            path: path.to_string(),
            state,
        }
    }

    fn artwork(path: &str, artist: &str, state: ItemState) -> Artwork {
        Artwork {
            artist: artist.to_string(),
            path: path.to_string(),
            state,
        }
    }

    #[test]
    fn adding_a_track_indexes_it_and_its_artists() {
        let mut catalog = Catalog::default();
        catalog.add_track(track("/track", ItemState::Buffered)).unwrap();

        assert_eq!(catalog.find("/track"), Some(Slot::Track(0)));
        assert_eq!(catalog.find("artist"), Some(Slot::Artist(0)));
    }

    #[test]
    fn adding_artwork_indexes_it_and_its_artist() {
        let mut catalog = Catalog::default();
        catalog
            .add_artwork(artwork("/art", "painter", ItemState::Buffered))
            .unwrap();

        assert_eq!(catalog.find("/art"), Some(Slot::Artwork(0)));
        assert!(catalog.contains("painter"));
    }

    #[test]
    fn inserting_over_a_scheduled_entity_fails_without_mutation() {
        let mut catalog = Catalog::default();
        catalog.add_track(track("/track", ItemState::Buffered)).unwrap();
        catalog.tracks[0].state = ItemState::Scheduled;
        catalog.tracks[0].title = "Original".to_string();

        let result = catalog.add_track(track("/track", ItemState::Buffered));

        assert_eq!(result, Err(CatalogError::ImmutableResource("music")));
        assert_eq!(catalog.tracks.len(), 1);
        assert_eq!(catalog.tracks[0].title, "Original");
        assert_eq!(catalog.tracks[0].state, ItemState::Scheduled);
    }

    #[test]
    fn inserting_over_a_removed_entity_replaces_in_place() {
        let mut catalog = Catalog::default();
        catalog.add_track(track("/a", ItemState::Buffered)).unwrap();
        catalog.add_track(track("/b", ItemState::Buffered)).unwrap();
        catalog.tracks[0].state = ItemState::Removed;

        catalog.add_track(track("/a", ItemState::Buffered)).unwrap();

        assert_eq!(catalog.tracks.len(), 2);
        assert_eq!(catalog.tracks[0].path, "/a");
        assert_eq!(catalog.tracks[0].state, ItemState::Buffered);
        assert_eq!(catalog.tracks[1].path, "/b");
    }

    #[test]
    fn index_self_heals_after_truncation() {
        let mut catalog = Catalog::default();
        catalog
            .add_artwork(artwork("/art1", "a", ItemState::Buffered))
            .unwrap();
        catalog
            .add_artwork(artwork("/art2", "a", ItemState::Buffered))
            .unwrap();
        catalog.add_track(track("/track", ItemState::Buffered)).unwrap();
        assert!(catalog.contains("/art2"));

        // Simulates undo: truncate a backing list directly.
        catalog.artwork.pop();

        assert_eq!(catalog.find("/art2"), None);
        assert_eq!(catalog.find("/art1"), Some(Slot::Artwork(0)));
        assert_eq!(catalog.find("/track"), Some(Slot::Track(0)));
    }

    #[test]
    fn artist_matching_is_case_insensitive() {
        let mut catalog = Catalog::default();
        catalog.ensure_artists(["snatti89"]);
        catalog
            .add_artwork(artwork("/art", "Snatti89", ItemState::Buffered))
            .unwrap();

        assert_eq!(catalog.artists.len(), 1);
        assert_eq!(catalog.artists[0].name, "snatti89");
    }

    #[test]
    fn ensure_artists_checks_every_name() {
        let mut catalog = Catalog::default();
        catalog.ensure_artists(["a"]);
        catalog.ensure_artists(["a", "b", "c"]);

        let names: Vec<&str> = catalog.artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn update_artist_links_creates_missing_artist() {
        let mut catalog = Catalog::default();
        catalog.update_artist_links("Someone", &["a.com".to_string()]);
        catalog.update_artist_links("someone", &["a.com".to_string(), "b.com".to_string()]);

        assert_eq!(catalog.artists.len(), 1);
        assert_eq!(catalog.artists[0].links, vec!["a.com", "b.com"]);
    }

    #[test]
    fn video_status_counts_states() {
        let mut catalog = Catalog::default();
        for (i, state) in [
            ItemState::Scheduled,
            ItemState::Scheduled,
            ItemState::Published,
        ]
        .into_iter()
        .enumerate()
        {
            catalog.schedule.push(Video {
                title: format!("v{i}"),
                description: String::new(),
                path: format!("/v{i}"),
                state,
                publish_at: None,
                upload_id: None,
                audio: String::new(),
                image: String::new(),
            });
        }
        assert_eq!(catalog.video_status(), "scheduled: 2, published: 1");
    }
}
