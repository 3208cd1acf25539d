//! Video composition: derives a video's title, description and output path
//! from a (track, artwork) pair and the configured text templates.

pub mod template;

pub use template::{substitute, TemplateError};

use crate::catalog::{Artwork, Catalog, ItemState, Track, Video};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text templates applied when composing a video.
#[derive(Clone, Debug)]
pub struct VideoFormat {
    pub title: String,
    pub header: String,
    pub track_credits: String,
    pub artwork_credits: String,
    pub link: String,
    pub footer: String,
}

impl Default for VideoFormat {
    fn default() -> Self {
        Self {
            title: "%(by) - %(title)".to_string(),
            header: "%(by) - %(title)".to_string(),
            track_credits: "%(artist)".to_string(),
            artwork_credits: "Artwork by %(artist)".to_string(),
            link: "- %(link)".to_string(),
            footer: String::new(),
        }
    }
}

/// Composes a [`Video`] from a track and an artwork.
///
/// Building with a destination creates `<dest>/schedule/` and produces the
/// full output path; building without one produces just the file name, which
/// is used for previews that must not touch the filesystem.
pub struct VideoPlan {
    track: Track,
    artwork: Artwork,
    format: VideoFormat,
    extension: String,
}

impl VideoPlan {
    pub fn new(track: &Track, artwork: &Artwork, format: &VideoFormat, extension: &str) -> Self {
        Self {
            track: track.clone(),
            artwork: artwork.clone(),
            format: format.clone(),
            extension: extension.to_string(),
        }
    }

    pub fn title(&self) -> Result<String, TemplateError> {
        substitute(
            &self.format.title,
            &[("by", &self.track.by), ("title", &self.track.title)],
        )
    }

    /// Build the full description in its fixed section order: header, track
    /// description, per-artist track credits with links, artwork credits with
    /// links, footer.
    pub fn description(&self, catalog: &mut Catalog) -> Result<String, TemplateError> {
        let mut out = String::new();

        if !self.format.header.is_empty() {
            let header = substitute(
                &self.format.header,
                &[("by", &self.track.by), ("title", &self.track.title)],
            )?;
            out.push_str(&header);
            out.push_str("\n\n");
        }

        if !self.track.description.is_empty() {
            out.push_str(&self.track.description);
            out.push_str("\n\n");
        }

        for name in &self.track.artists {
            let credits = substitute(&self.format.track_credits, &[("artist", name)])?;
            out.push_str(&credits);
            out.push('\n');
            self.push_links(catalog, name, &mut out)?;
            out.push('\n');
        }

        let credits = substitute(
            &self.format.artwork_credits,
            &[("artist", &self.artwork.artist)],
        )?;
        out.push_str(&credits);
        out.push('\n');
        self.push_links(catalog, &self.artwork.artist, &mut out)?;

        if !self.format.footer.is_empty() {
            out.push('\n');
            out.push_str(&self.format.footer);
        }
        Ok(out)
    }

    fn push_links(
        &self,
        catalog: &mut Catalog,
        name: &str,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        // Insertion guarantees every referenced artist exists; a miss here is
        // a programming error, not a user error.
        let links = match catalog.artist(&name.to_lowercase()) {
            Some(artist) => artist.links.clone(),
            None => panic!("artist {name} not in catalog"),
        };
        for link in &links {
            let line = substitute(&self.format.link, &[("link", link)])?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(())
    }

    pub fn build(
        &self,
        catalog: &mut Catalog,
        dest: Option<&Path>,
    ) -> Result<Video, ComposeError> {
        let title = self.title()?;
        let description = self.description(catalog)?;

        let file_name = format!("{title}{}", self.extension);
        let path = match dest {
            Some(root) => {
                let dir = root.join("schedule");
                fs::create_dir_all(&dir)?;
                dir.join(file_name)
            }
            None => PathBuf::from(file_name),
        };

        Ok(Video {
            title,
            description,
            path: path.to_string_lossy().into_owned(),
            state: ItemState::Buffered,
            publish_at: None,
            upload_id: None,
            audio: self.track.unique_id().to_string(),
            image: self.artwork.unique_id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Artist;

    fn catalog_with_artists(artists: &[(&str, &[&str])]) -> Catalog {
        let mut catalog = Catalog::default();
        for (name, links) in artists {
            catalog.artists.push(Artist {
                name: name.to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            });
        }
        catalog
    }

    fn track(title: &str, by: &str, artists: &[&str], description: &str) -> Track {
        Track {
            title: title.to_string(),
            by: by.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            description: description.to_string(),
            path: "/track".to_string(),
            state: ItemState::Buffered,
        }
    }

    fn artwork(artist: &str) -> Artwork {
        Artwork {
            artist: artist.to_string(),
            path: "/art".to_string(),
            state: ItemState::Buffered,
        }
    }

    #[test]
    fn title_uses_the_title_template() {
        let plan = VideoPlan::new(
            &track("Name", "TrackArtist", &["TrackArtist"], ""),
            &artwork("ArtworkArtist"),
            &VideoFormat::default(),
            ".mp4",
        );
        assert_eq!(plan.title().unwrap(), "TrackArtist - Name");
    }

    #[test]
    fn description_sections_are_in_order() {
        let mut catalog = catalog_with_artists(&[
            ("TrackArtist", &["track.com/artist"]),
            ("ArtworkArtist", &["artwork.com/artist"]),
        ]);
        let plan = VideoPlan::new(
            &track("Name", "TrackArtist", &["TrackArtist"], ""),
            &artwork("ArtworkArtist"),
            &VideoFormat::default(),
            ".mp4",
        );

        let expected = "TrackArtist - Name\n\n\
                        TrackArtist\n\
                        - track.com/artist\n\n\
                        Artwork by ArtworkArtist\n\
                        - artwork.com/artist\n";
        assert_eq!(plan.description(&mut catalog).unwrap(), expected);
    }

    #[test]
    fn description_for_single_artist_with_one_link() {
        let mut catalog =
            catalog_with_artists(&[("A", &["a.com"]), ("B", &[] as &[&str])]);
        let plan = VideoPlan::new(
            &track("Song", "A", &["A"], ""),
            &artwork("B"),
            &VideoFormat::default(),
            ".mp4",
        );

        let expected = "A - Song\n\nA\n- a.com\n\nArtwork by B\n";
        assert_eq!(plan.description(&mut catalog).unwrap(), expected);
    }

    #[test]
    fn track_description_is_inserted_verbatim() {
        let mut catalog = catalog_with_artists(&[("A", &[] as &[&str]), ("B", &[] as &[&str])]);
        let plan = VideoPlan::new(
            &track("Song", "A", &["A"], "first line\nsecond line"),
            &artwork("B"),
            &VideoFormat::default(),
            ".mp4",
        );

        let expected = "A - Song\n\nfirst line\nsecond line\n\nA\n\nArtwork by B\n";
        assert_eq!(plan.description(&mut catalog).unwrap(), expected);
    }

    #[test]
    fn footer_is_appended_after_a_newline() {
        let mut catalog = catalog_with_artists(&[("A", &[] as &[&str]), ("B", &[] as &[&str])]);
        let format = VideoFormat {
            footer: "footer text".to_string(),
            ..VideoFormat::default()
        };
        let plan = VideoPlan::new(&track("Song", "A", &["A"], ""), &artwork("B"), &format, ".mp4");

        let description = plan.description(&mut catalog).unwrap();
        assert!(description.ends_with("Artwork by B\n\nfooter text"));
    }

    #[test]
    #[should_panic(expected = "not in catalog")]
    fn missing_artist_is_an_invariant_violation() {
        let mut catalog = Catalog::default();
        let plan = VideoPlan::new(
            &track("Song", "A", &["A"], ""),
            &artwork("B"),
            &VideoFormat::default(),
            ".mp4",
        );
        let _ = plan.description(&mut catalog);
    }

    #[test]
    fn build_without_destination_produces_bare_file_name() {
        let mut catalog = catalog_with_artists(&[("A", &[] as &[&str]), ("B", &[] as &[&str])]);
        let plan = VideoPlan::new(
            &track("Song", "A", &["A"], ""),
            &artwork("B"),
            &VideoFormat::default(),
            ".mp4",
        );

        let video = plan.build(&mut catalog, None).unwrap();
        assert_eq!(video.path, "A - Song.mp4");
        assert_eq!(video.state, ItemState::Buffered);
        assert_eq!(video.publish_at, None);
        assert_eq!(video.upload_id, None);
        assert_eq!(video.audio, "/track");
        assert_eq!(video.image, "/art");
    }

    #[test]
    fn unknown_template_key_fails_the_build() {
        let mut catalog = catalog_with_artists(&[("A", &[] as &[&str]), ("B", &[] as &[&str])]);
        let format = VideoFormat {
            title: "%(nope)".to_string(),
            ..VideoFormat::default()
        };
        let plan = VideoPlan::new(&track("Song", "A", &["A"], ""), &artwork("B"), &format, ".mp4");

        assert!(matches!(
            plan.build(&mut catalog, None),
            Err(ComposeError::Template(TemplateError::UnknownKey { .. }))
        ));
    }
}
