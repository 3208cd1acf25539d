//! The `add` command: place music and artwork files into the buffer.

use crate::catalog::{Artwork, Catalog, CatalogError, ItemState, Track};
use crate::cli::{AddOpts, AddTarget, MediaKind};
use crate::config::AppConfig;
use crate::console::{self, Spinner};
use crate::fetch::{self, Fetcher};
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub async fn run(catalog: &mut Catalog, config: &AppConfig, target: AddTarget) -> Result<()> {
    match target {
        AddTarget::Music { path, opts } => {
            let dst = config.data_path.join("music");
            fs::create_dir_all(&dst)?;
            for src in list_file_paths(&path)? {
                add_music(catalog, &src, &dst, &opts)?;
            }
            Ok(())
        }

        AddTarget::Art { path, opts, ext } => {
            let dst = config.data_path.join("art");
            fs::create_dir_all(&dst)?;

            if fetch::is_url(&path) {
                let spinner = Spinner::start("download:", &path);
                let result = Fetcher::new(&config.data_path)
                    .fetch_artwork(&path, ext.as_deref())
                    .await;
                spinner.finish(&path).await;
                let local = result?;

                // The cached download is already a private copy, move it.
                let mut opts = opts;
                opts.mv = true;
                return add_art(catalog, &local, &dst, &opts);
            }

            for src in list_file_paths(&path)? {
                add_art(catalog, &src, &dst, &opts)?;
            }
            Ok(())
        }

        AddTarget::Undo { kind } => undo(catalog, kind),
    }
}

/// Pop the most recent buffered entry and delete its file. Fails if the
/// entry has already advanced past Buffered.
fn undo(catalog: &mut Catalog, kind: MediaKind) -> Result<()> {
    match kind {
        MediaKind::Music => match catalog.tracks.pop() {
            None => bail!("The music buffer is empty."),
            Some(track) if track.state != ItemState::Buffered => {
                catalog.tracks.push(track);
                Err(CatalogError::ImmutableResource("music").into())
            }
            Some(track) => {
                let _ = fs::remove_file(&track.path);
                console::log("undo:", &track.path);
                Ok(())
            }
        },
        MediaKind::Art => match catalog.artwork.pop() {
            None => bail!("The art buffer is empty."),
            Some(artwork) if artwork.state != ItemState::Buffered => {
                catalog.artwork.push(artwork);
                Err(CatalogError::ImmutableResource("art").into())
            }
            Some(artwork) => {
                let _ = fs::remove_file(&artwork.path);
                console::log("undo:", &artwork.path);
                Ok(())
            }
        },
    }
}

fn add_music(catalog: &mut Catalog, src: &Path, dst_dir: &Path, opts: &AddOpts) -> Result<()> {
    let track = new_track(src, dst_dir, opts).context("Could not create music.")?;
    catalog.add_track(track)?;
    Ok(())
}

fn add_art(catalog: &mut Catalog, src: &Path, dst_dir: &Path, opts: &AddOpts) -> Result<()> {
    let artwork = new_artwork(src, dst_dir, opts).context("Could not create artwork.")?;
    catalog.add_artwork(artwork)?;
    Ok(())
}

/// Create a track by copying (or moving) the source file into the data
/// directory, inferring title and artists from the file name unless
/// overridden.
pub fn new_track(src: &Path, dst_dir: &Path, opts: &AddOpts) -> Result<Track> {
    let file_name = file_name_of(src)?;
    let (mut title, mut by) = track_info(&file_name);
    if let Some(name) = &opts.name {
        title = name.clone();
    }
    if let Some(owner) = &opts.by {
        by = owner.clone();
    }

    let dst = dst_dir.join(&file_name);
    place_file(src, &dst, opts.mv)?;

    let artists = infer_artists(&title, &by, opts.artists.as_deref());
    Ok(Track {
        title,
        by,
        artists,
        description: opts.desc.clone().unwrap_or_default(),
        path: dst.to_string_lossy().into_owned(),
        state: ItemState::Buffered,
    })
}

/// Create artwork by copying (or moving) the source file into the data
/// directory with the same name.
pub fn new_artwork(src: &Path, dst_dir: &Path, opts: &AddOpts) -> Result<Artwork> {
    let file_name = file_name_of(src)?;
    let dst = dst_dir.join(&file_name);
    if src != dst {
        place_file(src, &dst, opts.mv)?;
    }
    Ok(Artwork {
        artist: opts.artists.clone().unwrap_or_default(),
        path: dst.to_string_lossy().into_owned(),
        state: ItemState::Buffered,
    })
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid file name: {path:?}"))
}

fn place_file(src: &Path, dst: &Path, mv: bool) -> Result<()> {
    if mv {
        fs::rename(src, dst).with_context(|| format!("Failed to move {src:?} to {dst:?}"))?;
    } else {
        fs::copy(src, dst).with_context(|| format!("Failed to copy {src:?} to {dst:?}"))?;
    }
    Ok(())
}

fn list_file_paths(src: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(src);
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("File or directory '{src}' does not exist."))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();
        return Ok(entries);
    }
    if !path.exists() {
        bail!("File or directory '{src}' does not exist.");
    }
    Ok(vec![path.to_path_buf()])
}

/// Infer `(title, by)` from a file name shaped like `Artist - Title.ext`.
pub fn track_info(file_name: &str) -> (String, String) {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let parts: Vec<&str> = stem.split('-').collect();
    let by = parts.first().map(|p| p.trim()).unwrap_or_default();
    let title = parts.get(1).map(|p| p.trim()).unwrap_or_default();
    (title.to_string(), by.to_string())
}

/// Infer the artist list: an explicit comma-separated override wins;
/// otherwise the `by` field is split on collaboration separators and
/// featured artists are appended from the title.
pub fn infer_artists(title: &str, by: &str, overridden: Option<&str>) -> Vec<String> {
    let mut artists: Vec<String> = match overridden {
        Some(value) => value.split(',').map(str::to_string).collect(),
        None => {
            let mut names = split_on_separators(by, &["&", "x", "X", "+"]);
            let features = split_on_separators(title, &["feat.", "Feat.", "ft."]);
            if features.len() > 1 {
                names.extend(features.into_iter().skip(1));
            }
            names
        }
    };
    for name in &mut artists {
        *name = name.trim().to_string();
    }
    artists
}

/// Split on whole-word separator tokens, dropping empty segments.
fn split_on_separators(value: &str, separators: &[&str]) -> Vec<String> {
    let tokens: Vec<&str> = value.split(' ').collect();
    let mut result = Vec::new();
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if separators.contains(token) {
            let part = tokens[start..i].join(" ");
            if part.is_empty() {
                continue;
            }
            result.push(part);
            start = i + 1;
        }
    }
    let tail = tokens[start..].join(" ");
    if !tail.is_empty() {
        result.push(tail);
    }
    result
}
