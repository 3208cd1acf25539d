//! Configuration resolution: compiled defaults, overridden by an optional
//! TOML file found in a fixed search order (or passed with `--config`).

mod file_config;

pub use file_config::{EncoderConfig, FileConfig, TemplatesConfig, UploadConfig};

use crate::compose::VideoFormat;
use crate::encoder::Encoder;
use crate::youtube::UploadMetadata;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG: &str = r#"# tubesmith configuration

root_path = "~/.tubesmith"
data_path = "~/.tubesmith/data"
catalog_path = "~/.tubesmith/catalog.json"
client_secret = "~/.tubesmith/client_secret.json"

[encoder]
path = "ffmpeg"
input_args = "-r 1 -loop 1"
output_args = "-acodec copy -r 1 -shortest"
extension = ".mp4"

[templates]
title = "%(by) - %(title)"
header = "%(by) - %(title)"
track_credits = "%(artist)"
artwork_credits = "Artwork by %(artist)"
link = "- %(link)"
footer = ""

[upload]
tags = []
privacy = "public"
category_id = "10"
frequency_days = 1
time_utc = "12:00:00"
"#;

/// Upload scheduling and metadata settings.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub metadata: UploadMetadata,
    pub frequency_days: u32,
    /// Daily upload time-of-day as `hh:mm:ss` UTC. Validated when the
    /// schedule command uses it.
    pub time_utc: String,
}

/// Fully resolved configuration threaded through the commands.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub root_path: PathBuf,
    pub data_path: PathBuf,
    pub catalog_path: PathBuf,
    pub client_secret: PathBuf,
    pub encoder: Encoder,
    pub templates: VideoFormat,
    pub upload: UploadSettings,
}

impl AppConfig {
    /// Load the config file (explicit path, or the first hit in the search
    /// order) and resolve it over the defaults. When no file exists yet, a
    /// commented default config is written for the next run.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let file = match override_path {
            Some(path) => FileConfig::load(path)?,
            None => match find_config_file() {
                Some(path) => FileConfig::load(&path)?,
                None => {
                    write_default_config();
                    FileConfig::default()
                }
            },
        };
        Ok(Self::resolve(file))
    }

    /// Merge file values over the compiled defaults.
    pub fn resolve(file: FileConfig) -> Self {
        let encoder_file = file.encoder.unwrap_or_default();
        let encoder_defaults = Encoder::default();
        let encoder = Encoder {
            path: encoder_file.path.unwrap_or(encoder_defaults.path),
            input_args: encoder_file.input_args.unwrap_or(encoder_defaults.input_args),
            output_args: encoder_file
                .output_args
                .unwrap_or(encoder_defaults.output_args),
            extension: encoder_file.extension.unwrap_or(encoder_defaults.extension),
        };

        let templates_file = file.templates.unwrap_or_default();
        let template_defaults = VideoFormat::default();
        let templates = VideoFormat {
            title: templates_file.title.unwrap_or(template_defaults.title),
            header: templates_file.header.unwrap_or(template_defaults.header),
            track_credits: templates_file
                .track_credits
                .unwrap_or(template_defaults.track_credits),
            artwork_credits: templates_file
                .artwork_credits
                .unwrap_or(template_defaults.artwork_credits),
            link: templates_file.link.unwrap_or(template_defaults.link),
            footer: templates_file.footer.unwrap_or(template_defaults.footer),
        };

        let upload_file = file.upload.unwrap_or_default();
        let metadata_defaults = UploadMetadata::default();
        let upload = UploadSettings {
            metadata: UploadMetadata {
                tags: upload_file.tags.unwrap_or(metadata_defaults.tags),
                privacy: upload_file.privacy.unwrap_or(metadata_defaults.privacy),
                category_id: upload_file
                    .category_id
                    .unwrap_or(metadata_defaults.category_id),
            },
            frequency_days: upload_file.frequency_days.unwrap_or(1),
            time_utc: upload_file.time_utc.unwrap_or_else(|| "12:00:00".to_string()),
        };

        Self {
            root_path: expand_home(file.root_path.as_deref().unwrap_or("~/.tubesmith")),
            data_path: expand_home(file.data_path.as_deref().unwrap_or("~/.tubesmith/data")),
            catalog_path: expand_home(
                file.catalog_path
                    .as_deref()
                    .unwrap_or("~/.tubesmith/catalog.json"),
            ),
            client_secret: expand_home(
                file.client_secret
                    .as_deref()
                    .unwrap_or("~/.tubesmith/client_secret.json"),
            ),
            encoder,
            templates,
            upload,
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("tubesmith.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("tubesmith").join("config.toml"));
    }
    candidates.push(expand_home("~/.tubesmith/config.toml"));
    candidates.into_iter().find(|p| p.exists())
}

fn write_default_config() {
    let path = expand_home("~/.tubesmith/config.toml");
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if fs::write(&path, DEFAULT_CONFIG).is_ok() {
        info!("Wrote default config to {path:?}");
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
