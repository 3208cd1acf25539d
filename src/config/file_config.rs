//! TOML file configuration. Every field is optional; missing values fall
//! back to compiled defaults during resolution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub root_path: Option<String>,
    pub data_path: Option<String>,
    pub catalog_path: Option<String>,
    pub client_secret: Option<String>,
    pub encoder: Option<EncoderConfig>,
    pub templates: Option<TemplatesConfig>,
    pub upload: Option<UploadConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EncoderConfig {
    pub path: Option<String>,
    pub input_args: Option<String>,
    pub output_args: Option<String>,
    pub extension: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TemplatesConfig {
    pub title: Option<String>,
    pub header: Option<String>,
    pub track_credits: Option<String>,
    pub artwork_credits: Option<String>,
    pub link: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub tags: Option<Vec<String>>,
    pub privacy: Option<String>,
    pub category_id: Option<String>,
    pub frequency_days: Option<u32>,
    pub time_utc: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {path:?}"))
    }
}
