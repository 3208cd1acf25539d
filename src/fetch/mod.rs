//! Artwork download over HTTP into the data cache directory.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to download '{url}' ({reason}).")]
    DownloadFailed { url: String, reason: String },

    #[error("Cannot determine file extension, use --ext flag.")]
    UnknownExtension,

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}

/// True when the value parses as an absolute URL with a host.
pub fn is_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|u| u.has_host())
        .unwrap_or(false)
}

/// Local cache file name for a URL: the last path segment, with the
/// extension either taken from an allow-list of image extensions or
/// explicitly overridden.
pub fn cache_file_name(url: &str, extension_override: Option<&str>) -> Result<String, FetchError> {
    let name = url.rsplit('/').next().unwrap_or(url);
    match extension_override {
        Some(ext) => Ok(format!("{name}{ext}")),
        None if has_image_extension(name) => Ok(name.to_string()),
        None => Err(FetchError::UnknownExtension),
    }
}

fn has_image_extension(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Downloads artwork into `<data>/.cache`.
pub struct Fetcher {
    client: reqwest::Client,
    cache_dir: PathBuf,
}

impl Fetcher {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_dir: data_dir.join(".cache"),
        }
    }

    /// Fetch a remote image and return the local file path.
    pub async fn fetch_artwork(
        &self,
        url: &str,
        extension_override: Option<&str>,
    ) -> Result<PathBuf, FetchError> {
        let file_name = cache_file_name(url, extension_override)?;
        fs::create_dir_all(&self.cache_dir)?;
        let dst = self.cache_dir.join(file_name);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        fs::write(&dst, &bytes)?;
        Ok(dst)
    }
}
