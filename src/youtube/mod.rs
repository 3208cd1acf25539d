//! Minimal YouTube Data API v3 client: resumable video upload with
//! scheduled-publish support.

pub mod oauth;

pub use oauth::Authenticator;

use crate::catalog::Video;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::io::ReaderStream;

const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";

/// The API rejects RFC3339 timestamps without a subsecond part, so publish
/// times are always formatted with milliseconds.
const ISO8601_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Static upload metadata applied to every video.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub tags: Vec<String>,
    pub privacy: String,
    pub category_id: String,
}

impl Default for UploadMetadata {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            privacy: "public".to_string(),
            category_id: "10".to_string(),
        }
    }
}

pub struct YouTubeClient {
    client: reqwest::Client,
    auth: Authenticator,
    metadata: UploadMetadata,
}

impl YouTubeClient {
    pub fn new(auth: Authenticator, metadata: UploadMetadata) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            metadata,
        }
    }

    /// Upload a rendered video and return its remote id.
    ///
    /// A video with a publish time is forced to private visibility, as the
    /// platform requires for scheduled publishing.
    pub async fn upload(&self, video: &Video) -> Result<String> {
        let token = self.auth.access_token().await?;
        let body = self.upload_request_body(video);

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .context("Failed to start the upload session")?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            bail!("Upload session rejected for '{}': {status} {detail}", video.title);
        }
        let session_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Upload session did not return a location"))?;

        let file = tokio::fs::File::open(&video.path)
            .await
            .with_context(|| format!("Unable to open {}", video.path))?;
        let length = file.metadata().await?.len();

        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_LENGTH, length)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .with_context(|| format!("Failed to upload {}", video.path))?;
        if !response.status().is_success() {
            bail!(
                "Failed to upload {}: status {}",
                video.path,
                response.status()
            );
        }

        #[derive(Deserialize)]
        struct UploadResponse {
            id: String,
        }
        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;
        Ok(uploaded.id)
    }

    fn upload_request_body(&self, video: &Video) -> serde_json::Value {
        let mut snippet = json!({
            "title": video.title,
            "description": video.description,
            "categoryId": self.metadata.category_id,
        });
        // An empty tag array is rejected with a 400.
        if !self.metadata.tags.is_empty() {
            snippet["tags"] = json!(self.metadata.tags);
        }

        let mut status = json!({ "privacyStatus": self.metadata.privacy });
        if let Some(at) = video.publish_at {
            status["privacyStatus"] = json!("private");
            status["publishAt"] = json!(at.format(ISO8601_MILLIS).to_string());
        }

        json!({ "snippet": snippet, "status": status })
    }
}
