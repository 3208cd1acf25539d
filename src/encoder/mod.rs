//! Video rendering via an external ffmpeg process.

use crate::catalog::Video;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{encoder} failed: {stderr}")]
    RenderFailed { encoder: String, stderr: String },
}

/// Invocation parameters for the external encoder.
#[derive(Clone, Debug)]
pub struct Encoder {
    pub path: String,
    pub input_args: String,
    pub output_args: String,
    /// Output file extension, including the leading dot.
    pub extension: String,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            path: "ffmpeg".to_string(),
            input_args: "-r 1 -loop 1".to_string(),
            output_args: "-acodec copy -r 1 -shortest".to_string(),
            extension: ".mp4".to_string(),
        }
    }
}

impl Encoder {
    /// Render a video by merging the artwork image with the track audio.
    /// Blocks until the encoder process exits; a non-zero exit is an error
    /// carrying the encoder's stderr.
    pub async fn render(&self, video: &Video) -> Result<(), EncoderError> {
        let output = Command::new(&self.path)
            .args(self.input_args.split_whitespace())
            .args(["-i", &video.image, "-i", &video.audio])
            .args(self.output_args.split_whitespace())
            .arg(&video.path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(EncoderError::RenderFailed {
                encoder: self.path.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }
}
