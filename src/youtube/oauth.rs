//! OAuth2 installed-application flow for the YouTube Data API.
//!
//! Tokens are cached under `<root>/.credentials/youtube.json`. The first run
//! opens a browser to the consent page and catches the redirect on a local
//! listener; later runs refresh the cached token silently.

use crate::console;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::warn;
use urlencoding::encode;

const REDIRECT_ADDR: &str = "127.0.0.1:8090";
const REDIRECT_URI: &str = "http://localhost:8090";
const UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: ClientSecret,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Token {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl Token {
    fn is_valid(&self) -> bool {
        self.expires_at.map_or(false, |at| at > Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            // Renew a minute early rather than risk an expired token mid-upload.
            expires_at: self.expires_in.map(|s| Utc::now() + Duration::seconds(s - 60)),
        }
    }
}

pub struct Authenticator {
    secret: ClientSecret,
    cache_path: PathBuf,
    client: reqwest::Client,
}

impl Authenticator {
    pub fn new(client_secret_path: &Path, root_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(client_secret_path)
            .with_context(|| format!("Unable to read client secret: {client_secret_path:?}"))?;
        let secret: ClientSecretFile = serde_json::from_str(&content)
            .with_context(|| format!("Unable to parse client secret: {client_secret_path:?}"))?;

        Ok(Self {
            secret: secret.installed,
            cache_path: root_path.join(".credentials").join("youtube.json"),
            client: reqwest::Client::new(),
        })
    }

    /// Return a valid access token, refreshing or re-authorizing as needed.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.load_cached() {
            if token.is_valid() {
                return Ok(token.access_token);
            }
            if let Some(refresh_token) = token.refresh_token {
                match self.refresh(&refresh_token).await {
                    Ok(mut fresh) => {
                        if fresh.refresh_token.is_none() {
                            fresh.refresh_token = Some(refresh_token);
                        }
                        self.store(&fresh)?;
                        return Ok(fresh.access_token);
                    }
                    Err(e) => warn!("Token refresh failed, starting a new authorization: {e:#}"),
                }
            }
        }

        let token = self.authorize().await?;
        self.store(&token)?;
        Ok(token.access_token)
    }

    fn load_cached(&self) -> Option<Token> {
        let content = fs::read_to_string(&self.cache_path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn store(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create credentials dir: {parent:?}"))?;
        }
        let content = serde_json::to_string(token)?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Unable to cache oauth token: {:?}", self.cache_path))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        let params = [
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        self.request_token(&params).await
    }

    async fn exchange(&self, code: &str) -> Result<Token> {
        let params = [
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token> {
        let response = self
            .client
            .post(&self.secret.token_uri)
            .form(params)
            .send()
            .await
            .context("Failed to reach the token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Token request failed with status {status}: {body}");
        }
        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;
        Ok(token.into_token())
    }

    async fn authorize(&self) -> Result<Token> {
        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.secret.auth_uri,
            encode(&self.secret.client_id),
            encode(REDIRECT_URI),
            encode(UPLOAD_SCOPE),
        );

        // Bind before opening the browser so the redirect cannot race us.
        let listener = TcpListener::bind(REDIRECT_ADDR)
            .await
            .with_context(|| format!("Unable to listen on {REDIRECT_ADDR} for the redirect"))?;

        console::log(
            "auth:",
            "Your browser has been opened to an authorization URL. \
             The upload resumes once access has been granted.",
        );
        println!("{auth_url}");
        if open::that(&auth_url).is_err() {
            warn!("Could not open a browser, visit the URL above manually");
        }

        let code = wait_for_code(listener).await?;
        self.exchange(&code).await
    }
}

/// Accept a single connection on the redirect listener and extract the
/// authorization code from its request line.
async fn wait_for_code(listener: TcpListener) -> Result<String> {
    let (mut stream, _) = listener
        .accept()
        .await
        .context("Failed to accept the redirect connection")?;

    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let code = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split('?').nth(1))
        .and_then(|query| query.split('&').find_map(|p| p.strip_prefix("code=")))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No authorization code in the redirect request"))?;

    let body = "Authorization received. You can now safely close this browser window.";
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;

    Ok(urlencoding::decode(&code)
        .context("Authorization code is not valid UTF-8")?
        .into_owned())
}
