//! Client for the external lyric-information provider.
//!
//! The provider answers `GET {base_url}/info?group=..&song=..` with
//! `{releaseDate, text, link}`. One attempt is made per call; callers decide
//! what a failure means.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::Provider;
use crate::model::SongDetail;

#[derive(Debug, thiserror::Error)]
pub enum LyricError {
    #[error("provider unreachable")]
    Transport(#[source] reqwest::Error),

    #[error("provider returned {0}")]
    Status(StatusCode),

    #[error("provider returned an unreadable body")]
    Decode(#[source] serde_json::Error),
}

#[async_trait]
pub trait LyricProvider: Send + Sync {
    async fn fetch_details(&self, group: &str, title: &str) -> Result<SongDetail, LyricError>;
}

pub struct LyricsClient {
    client: Client,
    base_url: String,
}

impl LyricsClient {
    pub fn new(cfg: &Provider) -> Self {
        Self::with_client(Client::new(), &cfg.base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        LyricsClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn info_url(&self) -> String {
        format!("{}/info", self.base_url)
    }
}

#[async_trait]
impl LyricProvider for LyricsClient {
    async fn fetch_details(&self, group: &str, title: &str) -> Result<SongDetail, LyricError> {
        let response = self
            .client
            .get(self.info_url())
            .query(&[("group", group), ("song", title)])
            .send()
            .await
            .map_err(LyricError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::info!(group, song = title, status = %status, "lyric provider has no details");
            return Err(LyricError::Status(status));
        }

        let body = response.text().await.map_err(LyricError::Transport)?;
        serde_json::from_str(&body).map_err(LyricError::Decode)
    }
}
