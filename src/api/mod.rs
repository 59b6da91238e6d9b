//! HTTP access to the episode index and the local file status endpoint.

use crate::config::Config;
use crate::episodes::{sort_by_date_desc, Episode, FileStatus, PodcastIndex};
use crate::error::{AppError, LoadError};
use std::future::Future;
use std::time::Duration;

/// Where the page gets its data from.
///
/// Implemented over HTTP by [`ApiClient`]; tests swap in canned sources.
pub trait EpisodeSource {
    /// Fetch, validate and sort the full episode collection.
    fn fetch_episodes(&self) -> impl Future<Output = Result<Vec<Episode>, LoadError>>;

    fn fetch_file_status(&self) -> impl Future<Output = Result<FileStatus, AppError>>;
}

/// reqwest-backed client for `/api/podcasts` and `/api/files/status`
pub struct ApiClient {
    client: reqwest::Client,
    podcasts_url: String,
    status_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_default(),
            podcasts_url: config.endpoint_url(&config.data_source),
            status_url: config.endpoint_url(&config.status_endpoint),
        }
    }
}

impl EpisodeSource for ApiClient {
    async fn fetch_episodes(&self) -> Result<Vec<Episode>, LoadError> {
        log::info!("Loading episode index from {}", self.podcasts_url);

        let response = self.client.get(&self.podcasts_url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let episodes = decode_podcast_index(status, &body).map_err(|e| {
            log::error!("Failed to load episode index: {}", e);
            e
        })?;

        log::info!("Loaded {} episodes", episodes.len());
        Ok(episodes)
    }

    async fn fetch_file_status(&self) -> Result<FileStatus, AppError> {
        let response = self.client.get(&self.status_url).send().await?;

        if !response.status().is_success() {
            return Err(format!("File status returned {}", response.status()).into());
        }

        let status: FileStatus = response.json().await?;

        log::debug!("File status: {:?}", status);
        Ok(status)
    }
}

/// Turn a raw `/api/podcasts` response into the sorted collection.
///
/// Non-2xx statuses and an `error` field in the payload both fail; a missing
/// `podcasts` list is an empty collection.
pub fn decode_podcast_index(status: u16, body: &str) -> Result<Vec<Episode>, LoadError> {
    if !(200..300).contains(&status) {
        return Err(LoadError::Status(status));
    }

    let index: PodcastIndex = serde_json::from_str(body)?;

    if let Some(error) = index.error.filter(|e| !e.is_empty()) {
        return Err(LoadError::Api(error));
    }

    let mut episodes = index.podcasts.unwrap_or_default();
    sort_by_date_desc(&mut episodes);
    Ok(episodes)
}
