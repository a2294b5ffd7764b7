//! # GW2 HTTP Client
//!
//! Thin wrapper around the three public endpoints Herald reads.

use super::types::{ApiMatch, MatchOverview};
use crate::error::ClientError;
use herald_core::{WorldId, WorldInfo};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Public API host.
pub const DEFAULT_BASE_URL: &str = "https://api.guildwars2.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the GW2 API.
#[derive(Clone)]
pub struct Gw2Client {
    http: reqwest::Client,
    base_url: String,
}

impl Gw2Client {
    /// Create a client for `base_url` (no trailing slash needed).
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET a path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "GET");

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| ClientError::Parse {
            url,
            reason: e.to_string(),
        })
    }

    /// GET /v2/wvw/matches/overview → the match `world` currently plays in.
    pub async fn overview(&self, world: WorldId) -> Result<MatchOverview, ClientError> {
        self.get_json("/v2/wvw/matches/overview", &[("world", world.to_string())])
            .await
    }

    /// GET /v2/wvw/matches → every match of every region.
    pub async fn matches(&self) -> Result<Vec<ApiMatch>, ClientError> {
        self.get_json("/v2/wvw/matches", &[("ids", "all".to_string())])
            .await
    }

    /// GET /v2/worlds → names and population of the given worlds.
    pub async fn worlds(
        &self,
        ids: impl IntoIterator<Item = WorldId>,
    ) -> Result<Vec<WorldInfo>, ClientError> {
        let ids = ids
            .into_iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.get_json("/v2/worlds", &[("ids", ids)]).await
    }
}
