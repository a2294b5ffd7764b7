//! # Discord Webhook
//!
//! Posts a [`Report`] as a single embed.

use crate::error::ClientError;
use crate::report::Report;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stands in for the URL in errors; the URL carries the webhook token.
const REDACTED_URL: &str = "<discord webhook>";

// =============================================================================
// PAYLOAD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// Body of an execute-webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// One embed carrying `report` rendered as markdown.
    pub fn from_report(
        report: &Report,
        username: Option<String>,
        thumbnail: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let fields = report
            .fields
            .iter()
            .map(|field| EmbedField {
                name: field.name.clone(),
                value: field.value.to_markdown(),
                inline: true,
            })
            .collect();

        Self {
            username,
            embeds: vec![Embed {
                title: Some(report.title.clone()),
                description: report.description.to_markdown(),
                color: report.color,
                thumbnail: thumbnail.map(|url| Thumbnail { url }),
                timestamp,
                fields,
            }],
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// An execute-webhook URL.
pub struct DiscordWebhook {
    http: reqwest::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            url: url.into(),
        }
    }

    /// POST the payload. Any non-success status is an error.
    pub async fn execute(&self, payload: &WebhookPayload) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                url: REDACTED_URL.to_string(),
                reason: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url: REDACTED_URL.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), "webhook executed");
        Ok(())
    }
}
