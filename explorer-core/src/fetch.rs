use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, trace};

use crate::{
    error::{ExplorerError, Result},
    provider::ProviderId,
};

/// One outbound GET, fully built by a resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub provider: ProviderId,
    pub url: Url,
    /// Sent as `Authorization: Bearer ...` when present.
    pub bearer_token: Option<String>,
}

impl UpstreamRequest {
    pub fn new(provider: ProviderId, url: Url) -> Self {
        Self {
            provider,
            url,
            bearer_token: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Host and path only. Keys live in the query string or path of some
    /// providers, so full URLs stay out of the logs.
    pub fn log_target(&self) -> String {
        format!("{}{}", self.url.host_str().unwrap_or_default(), self.redacted_path())
    }

    fn redacted_path(&self) -> String {
        let path = self.url.path();
        if self.provider != ProviderId::Weather {
            return path.to_string();
        }

        // The weather key sits right before the trailing "lat,lon" segment.
        let mut segments: Vec<&str> = path.split('/').collect();
        let len = segments.len();
        if len >= 3 {
            segments[len - 2] = "<key>";
        }
        segments.join("/")
    }
}

/// Issues the single outbound call a resolver needs and hands back the parsed JSON.
#[async_trait]
pub trait Fetch: Send + Sync + Debug {
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value> {
        let provider = request.provider;
        debug!(%provider, target = %request.log_target(), "Sending upstream request");

        let mut builder = self.http.get(request.url.clone());
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let res = builder
            .send()
            .await
            .map_err(|e| unreachable_error(provider, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| unreachable_error(provider, e))?;

        if !status.is_success() {
            return Err(ExplorerError::BadStatus {
                provider,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        trace!(%provider, body = %truncate_body(&body), "Upstream response");

        serde_json::from_str(&body).map_err(|e| ExplorerError::BadShape {
            provider,
            message: format!("invalid JSON: {e}"),
        })
    }
}

fn unreachable_error(provider: ProviderId, err: reqwest::Error) -> ExplorerError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.without_url().to_string()
    };

    ExplorerError::Unreachable { provider, message }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
