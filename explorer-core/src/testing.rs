//! Canned upstream responses for tests that should not touch the network.

use async_trait::async_trait;
use serde_json::Value;
use std::{collections::HashMap, sync::Mutex};

use crate::{
    error::{ExplorerError, Result},
    fetch::{Fetch, UpstreamRequest},
    provider::ProviderId,
};

#[derive(Debug, Clone)]
enum Canned {
    Json(Value),
    Status(u16, String),
    Unreachable(String),
}

/// A [`Fetch`] that answers from a fixed table and remembers what it was asked.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: HashMap<ProviderId, Canned>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, provider: ProviderId, body: Value) -> Self {
        self.responses.insert(provider, Canned::Json(body));
        self
    }

    pub fn with_status(mut self, provider: ProviderId, status: u16, body: &str) -> Self {
        self.responses
            .insert(provider, Canned::Status(status, body.to_string()));
        self
    }

    pub fn with_unreachable(mut self, provider: ProviderId, message: &str) -> Self {
        self.responses
            .insert(provider, Canned::Unreachable(message.to_string()));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests
            .lock()
            .map(|reqs| reqs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Fetch for StaticFetcher {
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value> {
        if let Ok(mut reqs) = self.requests.lock() {
            reqs.push(request.clone());
        }

        let provider = request.provider;
        match self.responses.get(&provider) {
            Some(Canned::Json(body)) => Ok(body.clone()),
            Some(Canned::Status(status, body)) => Err(ExplorerError::BadStatus {
                provider,
                status: *status,
                body: body.clone(),
            }),
            Some(Canned::Unreachable(message)) => Err(ExplorerError::Unreachable {
                provider,
                message: message.clone(),
            }),
            None => Err(ExplorerError::Unreachable {
                provider,
                message: "no canned response".to_string(),
            }),
        }
    }
}
