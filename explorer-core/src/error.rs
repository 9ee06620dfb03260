use thiserror::Error;

use crate::provider::ProviderId;

pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Everything that can go wrong while resolving one query.
///
/// Callers of the HTTP API never see these details; they are kept apart so
/// the server log says which stage failed.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No API key configured for provider '{0}'")]
    MissingApiKey(ProviderId),

    #[error("Invalid base URL for provider '{provider}': {message}")]
    InvalidUrl { provider: ProviderId, message: String },

    #[error("Provider '{provider}' unreachable: {message}")]
    Unreachable { provider: ProviderId, message: String },

    #[error("Provider '{provider}' returned status {status}: {body}")]
    BadStatus {
        provider: ProviderId,
        status: u16,
        body: String,
    },

    #[error("Unexpected response shape from provider '{provider}': {message}")]
    BadShape { provider: ProviderId, message: String },

    #[error("Provider '{0}' returned no results")]
    EmptyResult(ProviderId),
}

impl ExplorerError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExplorerError::InvalidInput(_) => "invalid_input",
            ExplorerError::MissingApiKey(_) => "missing_api_key",
            ExplorerError::InvalidUrl { .. } => "invalid_url",
            ExplorerError::Unreachable { .. } => "upstream_unreachable",
            ExplorerError::BadStatus { .. } => "upstream_bad_status",
            ExplorerError::BadShape { .. } => "upstream_bad_shape",
            ExplorerError::EmptyResult(_) => "upstream_empty",
        }
    }

    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            ExplorerError::InvalidInput(_) => None,
            ExplorerError::MissingApiKey(provider)
            | ExplorerError::EmptyResult(provider)
            | ExplorerError::InvalidUrl { provider, .. }
            | ExplorerError::Unreachable { provider, .. }
            | ExplorerError::BadStatus { provider, .. }
            | ExplorerError::BadShape { provider, .. } => Some(*provider),
        }
    }
}
