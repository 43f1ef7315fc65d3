use thiserror::Error;

/// Failures that terminate a single search request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Upstream request failed: {0}")]
    UpstreamFetch(String),

    #[error("Upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Malformed upstream payload: {0}")]
    UpstreamPayload(#[source] serde_json::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProxyError {
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::InvalidBody(_) => 400,
            ProxyError::UpstreamFetch(_)
            | ProxyError::UpstreamStatus(_)
            | ProxyError::UpstreamPayload(_) => 502,
            ProxyError::Encode(_) => 500,
        }
    }

    /// Text safe to return to the browser. Upstream failures can carry the
    /// request URL, which holds the access key, so their detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::UpstreamFetch(_) | ProxyError::UpstreamStatus(_) => {
                "Upstream request failed".to_string()
            }
            ProxyError::UpstreamPayload(_) => "Malformed upstream payload".to_string(),
            ProxyError::InvalidBody(_) | ProxyError::Encode(_) => self.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing binding {0}")]
    Missing(&'static str),

    #[error("{0} must list at least one origin")]
    EmptyAllowList(&'static str),

    #[error("Unknown CORS_MODE '{0}', expected 'allow-list' or 'wildcard'")]
    UnknownCorsMode(String),

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}
