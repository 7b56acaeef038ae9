//! External provider error types.

/// Errors from an upstream travel-data provider. Every variant names the
/// provider so failures can be diagnosed from the logs without retrying.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error or timeout)
    #[error("{provider}: HTTP error: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Authentication failed
    #[error("{provider}: unauthorized, check the configured credentials")]
    Unauthorized { provider: &'static str },

    /// Provider returned an error status
    #[error("{provider}: API error {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Failed to parse the provider response
    #[error("{provider}: response parse error: {message}")]
    Json {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn http(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Http { provider, source }
    }

    pub fn api(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn json(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Json {
            provider,
            message: message.into(),
        }
    }
}
