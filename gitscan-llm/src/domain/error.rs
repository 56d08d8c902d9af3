//! Provider error taxonomy

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("no API key configured for provider {0}")]
    MissingApiKey(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
}
