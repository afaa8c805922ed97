use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing or invalid application identifier")]
    InvalidArgument,

    #[error("store lookup request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("store lookup failed with HTTP {status}{body_snippet}")]
    HttpStatus {
        status: StatusCode,
        body_snippet: String,
    },

    #[error("store lookup returned no data")]
    NoData,

    #[error("could not parse the store lookup response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("no store listing matched the application identifier")]
    NoResults,

    #[error("the store page url is missing or not openable")]
    InvalidUrl,

    #[error("could not open the store page: {0}")]
    OpenFailed(#[source] std::io::Error),
}

impl StoreError {
    /// Stable wire code for the `{code, message}` error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Request(_) | Self::HttpStatus { .. } => "HTTP_ERROR",
            Self::NoData => "NO_DATA",
            Self::Parse(_) => "PARSE_ERROR",
            Self::NoResults => "NO_RESULTS",
            Self::InvalidUrl => "INVALID_URL",
            Self::OpenFailed(_) => "OPEN_FAILED",
        }
    }
}
