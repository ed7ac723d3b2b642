use thiserror::Error;

/// Everything that can turn a single ticker's card into an error placeholder.
///
/// None of these abort a refresh; the fetch sequence logs them and moves on
/// to the next ticker.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The endpoint could not be reached, or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request outlived the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the expected chart envelope.
    #[error("malformed chart response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Yahoo reported an error object inside an otherwise valid envelope.
    #[error("chart api error {code}: {description}")]
    Api { code: String, description: String },

    /// `chart.result` was null or empty.
    #[error("chart response contained no result")]
    MissingResult,

    /// `indicators.quote` was empty.
    #[error("chart response contained no quote series")]
    MissingQuote,

    /// The ticker could not be placed into the endpoint url.
    #[error("invalid endpoint url: {0}")]
    Url(String),
}

/// Raised while reading [`Config`](crate::config::Config) from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, found {value:?}")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be an absolute http(s) url, found {value:?}")]
    BadEndpoint { key: &'static str, value: String },
}
