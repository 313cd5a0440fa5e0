use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error while {context}: {message}")]
    Transport { context: String, message: String },

    #[error("No symbol found for identifier: {0}")]
    NotFound(String),

    #[error("No historical data found for `{symbol}` between {start} and {end}.")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Malformed response from API: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    pub(crate) fn transport(context: impl Into<String>, message: impl ToString) -> Self {
        ApiError::Transport {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
