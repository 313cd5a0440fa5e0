use core_types::Window;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::error::ApiError),

    #[error("Window '{window}' could not be summarized: {source}")]
    Window {
        window: Window,
        #[source]
        source: analytics::AnalyticsError,
    },
}
