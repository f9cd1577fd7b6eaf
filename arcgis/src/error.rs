use thiserror::Error;
use worksheet::WorksheetError;

#[derive(Error, Debug)]
pub enum GisError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("malformed response, {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid address '{0}', include house number and street name")]
    Address(String),

    #[error("invalid APN '{0}', expected digits")]
    Apn(String),

    #[error("{0}")]
    Worksheet(#[from] WorksheetError),
}
