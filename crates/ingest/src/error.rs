use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to parse HAR JSON: {0}")]
    HarParse(#[from] serde_json::Error),

    #[error("Invalid seed URL: {0}")]
    InvalidSeedUrl(String),
}
