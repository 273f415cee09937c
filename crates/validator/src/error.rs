use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidatorError>;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
