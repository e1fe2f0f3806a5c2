use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("Failed to decode catalog payload: {0}")]
    Catalog(String),
}
