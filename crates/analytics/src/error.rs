use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid request envelope: {0}")]
    Request(#[from] CoreError),
}
