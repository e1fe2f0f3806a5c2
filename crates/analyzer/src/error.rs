use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] core_types::CoreError),

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(#[from] configuration::error::ConfigError),

    #[error("Invalid risk configuration: {0}")]
    Risk(#[from] risk::RiskError),
}

impl From<analytics::AnalyticsError> for AnalyzerError {
    fn from(err: analytics::AnalyticsError) -> Self {
        match err {
            analytics::AnalyticsError::Request(core) => AnalyzerError::InvalidRequest(core),
        }
    }
}
