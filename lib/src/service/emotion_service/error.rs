use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("emotion service did not respond within {0:?}")]
    Timeout(Duration),
    #[error("emotion service request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("emotion service returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("malformed emotion service response: {0}")]
    MalformedResponse(String),
}

impl ClassificationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClassificationError::Timeout(_))
    }
}
