use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("card store failed: {0}")]
    Store(String),
    #[error("card lookup timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),
    #[error("invalid narrative endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("narrative request failed: {0}")]
    Http(String),
    #[error("narrative service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("narrative response could not be parsed: {0}")]
    ResponseParsing(String),
    #[error("narrative service returned no text")]
    EmptyResponse,
    #[error("narrative generation timed out after {0:?}")]
    Timeout(Duration),
}
