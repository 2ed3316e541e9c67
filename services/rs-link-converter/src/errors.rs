//!
//! src/errors.rs  Andrew Belles  Oct 18th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the converter uses
//!
//!

use thiserror::Error;

use crate::types::StreamingPlatform;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("no access token available for {0}")]
    Auth(StreamingPlatform),
    #[error("{platform} responded with status {status}")]
    Upstream { platform: StreamingPlatform, status: u16 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no match: {0}")]
    NoMatch(String),
    #[error("invalid link: {0}")]
    InvalidLink(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for ConvertError {
    fn from(e: reqwest::Error) -> Self { ConvertError::Http(e.to_string()) }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self {
        ConvertError::MalformedResponse(e.to_string())
    }
}
