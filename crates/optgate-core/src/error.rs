//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptgateError {
    #[error("PARSE/{0}")]
    ParseError(String),

    #[error("SCHEMA/{0}")]
    SchemaError(String),

    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("IO/{0}")]
    IoError(String),

    #[error("HASH/{0}")]
    HashError(String),
}

impl From<serde_json::Error> for OptgateError {
    fn from(err: serde_json::Error) -> Self {
        OptgateError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for OptgateError {
    fn from(err: std::io::Error) -> Self {
        OptgateError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OptgateError>;
