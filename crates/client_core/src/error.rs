use std::{fmt, path::PathBuf};

use shared::error::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("data service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("data service rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("data service returned a malformed payload: {0}")]
    Malformed(#[from] ProtocolError),
    #[error("failed to read upload file '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DataServiceError {
    pub fn user_message(&self) -> Option<&str> {
        match self {
            DataServiceError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStage {
    Catalog,
    Datasets,
}

impl fmt::Display for MetadataStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataStage::Catalog => f.write_str("catalog"),
            MetadataStage::Datasets => f.write_str("datasets"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("'{file_name}' is not a CSV file")]
    Validation { file_name: String },
    #[error("no file selected")]
    NoFileSelected,
    #[error("an upload is already in progress")]
    Busy,
    #[error("upload failed: {message}")]
    Upload { message: String },
    #[error("{stage} fetch failed: {message}")]
    MetadataFetch {
        stage: MetadataStage,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid data service endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
