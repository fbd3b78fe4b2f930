use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("preview row {row} has columns {found:?}, expected {expected:?}")]
    RaggedPreviewRow {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("preview column '{column}' is not an index-to-value object")]
    MalformedPreviewColumn { column: String },
    #[error("preview column '{column}' does not cover the same row indices as '{first}'")]
    MisalignedPreviewColumn { column: String, first: String },
    #[error("dataset for element '{element}' is malformed: {reason}")]
    MalformedDataset { element: String, reason: String },
    #[error("dataset for element '{element}' has no series")]
    EmptySeries { element: String },
    #[error(
        "dataset for element '{element}' series {series} has {found} values for {expected} labels"
    )]
    MisalignedSeries {
        element: String,
        series: usize,
        expected: usize,
        found: usize,
    },
}
