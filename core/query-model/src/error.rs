//! FILENAME: core/query-model/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate field in metadata: {0}")]
    DuplicateField(String),

    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}
