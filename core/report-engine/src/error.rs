//! FILENAME: core/report-engine/src/error.rs

use query_model::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Report has no page-break field")]
    MissingPageBreak,

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
