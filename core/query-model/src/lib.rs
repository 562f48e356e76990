//! FILENAME: core/query-model/src/lib.rs
//! Query result model for the report engine.
//!
//! A query result arrives as rows of cells plus column metadata. This crate
//! holds those types and the JSON ingestion for select-rows style responses.
//! It knows nothing about pages or rendering.

pub mod cell;
pub mod error;
pub mod group_key;
pub mod result;
pub mod schema;

pub use cell::{Cell, CellValue};
pub use error::QueryError;
pub use group_key::{GroupKey, OrderedFloat};
pub use result::{QueryResult, Row};
pub use schema::{Field, FieldIndex, Schema};
