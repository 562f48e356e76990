//! FILENAME: core/query-model/src/result.rs
//! PURPOSE: Rows and the full query result.
//! CONTEXT: Rows are read-only once ingested. Each row holds exactly one
//! cell per schema field, in schema order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::cell::{Cell, CellValue};
use crate::error::QueryError;
use crate::schema::{Field, FieldIndex, Schema};

/// One query result row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }

    pub fn get(&self, index: FieldIndex) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn get_named(&self, schema: &Schema, name: &str) -> Option<&Cell> {
        schema.index_of(name).and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A fully materialized query result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

// ============================================================================
// JSON INGESTION
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    meta_data: RawMetaData,
    #[serde(default)]
    rows: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawMetaData {
    fields: Vec<RawField>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    is_demographic: bool,
}

impl QueryResult {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        QueryResult { schema, rows }
    }

    /// Parses a select-rows style response:
    ///
    /// ```json
    /// { "metaData": { "fields": [ { "name": "Subject" } ] },
    ///   "rows": [ { "Subject": { "value": "A", "url": "/p/A" } } ] }
    /// ```
    ///
    /// Row entries may be cell objects or bare scalars. A field missing from
    /// a row object becomes a null cell; keys outside the schema are ignored.
    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        let raw: RawResponse = serde_json::from_str(json)?;

        let schema = Schema::new(raw.meta_data.fields.into_iter().map(|f| {
            let mut field = Field::new(f.name);
            if let Some(caption) = f.caption {
                field = field.with_caption(caption);
            }
            field.is_demographic = f.is_demographic;
            field
        }))?;

        let rows = raw
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, map)| row_from_map(&schema, i, map))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult { schema, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn row_from_map(
    schema: &Schema,
    row_index: usize,
    mut map: Map<String, Value>,
) -> Result<Row, QueryError> {
    let mut cells = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let cell = match map.remove(&field.name) {
            None | Some(Value::Null) => Cell::null(),
            Some(obj @ Value::Object(_)) => {
                serde_json::from_value::<Cell>(obj).map_err(|e| QueryError::InvalidRow {
                    row: row_index,
                    reason: format!("field '{}': {}", field.name, e),
                })?
            }
            Some(Value::Array(_)) => {
                return Err(QueryError::InvalidRow {
                    row: row_index,
                    reason: format!("field '{}' holds an array", field.name),
                });
            }
            Some(scalar) => {
                let value: CellValue = serde_json::from_value(scalar)?;
                Cell::new(value)
            }
        };
        cells.push(cell);
    }
    Ok(Row::new(cells))
}
