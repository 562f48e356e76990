//! FILENAME: core/report-engine/src/definition.rs
//! Report Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a participant report:
//! which field breaks pages, which fields form the inner grid, and how the
//! grid is oriented. Fields are referenced by name and resolved against the
//! query schema at run time, so one definition survives column reordering.

use serde::{Deserialize, Serialize};
use query_model::{Field, Schema};
use crate::error::ReportError;

/// Unique identifier for a saved report.
pub type ReportId = u32;

// ============================================================================
// ORIENTATION
// ============================================================================

/// Which axis of the inner grid carries the time points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// One grid row per page row (time points run down).
    Original,
    /// One grid row per grid field, one column per page row.
    Transposed,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Original
    }
}

// ============================================================================
// KEY LINKS
// ============================================================================

/// How page keys are linked and masked when the query did not supply a url
/// or display value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyLinkOptions {
    /// Link target; `{key}` is replaced by the encoded raw key value.
    pub url_template: String,

    /// Replace missing display values with an opaque alias.
    #[serde(default)]
    pub demo_mode: bool,

    /// Alias prefix used in demo mode (followed by the 1-based page number).
    #[serde(default = "default_alias_prefix")]
    pub alias_prefix: String,
}

fn default_alias_prefix() -> String {
    "Participant ".to_string()
}

impl KeyLinkOptions {
    pub fn new(url_template: impl Into<String>) -> Self {
        KeyLinkOptions {
            url_template: url_template.into(),
            demo_mode: false,
            alias_prefix: default_alias_prefix(),
        }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete, serializable definition of a participant report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    pub id: ReportId,

    #[serde(default)]
    pub name: Option<String>,

    /// Page fields by name. The first one breaks pages; the rest are shown
    /// once per page in the header.
    pub page_fields: Vec<String>,

    /// Grid fields by name. Empty means every non-page, non-demographic field.
    #[serde(default)]
    pub grid_fields: Vec<String>,

    /// Append demographic schema fields not already listed to the page fields.
    #[serde(default)]
    pub hoist_demographics: bool,

    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default)]
    pub key_link: Option<KeyLinkOptions>,

    /// Bumped on every filter or sort change.
    #[serde(default)]
    pub version: u64,
}

/// Page and grid fields resolved against a query schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    pub page_fields: Vec<Field>,
    pub grid_fields: Vec<Field>,
}

impl ReportDefinition {
    pub fn new(id: ReportId, page_field: impl Into<String>) -> Self {
        ReportDefinition {
            id,
            name: None,
            page_fields: vec![page_field.into()],
            grid_fields: Vec::new(),
            hoist_demographics: false,
            orientation: Orientation::Original,
            key_link: None,
            version: 0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Increments the version (marks previously rendered output stale).
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn is_transposed(&self) -> bool {
        self.orientation == Orientation::Transposed
    }

    /// Resolves field names against the schema.
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedFields, ReportError> {
        if self.page_fields.is_empty() {
            return Err(ReportError::MissingPageBreak);
        }

        let mut page_fields = lookup_all(schema, &self.page_fields)?;

        if self.hoist_demographics {
            for field in schema.fields() {
                if field.is_demographic && !page_fields.iter().any(|f| f.index == field.index) {
                    page_fields.push(field.clone());
                }
            }
        }

        let grid_fields = if self.grid_fields.is_empty() {
            schema
                .fields()
                .iter()
                .filter(|f| !f.is_demographic && !page_fields.iter().any(|p| p.index == f.index))
                .cloned()
                .collect()
        } else {
            lookup_all(schema, &self.grid_fields)?
        };

        Ok(ResolvedFields { page_fields, grid_fields })
    }
}

fn lookup_all(schema: &Schema, names: &[String]) -> Result<Vec<Field>, ReportError> {
    names
        .iter()
        .map(|name| {
            schema
                .field(name)
                .cloned()
                .ok_or_else(|| ReportError::FieldNotFound(name.clone()))
        })
        .collect()
}
