//! FILENAME: core/query-model/src/cell.rs
//! PURPOSE: A single value read from a query result.
//! CONTEXT: Every cell carries the raw value used for grouping, plus the
//! optional display string and navigation link supplied by the server.

use serde::{Deserialize, Serialize};

/// The raw value of a query result cell.
///
/// Deserialized untagged so plain JSON scalars map directly:
/// `null`, `true`, `10`, `"A"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Formats the raw value as text, the way it would appear without a
    /// server-supplied display value.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

/// One cell of a query result row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Cell {
            value: value.into(),
            display_value: None,
            url: None,
        }
    }

    pub fn null() -> Self {
        Cell::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Cell::new(CellValue::Text(text.into()))
    }

    pub fn number(num: f64) -> Self {
        Cell::new(CellValue::Number(num))
    }

    pub fn boolean(value: bool) -> Self {
        Cell::new(CellValue::Boolean(value))
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display_value = Some(display.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Returns the server display value if present, else the formatted raw value.
    pub fn display_text(&self) -> String {
        match &self.display_value {
            Some(display) => display.clone(),
            None => self.value.to_display_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_json_forms() {
        let cell: Cell = serde_json::from_str(r#"{"value": 10, "displayValue": "ten"}"#).unwrap();
        assert_eq!(cell.value, CellValue::Number(10.0));
        assert_eq!(cell.display_value.as_deref(), Some("ten"));
        assert_eq!(cell.url, None);

        let cell: Cell = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert!(cell.is_null());

        let cell: Cell = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(cell.value, CellValue::Text(String::new()));
        assert!(!cell.is_null());

        let cell: Cell = serde_json::from_str(r#"{"url": "/x"}"#).unwrap();
        assert!(cell.is_null());
        assert_eq!(cell.url.as_deref(), Some("/x"));
    }

    #[test]
    fn test_display_text_prefers_display_value() {
        assert_eq!(Cell::number(3.0).display_text(), "3");
        assert_eq!(Cell::number(2.5).display_text(), "2.5");
        assert_eq!(Cell::boolean(true).display_text(), "true");
        assert_eq!(Cell::null().display_text(), "");
        assert_eq!(Cell::text("PT-1").with_display("Participant 1").display_text(), "Participant 1");
    }

    #[test]
    fn test_null_serializes_as_json_null() {
        let json = serde_json::to_string(&Cell::null()).unwrap();
        assert_eq!(json, r#"{"value":null}"#);
    }
}
