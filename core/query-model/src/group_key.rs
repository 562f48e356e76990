//! FILENAME: core/query-model/src/group_key.rs
//! Hashable form of a raw cell value.
//!
//! Rows are grouped by raw value, so equal numbers, equal strings and nulls
//! must hash together while `Null` and `Text("")` stay apart.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// A normalized, hashable representation of a cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    Null,
    Boolean(bool),
    Number(OrderedFloat),
    Text(String),
}

impl From<&CellValue> for GroupKey {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Null => GroupKey::Null,
            CellValue::Boolean(b) => GroupKey::Boolean(*b),
            CellValue::Number(n) => GroupKey::Number(OrderedFloat(*n)),
            CellValue::Text(s) => GroupKey::Text(s.clone()),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other, and `-0.0` equals `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}
