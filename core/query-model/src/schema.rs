//! FILENAME: core/query-model/src/schema.rs
//! Column metadata for a query result.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use crate::error::QueryError;

/// Index into the row cells (0-based, schema order).
pub type FieldIndex = usize;

/// Describes one queried column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub index: FieldIndex,
    pub name: String,
    pub caption: String,
    /// Demographic fields hold one value per subject and belong in the page
    /// header rather than the per-visit grid.
    pub is_demographic: bool,
}

impl Field {
    /// Creates a field whose caption is its name. The index is assigned
    /// when the field is added to a [`Schema`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Field {
            index: 0,
            caption: name.clone(),
            name,
            is_demographic: false,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn demographic(mut self) -> Self {
        self.is_demographic = true;
        self
    }
}

/// Ordered field list with name lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
    by_name: FxHashMap<String, FieldIndex>,
    by_lower_name: FxHashMap<String, FieldIndex>,
}

impl Schema {
    /// Builds a schema, renumbering field indices to their position.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self, QueryError> {
        let mut schema = Schema::default();
        for field in fields {
            if schema.by_name.contains_key(&field.name) {
                return Err(QueryError::DuplicateField(field.name));
            }
            schema.push(field);
        }
        Ok(schema)
    }

    fn push(&mut self, mut field: Field) {
        let index = self.fields.len();
        field.index = index;
        self.by_name.insert(field.name.clone(), index);
        self.by_lower_name
            .entry(field.name.to_lowercase())
            .or_insert(index);
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field index by exact name, then case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<FieldIndex> {
        self.by_name
            .get(name)
            .or_else(|| self.by_lower_name.get(&name.to_lowercase()))
            .copied()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).and_then(|i| self.fields.get(i))
    }

    pub fn get(&self, index: FieldIndex) -> Option<&Field> {
        self.fields.get(index)
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = QueryError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Schema::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}
