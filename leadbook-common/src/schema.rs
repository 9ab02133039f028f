//! The fixed column contract shared by validation, parsing and serialization
//!
//! A `Schema` is built once at startup and handed out behind an `Arc`; nothing
//! in the crate derives columns from input data.

use crate::record::Field;

/// Column names of the standard lead schema, in order
pub const STANDARD_COLUMNS: [&str; 8] = [
    "Name",
    "Phone",
    "Website",
    "Rating",
    "Reviews",
    "Category",
    "Address",
    "System_Link_ID",
];

/// One column of the schema: its header name and the record field it fills
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub field: Field,
}

/// Ordered, immutable column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// The standard eight-column lead schema
    pub fn standard() -> Self {
        let columns = STANDARD_COLUMNS
            .iter()
            .zip(Field::ALL)
            .map(|(name, field)| Column {
                name: (*name).to_string(),
                field,
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header names in order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.iter().map(|c| c.field)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::standard()
    }
}
