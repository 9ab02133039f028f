//! Header validation against the fixed schema

use std::sync::Arc;

use crate::error::SchemaError;
use crate::schema::Schema;

/// Checks an incoming header row before any data row is looked at
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<Schema>,
}

impl SchemaValidator {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Exact, case-sensitive, order-sensitive comparison. Stops at the first
    /// mismatching position.
    pub fn validate<S: AsRef<str>>(&self, header: &[S]) -> Result<(), SchemaError> {
        let expected = self.schema.columns();
        if header.len() != expected.len() {
            return Err(SchemaError::ColumnCountMismatch {
                expected: expected.len(),
                actual: header.len(),
            });
        }

        for (i, (column, actual)) in expected.iter().zip(header).enumerate() {
            let actual = actual.as_ref();
            if column.name != actual {
                return Err(SchemaError::ColumnMismatch {
                    position: i + 1,
                    expected: column.name.clone(),
                    actual: actual.to_string(),
                });
            }
        }

        Ok(())
    }
}
