//! Merge engine
//!
//! Pure functions over bytes and record lists. The dataset service wraps
//! these with store access and per-dataset locking.
//!
//! Upload pipeline:
//! 1. Reject input without a non-blank line
//! 2. Validate the first non-blank line against the schema
//! 3. Parse all rows positionally into records
//! 4. Collapse incoming records to the first occurrence per identifier
//! 5. Append incoming records whose identifier is not already stored
//!
//! Existing records are never modified or reordered.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::csv::{self, Row};
use crate::error::{CsvError, IngestError};
use crate::identity::{IdentityPolicy, LinkIdOrNameAddress};
use crate::record::Record;
use crate::schema::Schema;
use crate::validator::SchemaValidator;

/// Counts reported back to the uploader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Incoming records appended to the dataset
    pub admitted: usize,
    /// Incoming records not admitted: repeats within the upload plus
    /// identifiers already stored
    pub skipped: usize,
    /// The part of `skipped` that repeated an earlier row of the same upload
    pub duplicates: usize,
    /// Records in the dataset after the merge
    pub total: usize,
}

/// Result of merging: the full dataset to persist plus the counts
#[derive(Debug, Clone)]
pub struct Merged {
    pub records: Vec<Record>,
    pub outcome: MergeOutcome,
}

pub struct MergeEngine {
    schema: Arc<Schema>,
    validator: SchemaValidator,
    identity: Arc<dyn IdentityPolicy>,
}

impl MergeEngine {
    /// Engine with the default identifier policy
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_identity(schema, Arc::new(LinkIdOrNameAddress))
    }

    pub fn with_identity(schema: Arc<Schema>, identity: Arc<dyn IdentityPolicy>) -> Self {
        Self {
            validator: SchemaValidator::new(Arc::clone(&schema)),
            schema,
            identity,
        }
    }

    /// Emptiness check, header validation, then the full positional parse.
    pub fn parse_upload(&self, bytes: &[u8]) -> Result<Vec<Record>, IngestError> {
        let text = csv::decode_text(bytes);

        let header_line = csv::first_non_blank_line(&text).ok_or(IngestError::EmptyInput)?;
        let header = csv::parse_rows(header_line)?
            .into_iter()
            .next()
            .map(|row| row.fields)
            .unwrap_or_default();

        if let Err(source) = self.validator.validate(&header) {
            return Err(IngestError::Schema {
                source,
                expected: self.schema.names(),
                received: header,
            });
        }

        let rows = csv::parse_rows(&text)?;
        let records = rows
            .iter()
            .skip(1)
            .map(|row| self.positional_record(row))
            .collect::<Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Err(IngestError::NoDataRows);
        }

        debug!(rows = records.len(), "Parsed upload");
        Ok(records)
    }

    fn positional_record(&self, row: &Row) -> Result<Record, CsvError> {
        if row.fields.len() != self.schema.len() {
            return Err(CsvError::FieldCount {
                line: row.line,
                expected: self.schema.len(),
                actual: row.fields.len(),
            });
        }
        let mut record = Record::default();
        for (field, value) in self.schema.fields().zip(&row.fields) {
            record.set(field, value.clone());
        }
        Ok(record)
    }

    /// Decode a stored dataset. Columns are matched by header name, so a file
    /// with reordered columns still loads; schema columns missing from the
    /// stored header load as empty text. Empty content is an empty dataset.
    pub fn decode_dataset(&self, bytes: &[u8]) -> Result<Vec<Record>, CsvError> {
        let text = csv::decode_text(bytes);
        let mut rows = csv::parse_rows(&text)?.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        let mapping: Vec<_> = self
            .schema
            .columns()
            .iter()
            .map(|col| {
                let index = header.fields.iter().position(|h| *h == col.name);
                (col.field, index)
            })
            .collect();

        rows.map(|row| {
            if row.fields.len() != header.fields.len() {
                return Err(CsvError::FieldCount {
                    line: row.line,
                    expected: header.fields.len(),
                    actual: row.fields.len(),
                });
            }
            let mut record = Record::default();
            for (field, index) in &mapping {
                if let Some(i) = index {
                    record.set(*field, row.fields[*i].clone());
                }
            }
            Ok(record)
        })
        .collect()
    }

    /// Serialize records with the schema header, columns in schema order.
    pub fn encode_dataset(&self, records: &[Record]) -> Vec<u8> {
        let mut out = self.header_csv();
        for record in records {
            csv::write_row(&mut out, self.schema.fields().map(|f| record.get(f)));
        }
        out.into_bytes()
    }

    /// Header line alone, `\n` terminated
    pub fn header_csv(&self) -> String {
        let mut out = String::new();
        csv::write_row(&mut out, self.schema.columns().iter().map(|c| c.name.as_str()));
        out
    }

    /// Keep the first record per identifier, preserving first-appearance order.
    pub fn dedup_incoming(&self, incoming: Vec<Record>) -> Vec<Record> {
        let mut seen = HashSet::new();
        incoming
            .into_iter()
            .filter(|record| seen.insert(self.identity.resolve(record).into_owned()))
            .collect()
    }

    /// Dedup incoming, admit what is not already stored, report counts.
    /// Persistence is left to the caller.
    pub fn merge(&self, existing: Vec<Record>, incoming: Vec<Record>) -> Merged {
        let incoming_count = incoming.len();
        let unique = self.dedup_incoming(incoming);
        let duplicates = incoming_count - unique.len();

        let mut known: HashSet<String> = existing
            .iter()
            .map(|r| self.identity.resolve(r).into_owned())
            .collect();

        let mut records = existing;
        let mut admitted = 0;
        for record in unique {
            if known.insert(self.identity.resolve(&record).into_owned()) {
                records.push(record);
                admitted += 1;
            }
        }

        let outcome = MergeOutcome {
            admitted,
            skipped: incoming_count - admitted,
            duplicates,
            total: records.len(),
        };
        Merged { records, outcome }
    }
}
