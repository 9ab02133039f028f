//! # leadbook common library
//!
//! Schema-validated CSV ingestion for lead datasets:
//! - Fixed column schema and header validation
//! - CSV reading/writing
//! - Merge engine (dedup incoming, admit only unseen identifiers)
//! - Dataset stores (filesystem, in-memory) and per-dataset locking
//! - Dataset service tying the above together
//! - Configuration loading

pub mod config;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod identity;
pub mod locks;
pub mod merge;
pub mod record;
pub mod schema;
pub mod service;
pub mod store;
pub mod validator;

pub use dataset::DatasetName;
pub use error::{CsvError, Error, IngestError, Result, SchemaError, StoreError};
pub use merge::{MergeEngine, MergeOutcome};
pub use record::Record;
pub use schema::Schema;
pub use service::{DatasetService, Export};
pub use store::{DatasetInfo, DatasetStore, FsDatasetStore, MemoryDatasetStore};
