//! Dataset storage
//!
//! The merge path only needs "read bytes or learn the dataset is absent" and
//! "replace bytes". Both implementations make a successful write visible in
//! full to every later read.

mod fs;
mod memory;

pub use fs::FsDatasetStore;
pub use memory::MemoryDatasetStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::DatasetName;
use crate::error::StoreError;

/// A dataset present in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// `Ok(None)` when the dataset has never been written
    async fn read(&self, name: &DatasetName) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the dataset's content
    async fn write(&self, name: &DatasetName, contents: Vec<u8>) -> Result<(), StoreError>;

    /// Datasets currently present, sorted by name
    async fn list(&self) -> Result<Vec<DatasetInfo>, StoreError>;
}
