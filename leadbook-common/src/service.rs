//! Dataset service: upload, fetch, export and list over an injected store
//!
//! Uploads are validated and parsed before the dataset lock is taken, so a
//! rejected file never touches the store. The read-merge-write sequence runs
//! under the per-dataset lock; a failure anywhere in it leaves the stored
//! dataset as it was.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dataset::DatasetName;
use crate::error::IngestError;
use crate::locks::DatasetLocks;
use crate::merge::{MergeEngine, MergeOutcome};
use crate::record::Record;
use crate::schema::Schema;
use crate::store::{DatasetInfo, DatasetStore};

/// Serialized dataset ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct DatasetService {
    engine: MergeEngine,
    store: Arc<dyn DatasetStore>,
    locks: DatasetLocks,
}

impl DatasetService {
    pub fn new(schema: Arc<Schema>, store: Arc<dyn DatasetStore>) -> Self {
        Self::with_engine(MergeEngine::new(schema), store)
    }

    pub fn with_engine(engine: MergeEngine, store: Arc<dyn DatasetStore>) -> Self {
        Self {
            engine,
            store,
            locks: DatasetLocks::new(),
        }
    }

    /// Validate `bytes`, merge them into `name` and persist the result.
    ///
    /// `max_bytes` is an optional ceiling supplied by the caller; the service
    /// imposes none of its own.
    pub async fn upload(
        &self,
        bytes: &[u8],
        name: &DatasetName,
        max_bytes: Option<usize>,
    ) -> Result<MergeOutcome, IngestError> {
        if let Some(limit) = max_bytes {
            if bytes.len() > limit {
                return Err(IngestError::TooLarge {
                    limit,
                    actual: bytes.len(),
                });
            }
        }

        let incoming = self.engine.parse_upload(bytes).inspect_err(|e| {
            debug!(dataset = %name, error = %e, "Upload rejected");
        })?;

        let _guard = self.locks.acquire(name).await;

        let existing = self.load(name).await?;
        let existing_count = existing.len();
        let merged = self.engine.merge(existing, incoming);

        let encoded = self.engine.encode_dataset(&merged.records);
        self.store
            .write(name, encoded)
            .await
            .map_err(|source| IngestError::StoreWrite {
                dataset: name.to_string(),
                source,
            })?;

        let outcome = merged.outcome;
        info!(
            dataset = %name,
            existing = existing_count,
            admitted = outcome.admitted,
            skipped = outcome.skipped,
            duplicates = outcome.duplicates,
            total = outcome.total,
            "Upload merged"
        );
        Ok(outcome)
    }

    /// Records of `name` in stored order; empty when the dataset is absent.
    pub async fn fetch(&self, name: &DatasetName) -> Result<Vec<Record>, IngestError> {
        self.load(name).await
    }

    /// Stored bytes of `name`, or the header line alone when absent.
    pub async fn export(&self, name: &DatasetName) -> Result<Export, IngestError> {
        let bytes = match self.read(name).await? {
            Some(bytes) => bytes,
            None => self.engine.header_csv().into_bytes(),
        };
        Ok(Export {
            file_name: name.attachment_name().to_string(),
            bytes,
        })
    }

    pub async fn list(&self) -> Result<Vec<DatasetInfo>, IngestError> {
        self.store
            .list()
            .await
            .map_err(|source| IngestError::StoreRead {
                dataset: String::from("*"),
                source,
            })
    }

    async fn read(&self, name: &DatasetName) -> Result<Option<Vec<u8>>, IngestError> {
        self.store
            .read(name)
            .await
            .map_err(|source| IngestError::StoreRead {
                dataset: name.to_string(),
                source,
            })
    }

    async fn load(&self, name: &DatasetName) -> Result<Vec<Record>, IngestError> {
        let Some(bytes) = self.read(name).await? else {
            debug!(dataset = %name, "Dataset absent, treating as empty");
            return Ok(Vec::new());
        };
        self.engine.decode_dataset(&bytes).map_err(|source| {
            warn!(dataset = %name, error = %source, "Stored dataset failed to parse");
            IngestError::CorruptDataset {
                dataset: name.to_string(),
                source,
            }
        })
    }
}
