//! Filesystem-backed dataset store
//!
//! One file per dataset under a root folder. Writes land in a temporary file
//! next to the target and are renamed over it, so readers see either the old
//! or the new content.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{DatasetInfo, DatasetStore};
use crate::dataset::{DatasetName, DATASET_EXTENSION};
use crate::error::StoreError;

const TMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Clone)]
pub struct FsDatasetStore {
    root: PathBuf,
}

impl FsDatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &DatasetName) -> PathBuf {
        self.root.join(name.as_str())
    }
}

#[async_trait]
impl DatasetStore for FsDatasetStore {
    async fn read(&self, name: &DatasetName) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, name: &DatasetName, contents: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(name);
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = name.attachment_name();
        let tmp = dir.join(format!(".{}.{}{}", file_name, Uuid::new_v4().simple(), TMP_SUFFIX));

        if let Err(e) = tokio::fs::write(&tmp, &contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            warn!(tmp = %tmp.display(), error = %e, "Rename failed, removing temporary file");
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), bytes = contents.len(), "Dataset written");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DatasetInfo>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut datasets = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(DATASET_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            datasets.push(DatasetInfo {
                name,
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        datasets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(datasets)
    }
}
