//! In-memory dataset store

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DatasetInfo, DatasetStore};
use crate::dataset::DatasetName;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryDatasetStore {
    datasets: RwLock<BTreeMap<DatasetName, (Vec<u8>, DateTime<Utc>)>>,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    async fn read(&self, name: &DatasetName) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.datasets.read().await.get(name).map(|(bytes, _)| bytes.clone()))
    }

    async fn write(&self, name: &DatasetName, contents: Vec<u8>) -> Result<(), StoreError> {
        self.datasets
            .write()
            .await
            .insert(name.clone(), (contents, Utc::now()));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DatasetInfo>, StoreError> {
        Ok(self
            .datasets
            .read()
            .await
            .iter()
            .map(|(name, (bytes, modified))| DatasetInfo {
                name: name.to_string(),
                size_bytes: bytes.len() as u64,
                modified: Some(*modified),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absence_differs_from_empty() {
        let store = MemoryDatasetStore::new();
        let name = DatasetName::new("leads");
        assert_eq!(store.read(&name).await.unwrap(), None);

        store.write(&name, Vec::new()).await.unwrap();
        assert_eq!(store.read(&name).await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = MemoryDatasetStore::new();
        store.write(&DatasetName::new("zeta"), b"z".to_vec()).await.unwrap();
        store.write(&DatasetName::new("alpha"), b"aa".to_vec()).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].name, "alpha.csv");
        assert_eq!(listed[0].size_bytes, 2);
        assert_eq!(listed[1].name, "zeta.csv");
    }
}
