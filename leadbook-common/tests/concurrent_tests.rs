//! Integration tests for concurrent uploads
//!
//! Merges into one dataset must serialize; otherwise two uploads read the
//! same snapshot and the later write drops the earlier admissions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leadbook_common::{
    DatasetInfo, DatasetName, DatasetService, DatasetStore, FsDatasetStore, MemoryDatasetStore,
    Schema, StoreError,
};
use tempfile::TempDir;
use tokio::task::JoinSet;

const HEADER: &str = "Name,Phone,Website,Rating,Reviews,Category,Address,System_Link_ID\n";

fn upload_for(task: usize, rows: usize) -> Vec<u8> {
    let mut out = String::from(HEADER);
    for row in 0..rows {
        out.push_str(&format!(
            "Biz {task}-{row},555-{task:04},,4.0,1,Cafe,{row} Main St,T{task}R{row}\n"
        ));
    }
    out.into_bytes()
}

/// Memory store whose reads yield before returning, widening the window in
/// which an unserialized merge would interleave.
#[derive(Default)]
struct SlowReadStore {
    inner: MemoryDatasetStore,
}

#[async_trait]
impl DatasetStore for SlowReadStore {
    async fn read(&self, name: &DatasetName) -> Result<Option<Vec<u8>>, StoreError> {
        let bytes = self.inner.read(name).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        bytes
    }

    async fn write(&self, name: &DatasetName, contents: Vec<u8>) -> Result<(), StoreError> {
        self.inner.write(name, contents).await
    }

    async fn list(&self) -> Result<Vec<DatasetInfo>, StoreError> {
        self.inner.list().await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_same_dataset_lose_nothing() {
    let service = Arc::new(DatasetService::new(
        Arc::new(Schema::standard()),
        Arc::new(SlowReadStore::default()),
    ));
    let name = DatasetName::new("leads");

    let mut join_set = JoinSet::new();
    for task in 0..10 {
        let service = Arc::clone(&service);
        let name = name.clone();
        join_set.spawn(async move {
            service
                .upload(&upload_for(task, 5), &name, None)
                .await
                .unwrap_or_else(|e| panic!("Task {} failed: {}", task, e))
        });
    }

    let mut admitted = 0;
    while let Some(result) = join_set.join_next().await {
        admitted += result.expect("Task panicked").admitted;
    }

    assert_eq!(admitted, 50);
    assert_eq!(service.fetch(&name).await.unwrap().len(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_uploads_admit_once() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(DatasetService::new(
        Arc::new(Schema::standard()),
        Arc::new(FsDatasetStore::new(dir.path())),
    ));
    let name = DatasetName::new("leads");
    let input = Arc::new(upload_for(0, 20));

    let mut join_set = JoinSet::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let name = name.clone();
        let input = Arc::clone(&input);
        join_set.spawn(async move { service.upload(&input, &name, None).await.unwrap() });
    }

    let mut outcomes = Vec::new();
    while let Some(result) = join_set.join_next().await {
        outcomes.push(result.expect("Task panicked"));
    }

    let admitted: usize = outcomes.iter().map(|o| o.admitted).sum();
    assert_eq!(admitted, 20, "each identifier admitted exactly once");
    assert!(outcomes.iter().all(|o| o.total == 20));
    assert_eq!(service.fetch(&name).await.unwrap().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_datasets_merge_independently() {
    let service = Arc::new(DatasetService::new(
        Arc::new(Schema::standard()),
        Arc::new(SlowReadStore::default()),
    ));

    let mut join_set = JoinSet::new();
    for task in 0..6 {
        let service = Arc::clone(&service);
        join_set.spawn(async move {
            let name = DatasetName::new(format!("city-{task}"));
            service.upload(&upload_for(task, 3), &name, None).await.unwrap();
            name
        });
    }

    while let Some(result) = join_set.join_next().await {
        let name = result.expect("Task panicked");
        assert_eq!(service.fetch(&name).await.unwrap().len(), 3);
    }
    assert_eq!(service.list().await.unwrap().len(), 6);
}
