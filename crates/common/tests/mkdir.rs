//! Integration tests for folder creation

mod common;

use ::common::bucket::{Bucket, BucketError};
use store::{Storage, StorageConfig};

#[tokio::test]
async fn test_create_folder_at_root() {
    let (bucket, storage) = common::setup_test_env();

    bucket.create_folder("", "newdir").await.unwrap();

    let page = storage.list_page("", None).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].key, "newdir");
    assert_eq!(page.records[0].size, 0);
}

#[tokio::test]
async fn test_create_nested_folder() {
    let (bucket, storage) = common::setup_test_env();

    bucket.create_folder("", "parent").await.unwrap();
    bucket.create_folder("parent", "child").await.unwrap();

    let keys = common::all_keys(&storage).await;
    assert_eq!(keys, vec!["parent", "parent/child"]);
}

#[tokio::test]
async fn test_create_folder_strips_bucket_prefix() {
    let (bucket, storage) = common::setup_test_env();

    bucket
        .create_folder("test-bucket/docs", "sub")
        .await
        .unwrap();

    let keys = common::all_keys(&storage).await;
    assert_eq!(keys, vec!["docs/sub"]);
}

#[tokio::test]
async fn test_create_folder_rejects_bad_names() {
    let (bucket, _storage) = common::setup_test_env();

    let result = bucket.create_folder("docs", "").await;
    assert!(matches!(result, Err(BucketError::Default(_))));

    let result = bucket.create_folder("docs", "a/b").await;
    assert!(matches!(result, Err(BucketError::Default(_))));
}

#[tokio::test]
async fn test_create_folder_on_local_backend() {
    common::init_tracing();
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(StorageConfig::Local {
        path: temp_dir.path().to_path_buf(),
    })
    .await
    .unwrap();
    let bucket = Bucket::new(storage.clone(), "files");

    bucket.create_folder("", "newdir").await.unwrap();

    let page = storage.list_page("", None).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].key, "newdir");
}
