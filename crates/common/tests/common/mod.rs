//! Shared test utilities for bucket integration tests
#![allow(dead_code)]

use bytes::Bytes;
use common::bucket::Bucket;
use store::Storage;

pub const BUCKET_NAME: &str = "test-bucket";

/// Set up a test environment with an in-memory store and a bucket view
pub fn setup_test_env() -> (Bucket, Storage) {
    init_tracing();
    let storage = Storage::memory();
    let bucket = Bucket::new(storage.clone(), BUCKET_NAME);
    (bucket, storage)
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Seed one object with the given body.
pub async fn put_object(storage: &Storage, key: &str, body: &[u8]) {
    storage.put(key, Bytes::copy_from_slice(body)).await.unwrap();
}

/// Seed a zero-byte directory marker.
pub async fn put_marker(storage: &Storage, key: &str) {
    storage.put(key, Bytes::new()).await.unwrap();
}

/// Every key currently in the store, in listing order.
pub async fn all_keys(storage: &Storage) -> Vec<String> {
    let mut keys = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = storage.list_page("", token.as_deref()).await.unwrap();
        keys.extend(page.records.into_iter().map(|r| r.key));
        match page.next_token {
            Some(t) => token = Some(t),
            None => break,
        }
    }
    keys
}
