//! Batch result store
//!
//! Results are written once at batch completion and looked up by a digest of
//! the requested coordinates. Concurrent batches with the same key are not
//! deduplicated: the last write wins.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared::{BatchResult, Coordinate};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Storage for completed batch results
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn put(&self, result_id: String, result: BatchResult);

    async fn get(&self, result_id: &str) -> Option<BatchResult>;
}

/// Deterministic identifier for a coordinate list (lowercase hex SHA-256)
pub fn result_id(coordinates: &[Coordinate]) -> AppResult<String> {
    let encoded = serde_json::to_vec(coordinates)
        .map_err(|e| AppError::ProcessingFailed(format!("could not encode request: {}", e)))?;
    Ok(format!("{:x}", Sha256::digest(&encoded)))
}

/// Process-local store; lives until restart
#[derive(Default)]
pub struct InMemoryResultStore {
    capacity: Option<usize>,
    inner: RwLock<Entries>,
}

#[derive(Default)]
struct Entries {
    results: HashMap<String, BatchResult>,
    insertion_order: VecDeque<String>,
}

impl InMemoryResultStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store evicting the oldest result once `capacity` is exceeded
    ///
    /// A capacity of zero could never retain a result and is treated as unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.filter(|&c| c > 0),
            inner: RwLock::default(),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.results.len()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn put(&self, result_id: String, result: BatchResult) {
        let mut entries = self.inner.write().await;

        if entries.results.insert(result_id.clone(), result).is_some() {
            return;
        }
        entries.insertion_order.push_back(result_id);

        if let Some(capacity) = self.capacity {
            while entries.results.len() > capacity {
                let Some(oldest) = entries.insertion_order.pop_front() else {
                    break;
                };
                entries.results.remove(&oldest);
                tracing::debug!("Evicted batch result {}", oldest);
            }
        }
    }

    async fn get(&self, result_id: &str) -> Option<BatchResult> {
        self.inner.read().await.results.get(result_id).cloned()
    }
}
