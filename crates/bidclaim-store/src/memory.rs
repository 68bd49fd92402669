//! Process-local claim store.
//!
//! Holds claims in insertion order behind a tokio mutex. The key check and
//! the insert happen under one lock acquisition, which gives `create` the
//! same first-writer-wins guarantee a remote document store provides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bidclaim_core::{Claim, ClaimRecord, JobId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{ClaimStore, CreateOutcome, StoreError};

/// Operation selector for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Create,
    List,
    Delete,
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ClaimRecord>>,
    failures: Mutex<HashMap<StoreOp, StoreError>>,
    get_calls: AtomicU64,
    create_calls: AtomicU64,
    list_calls: AtomicU64,
    delete_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store already holding `claims`, keyed by their job ids.
    pub fn with_claims(claims: impl IntoIterator<Item = Claim>) -> Self {
        let records = claims
            .into_iter()
            .map(|c| ClaimRecord::new(c.job_id.to_string(), c))
            .collect();
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Make the next call of `op` fail with `err`.
    pub async fn fail_next(&self, op: StoreOp, err: StoreError) {
        self.failures.lock().await.insert(op, err);
    }

    /// Number of calls made to `op` so far, failed ones included.
    pub fn calls(&self, op: StoreOp) -> u64 {
        self.counter(op).load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    fn counter(&self, op: StoreOp) -> &AtomicU64 {
        match op {
            StoreOp::Get => &self.get_calls,
            StoreOp::Create => &self.create_calls,
            StoreOp::List => &self.list_calls,
            StoreOp::Delete => &self.delete_calls,
        }
    }

    async fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        self.counter(op).fetch_add(1, Ordering::Relaxed);
        match self.failures.lock().await.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn get(&self, job_id: &JobId) -> Result<Option<ClaimRecord>, StoreError> {
        self.enter(StoreOp::Get).await?;
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.doc_id == job_id.as_str()).cloned())
    }

    async fn create(&self, claim: &Claim) -> CreateOutcome {
        if let Err(err) = self.enter(StoreOp::Create).await {
            return CreateOutcome::Failed(err);
        }
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.doc_id == claim.job_id.as_str()) {
            warn!(job_id = %claim.job_id, "claim already exists");
            return CreateOutcome::Conflict;
        }
        records.push(ClaimRecord::new(claim.job_id.as_str(), claim.clone()));
        info!(job_id = %claim.job_id, added_by = %claim.added_by, "claim created");
        CreateOutcome::Created
    }

    async fn list(&self, page_size: usize) -> Result<Vec<ClaimRecord>, StoreError> {
        self.enter(StoreOp::List).await?;
        let records = self.records.lock().await;
        let page: Vec<ClaimRecord> = records.iter().take(page_size).cloned().collect();
        debug!(count = page.len(), page_size, "listed claims");
        Ok(page)
    }

    async fn delete(&self, doc_id: &str) -> Result<(), StoreError> {
        self.enter(StoreOp::Delete).await?;
        let mut records = self.records.lock().await;
        records.retain(|r| r.doc_id != doc_id);
        info!(doc_id, "claim deleted");
        Ok(())
    }
}
