//! Claim storage contract: one collection of claims keyed by job id.
//!
//! Backends implement [`ClaimStore`]. The in-memory backend lives here; the
//! HTTP backends live in `bidclaim-sync`.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::{MemoryStore, StoreOp};

use bidclaim_core::{Claim, ClaimRecord, JobId};

/// Default number of claims fetched by one `list` call.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Result of a create-if-absent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The document did not exist and now holds the claim.
    Created,
    /// Another writer already owns the key.
    Conflict,
    /// Anything else; the claim was not written.
    Failed(StoreError),
}

/// A remote collection of claims.
///
/// The store enforces key uniqueness on `create`; callers never check before
/// writing. `delete` performs no ownership check.
#[async_trait::async_trait]
pub trait ClaimStore: Send + Sync {
    /// Fetch the claim stored under `job_id`. `Ok(None)` means the job is free.
    async fn get(&self, job_id: &JobId) -> Result<Option<ClaimRecord>, StoreError>;

    /// Write `claim` under its job id unless a document with that key exists.
    async fn create(&self, claim: &Claim) -> CreateOutcome;

    /// Fetch one page of up to `page_size` claims in store order.
    async fn list(&self, page_size: usize) -> Result<Vec<ClaimRecord>, StoreError>;

    /// Remove the document stored under `doc_id`.
    async fn delete(&self, doc_id: &str) -> Result<(), StoreError>;
}
