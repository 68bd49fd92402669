//! Document-store REST backend.
//!
//! Claims live in one collection; the job id is the document id, so the
//! store's create-with-explicit-id is the only uniqueness check needed.

use async_trait::async_trait;
use bidclaim_core::{Claim, ClaimRecord, JobId};
use bidclaim_store::{ClaimStore, CreateOutcome, StoreError};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::client::{HttpSettings, map_reqwest_error};
use crate::wire::{self, Document, ErrorResponse, ListResponse};

const ALREADY_EXISTS: &str = "ALREADY_EXISTS";

/// Claim store backed by a document-store REST API.
pub struct FirestoreStore {
    client: reqwest::Client,
    collection_url: String,
    api_key: String,
}

impl FirestoreStore {
    /// Create a client for `collection` in `project_id`.
    ///
    /// `endpoint` is the API root, e.g. `https://firestore.googleapis.com`
    /// (a trailing slash is ignored).
    pub fn new(
        endpoint: &str,
        project_id: &str,
        api_key: &str,
        collection: &str,
        settings: HttpSettings,
    ) -> Result<Self, StoreError> {
        let collection_url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            endpoint.trim_end_matches('/'),
            project_id,
            collection
        );
        Ok(Self {
            client: settings.build_client()?,
            collection_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn document_url(&self, doc_id: &str) -> String {
        format!("{}/{}", self.collection_url, doc_id)
    }

    async fn try_create(&self, claim: &Claim) -> Result<CreateOutcome, StoreError> {
        let body = wire::encode_claim(claim);
        debug!(url = %self.collection_url, job_id = %claim.job_id, "creating claim document");
        let resp = self
            .client
            .post(&self.collection_url)
            .query(&[("documentId", claim.job_id.as_str()), ("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        if status.is_success() {
            info!(job_id = %claim.job_id, added_by = %claim.added_by, "claim created");
            return Ok(CreateOutcome::Created);
        }

        let text = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_default().error;
        if status == StatusCode::CONFLICT || detail.status == ALREADY_EXISTS {
            warn!(job_id = %claim.job_id, "claim already exists");
            return Ok(CreateOutcome::Conflict);
        }
        Err(remote_error(status, detail.message, text))
    }
}

#[async_trait]
impl ClaimStore for FirestoreStore {
    async fn get(&self, job_id: &JobId) -> Result<Option<ClaimRecord>, StoreError> {
        let url = self.document_url(job_id.as_str());
        debug!(url = %url, "fetching claim document");
        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(job_id = %job_id, "no claim");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(error_from_response(resp).await);
        }

        let doc: Document = resp.json().await.map_err(map_reqwest_error)?;
        let record = wire::decode_document(&doc);
        info!(job_id = %job_id, added_by = %record.claim.added_by, "claim found");
        Ok(Some(record))
    }

    async fn create(&self, claim: &Claim) -> CreateOutcome {
        match self.try_create(claim).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(job_id = %claim.job_id, error = %err, "claim create failed");
                CreateOutcome::Failed(err)
            }
        }
    }

    async fn list(&self, page_size: usize) -> Result<Vec<ClaimRecord>, StoreError> {
        debug!(url = %self.collection_url, page_size, "listing claim documents");
        let page_size = page_size.to_string();
        let resp = self
            .client
            .get(&self.collection_url)
            .query(&[("key", self.api_key.as_str()), ("pageSize", page_size.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let page: ListResponse = resp.json().await.map_err(map_reqwest_error)?;
        let records: Vec<ClaimRecord> = page.documents.iter().map(wire::decode_document).collect();
        info!(count = records.len(), "listed claims");
        Ok(records)
    }

    async fn delete(&self, doc_id: &str) -> Result<(), StoreError> {
        let url = self.document_url(doc_id);
        debug!(url = %url, "deleting claim document");
        let resp = self
            .client
            .delete(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !resp.status().is_success() {
            let err = error_from_response(resp).await;
            warn!(doc_id, error = %err, "claim delete failed");
            return Err(err);
        }
        info!(doc_id, "claim deleted");
        Ok(())
    }
}

async fn error_from_response(resp: reqwest::Response) -> StoreError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_default().error;
    remote_error(status, detail.message, text)
}

/// Prefer the store's own message; fall back to the raw body, then the status text.
fn remote_error(status: StatusCode, message: String, body: String) -> StoreError {
    let message = if !message.is_empty() {
        message
    } else if !body.trim().is_empty() {
        body
    } else {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    };
    StoreError::Remote {
        status: status.as_u16(),
        message,
    }
}
