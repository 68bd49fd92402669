//! Spreadsheet webhook backend.
//!
//! A single endpoint accepts `POST {secret, action, ...}` and answers with
//! `{ok, code, error, claim, claims}`. Claims travel as plain objects, not
//! typed value wrappers. Uniqueness is enforced by the webhook, which reports
//! an existing key with code `ALREADY_EXISTS`.

use async_trait::async_trait;
use bidclaim_core::{Claim, ClaimRecord, JobId};
use bidclaim_store::{ClaimStore, CreateOutcome, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{HttpSettings, map_reqwest_error};
use crate::wire::MISSING_TIMESTAMP;

const CODE_NOT_FOUND: &str = "NOT_FOUND";
const CODE_ALREADY_EXISTS: &str = "ALREADY_EXISTS";
const CODE_CONFLICT: &str = "CONFLICT";

/// Claim store backed by a webhook guarded by a shared secret.
pub struct WebhookStore {
    client: reqwest::Client,
    url: String,
    secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookRequest<'a> {
    secret: &'a str,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<&'a Claim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_id: Option<&'a str>,
}

impl<'a> WebhookRequest<'a> {
    fn new(secret: &'a str, action: &'static str) -> Self {
        Self {
            secret,
            action,
            job_id: None,
            claim: None,
            page_size: None,
            doc_id: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WebhookResponse {
    /// HTTP status the reply arrived with.
    #[serde(skip)]
    status: u16,
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    claim: Option<WebhookClaim>,
    #[serde(default)]
    claims: Vec<WebhookClaim>,
}

impl WebhookResponse {
    fn has_code(&self, codes: &[&str]) -> bool {
        self.code.as_deref().is_some_and(|c| codes.contains(&c))
    }

    fn into_error(self) -> StoreError {
        let message = self
            .error
            .or(self.code)
            .unwrap_or_else(|| "webhook reported failure".to_string());
        StoreError::Remote {
            status: self.status,
            message,
        }
    }

    /// Decode a reply body. A non-2xx reply counts only when it carries a
    /// `code` or `error`; otherwise the raw body becomes the error message.
    fn decode(status: u16, success: bool, body: &str) -> Result<Self, StoreError> {
        let parsed = serde_json::from_str::<Self>(body);
        if success {
            let mut resp = parsed.map_err(|e| StoreError::Malformed(e.to_string()))?;
            resp.status = status;
            return Ok(resp);
        }
        match parsed {
            Ok(mut resp) if resp.code.is_some() || resp.error.is_some() => {
                resp.status = status;
                resp.ok = false;
                Ok(resp)
            }
            _ => Err(StoreError::Remote {
                status,
                message: body.to_string(),
            }),
        }
    }
}

/// A claim row as the webhook returns it; every column may be blank.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WebhookClaim {
    job_id: String,
    url: String,
    title: String,
    added_by: String,
    timestamp: String,
    owner_id: String,
    owner_email: String,
}

impl From<WebhookClaim> for ClaimRecord {
    fn from(row: WebhookClaim) -> Self {
        let timestamp = if row.timestamp.is_empty() {
            MISSING_TIMESTAMP.to_string()
        } else {
            row.timestamp
        };
        let claim = Claim {
            job_id: JobId::new_unchecked(row.job_id.clone()),
            url: row.url,
            title: row.title,
            added_by: row.added_by,
            timestamp,
            owner_id: row.owner_id,
            owner_email: row.owner_email,
        };
        ClaimRecord::new(row.job_id, claim)
    }
}

impl WebhookStore {
    pub fn new(url: &str, secret: &str, settings: HttpSettings) -> Result<Self, StoreError> {
        Ok(Self {
            client: settings.build_client()?,
            url: url.to_string(),
            secret: secret.to_string(),
        })
    }

    async fn call(&self, req: &WebhookRequest<'_>) -> Result<WebhookResponse, StoreError> {
        debug!(url = %self.url, action = req.action, "calling claim webhook");
        let resp = self
            .client
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_reqwest_error)?;
        WebhookResponse::decode(status.as_u16(), status.is_success(), &body)
    }

    async fn try_create(&self, claim: &Claim) -> Result<CreateOutcome, StoreError> {
        let mut req = WebhookRequest::new(&self.secret, "create");
        req.claim = Some(claim);
        let resp = self.call(&req).await?;
        if resp.ok {
            info!(job_id = %claim.job_id, added_by = %claim.added_by, "claim created");
            return Ok(CreateOutcome::Created);
        }
        if resp.has_code(&[CODE_ALREADY_EXISTS, CODE_CONFLICT]) {
            warn!(job_id = %claim.job_id, "claim already exists");
            return Ok(CreateOutcome::Conflict);
        }
        Err(resp.into_error())
    }
}

#[async_trait]
impl ClaimStore for WebhookStore {
    async fn get(&self, job_id: &JobId) -> Result<Option<ClaimRecord>, StoreError> {
        let mut req = WebhookRequest::new(&self.secret, "get");
        req.job_id = Some(job_id.as_str());
        let resp = self.call(&req).await?;
        if !resp.ok {
            if resp.has_code(&[CODE_NOT_FOUND]) {
                debug!(job_id = %job_id, "no claim");
                return Ok(None);
            }
            return Err(resp.into_error());
        }
        match resp.claim {
            Some(row) => {
                let record = ClaimRecord::from(row);
                info!(job_id = %job_id, added_by = %record.claim.added_by, "claim found");
                Ok(Some(record))
            }
            None => Ok(None),
        }
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
        let mut req = WebhookRequest::new(&self.secret, "list");
        req.page_size = Some(page_size);
        let resp = self.call(&req).await?;
        if !resp.ok {
            return Err(resp.into_error());
        }
        let records: Vec<ClaimRecord> = resp
            .claims
            .into_iter()
            .take(page_size)
            .map(ClaimRecord::from)
            .collect();
        info!(count = records.len(), "listed claims");
        Ok(records)
    }

    async fn delete(&self, doc_id: &str) -> Result<(), StoreError> {
        let mut req = WebhookRequest::new(&self.secret, "delete");
        req.doc_id = Some(doc_id);
        let resp = self.call(&req).await?;
        if !resp.ok {
            let err = resp.into_error();
            warn!(doc_id, error = %err, "claim delete failed");
            return Err(err);
        }
        info!(doc_id, "claim deleted");
        Ok(())
    }
}
