//! Document-store wire format.
//!
//! Every field travels inside a typed value wrapper:
//! `{"fields": {"addedBy": {"stringValue": "Alex"}}}`. Claims are wrapped on
//! write and unwrapped on read, with absent fields falling back to defaults.

use std::collections::BTreeMap;

use bidclaim_core::{Claim, ClaimRecord, JobId};
use serde::{Deserialize, Serialize};

/// Timestamp assumed for documents that carry none.
pub const MISSING_TIMESTAMP: &str = "1970-01-01";

// Owner field names used by older documents.
const LEGACY_OWNER_ID: &str = "googleUserId";
const LEGACY_OWNER_EMAIL: &str = "googleEmail";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource path, e.g. `projects/p/databases/(default)/documents/bids/~01`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            string_value: Some(s.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl Document {
    /// Last segment of the resource path.
    pub fn doc_id(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|n| n.rsplit('/').next())
            .filter(|id| !id.is_empty())
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.string_value.as_deref())
    }
}

/// Wrap a claim into a document body for a create request.
pub fn encode_claim(claim: &Claim) -> Document {
    let fields = [
        ("url", claim.url.as_str()),
        ("title", claim.title.as_str()),
        ("addedBy", claim.added_by.as_str()),
        ("jobId", claim.job_id.as_str()),
        ("timestamp", claim.timestamp.as_str()),
        ("ownerId", claim.owner_id.as_str()),
        ("ownerEmail", claim.owner_email.as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), Value::string(v)))
    .collect();
    Document { name: None, fields }
}

/// Unwrap a document into a claim record.
///
/// The record key comes from the document name; documents without a name
/// fall back to their `jobId` field.
pub fn decode_document(doc: &Document) -> ClaimRecord {
    let text = |key: &str| doc.string_field(key).unwrap_or_default().to_string();
    let job_id = text("jobId");
    let owner_id = doc
        .string_field("ownerId")
        .or_else(|| doc.string_field(LEGACY_OWNER_ID))
        .unwrap_or_default()
        .to_string();
    let owner_email = doc
        .string_field("ownerEmail")
        .or_else(|| doc.string_field(LEGACY_OWNER_EMAIL))
        .unwrap_or_default()
        .to_string();
    let timestamp = doc
        .string_field("timestamp")
        .unwrap_or(MISSING_TIMESTAMP)
        .to_string();

    let doc_id = doc.doc_id().map(str::to_string).unwrap_or_else(|| job_id.clone());
    let claim = Claim {
        job_id: JobId::new_unchecked(job_id),
        url: text("url"),
        title: text("title"),
        added_by: text("addedBy"),
        timestamp,
        owner_id,
        owner_email,
    };
    ClaimRecord::new(doc_id, claim)
}
