//! Recent-claims dashboard.
//!
//! Fetches one bounded page of claims, keeps them newest first, and reveals
//! them in growing windows without further requests. Delete buttons are a
//! display hint only: they appear for the signed-in owner on the day the
//! claim was made, and the store itself does not check either condition.

use std::fmt::Display;
use std::sync::Arc;

use bidclaim_core::{BadgeColor, Claim, ClaimRecord, Identity, JobId, badge_color, parse_timestamp};
use bidclaim_host::IdentityBridge;
use bidclaim_store::{ClaimStore, DEFAULT_PAGE_SIZE, StoreError};
use chrono::{DateTime, TimeZone};
use thiserror::Error;
use tracing::{info, warn};

pub const INITIAL_WINDOW: usize = 12;
pub const WINDOW_STEP: usize = 10;
/// Word the user must type before a delete is enabled.
pub const CONFIRM_WORD: &str = "delete";

const EMPTY_MESSAGE: &str = "Inbox is empty.";
const LOAD_ERROR_MESSAGE: &str = "Error: Failed to connect to database.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardStatus {
    /// Nothing fetched yet.
    Idle,
    Loaded,
    Empty,
    Error(String),
}

impl DashboardStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle | Self::Loaded => None,
            Self::Empty => Some(EMPTY_MESSAGE),
            Self::Error(msg) => Some(msg.as_str()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("no claim with id {0}")]
    UnknownRow(String),

    #[error("only the owner can delete a claim, and only on the day it was made")]
    NotPermitted,

    #[error("no delete in progress")]
    NothingPending,

    #[error("type \"{CONFIRM_WORD}\" to confirm")]
    NotConfirmed,

    #[error("delete failed: {0}")]
    Store(#[from] StoreError),
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub doc_id: String,
    pub added_by: String,
    pub badge: BadgeColor,
    /// Claim time in the viewer's time zone.
    pub when: String,
    pub job_id: String,
    pub title: String,
    pub job_url: String,
    pub can_delete: bool,
}

/// A delete awaiting typed confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub doc_id: String,
    pub title: String,
    confirmation: String,
}

impl PendingDelete {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation == CONFIRM_WORD
    }
}

pub struct DashboardView {
    store: Arc<dyn ClaimStore>,
    identity: Option<Identity>,
    job_url_base: String,
    claims: Vec<ClaimRecord>,
    limit: usize,
    status: DashboardStatus,
    pending: Option<PendingDelete>,
}

impl DashboardView {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        identity: Option<Identity>,
        job_url_base: impl Into<String>,
    ) -> Self {
        Self {
            store,
            identity,
            job_url_base: job_url_base.into(),
            claims: Vec::new(),
            limit: INITIAL_WINDOW,
            status: DashboardStatus::Idle,
            pending: None,
        }
    }

    /// Resolve the signed-in identity, then load the first page.
    pub async fn open(
        store: Arc<dyn ClaimStore>,
        bridge: &IdentityBridge,
        job_url_base: impl Into<String>,
    ) -> Self {
        let identity = bridge.current_identity().await.ok();
        let mut view = Self::new(store, identity, job_url_base);
        view.refresh().await;
        view
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn status(&self) -> &DashboardStatus {
        &self.status
    }

    pub fn total(&self) -> usize {
        self.claims.len()
    }

    /// Refetch and reset the window.
    pub async fn refresh(&mut self) {
        self.limit = INITIAL_WINDOW;
        self.pending = None;
        match self.store.list(DEFAULT_PAGE_SIZE).await {
            Ok(mut claims) => {
                sort_newest_first(&mut claims);
                info!(count = claims.len(), "dashboard refreshed");
                self.status = if claims.is_empty() {
                    DashboardStatus::Empty
                } else {
                    DashboardStatus::Loaded
                };
                self.claims = claims;
            }
            Err(err) => {
                warn!(error = %err, "dashboard refresh failed");
                self.claims.clear();
                self.status = DashboardStatus::Error(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Widen the window. Returns `false` when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.limit += WINDOW_STEP;
        true
    }

    pub fn has_more(&self) -> bool {
        self.limit < self.claims.len()
    }

    pub fn visible(&self) -> &[ClaimRecord] {
        &self.claims[..self.limit.min(self.claims.len())]
    }

    fn current_id(&self) -> &str {
        self.identity.as_ref().map(|i| i.id.as_str()).unwrap_or("")
    }

    /// Render the visible window relative to `now`.
    pub fn rows<Tz>(&self, now: &DateTime<Tz>) -> Vec<DashboardRow>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.visible()
            .iter()
            .map(|record| self.row(record, now))
            .collect()
    }

    fn row<Tz>(&self, record: &ClaimRecord, now: &DateTime<Tz>) -> DashboardRow
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let claim = &record.claim;
        let when = parse_timestamp(&claim.timestamp)
            .map(|ts| {
                ts.with_timezone(&now.timezone())
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| claim.timestamp.clone());
        let job_id = or_placeholder(claim.job_id.as_str(), "Unknown");
        DashboardRow {
            doc_id: record.doc_id.clone(),
            added_by: or_placeholder(&claim.added_by, "Unknown"),
            badge: badge_color(&claim.added_by),
            when,
            job_url: JobId::new_unchecked(job_id.clone()).job_url(&self.job_url_base),
            job_id,
            title: or_placeholder(&claim.title, "No Title"),
            can_delete: can_delete(claim, self.current_id(), now),
        }
    }

    /// Open the confirmation step for `doc_id`.
    pub fn request_delete<Tz: TimeZone>(
        &mut self,
        doc_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<&PendingDelete, DeleteError> {
        let record = self
            .claims
            .iter()
            .find(|r| r.doc_id == doc_id)
            .ok_or_else(|| DeleteError::UnknownRow(doc_id.to_string()))?;
        if !can_delete(&record.claim, self.current_id(), now) {
            return Err(DeleteError::NotPermitted);
        }
        let pending = PendingDelete {
            doc_id: record.doc_id.clone(),
            title: record.claim.title.clone(),
            confirmation: String::new(),
        };
        Ok(&*self.pending.insert(pending))
    }

    /// Record what the user typed. Returns whether delete is now enabled.
    pub fn set_confirmation(&mut self, input: &str) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.confirmation = input.to_string();
                pending.is_confirmed()
            }
            None => false,
        }
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending = None;
    }

    /// Delete the pending claim. On failure the list and the confirmation
    /// step are left as they were.
    pub async fn confirm_delete(&mut self) -> Result<(), DeleteError> {
        let pending = self.pending.as_ref().ok_or(DeleteError::NothingPending)?;
        if !pending.is_confirmed() {
            return Err(DeleteError::NotConfirmed);
        }
        let doc_id = pending.doc_id.clone();
        self.store.delete(&doc_id).await?;

        self.claims.retain(|r| r.doc_id != doc_id);
        self.pending = None;
        if self.claims.is_empty() {
            self.status = DashboardStatus::Empty;
        }
        info!(doc_id = %doc_id, "claim removed from dashboard");
        Ok(())
    }
}

/// Stable sort, newest first.
pub fn sort_newest_first(claims: &mut [ClaimRecord]) {
    claims.sort_by_key(|r| std::cmp::Reverse(r.claim.created_at()));
}

/// Whether to offer a delete button: the viewer owns the claim and made it
/// on today's calendar day in `now`'s time zone.
pub fn can_delete<Tz: TimeZone>(claim: &Claim, current_id: &str, now: &DateTime<Tz>) -> bool {
    if current_id.is_empty() || claim.owner_id != current_id {
        return false;
    }
    parse_timestamp(&claim.timestamp)
        .map(|ts| ts.with_timezone(&now.timezone()).date_naive() == now.date_naive())
        .unwrap_or(false)
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
