//! Manual claim form.
//!
//! Unlike the page checker, the form insists on a typed name, remembers it
//! for next time, and reports a lost race as "already exists" without
//! looking up the winner.

use std::sync::Arc;

use bidclaim_core::{Claim, Identity, JobId, PageInfo, is_marketplace_job_page};
use bidclaim_host::{ProfileError, ProfileStore};
use bidclaim_store::{ClaimStore, CreateOutcome};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Ready,
    /// The page is not a marketplace job page; saving is disabled.
    NotAJobPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadyExists,
    /// The request failed; the form stays enabled for another try.
    Failed(String),
}

impl SaveOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Saved => "Saved".to_string(),
            Self::AlreadyExists => "Already exists".to_string(),
            Self::Failed(msg) => msg.clone(),
        }
    }
}

pub struct ClaimForm<'a> {
    store: Arc<dyn ClaimStore>,
    profile: &'a ProfileStore,
    page: PageInfo,
    marketplace_host: String,
}

impl<'a> ClaimForm<'a> {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        profile: &'a ProfileStore,
        page: PageInfo,
        marketplace_host: impl Into<String>,
    ) -> Self {
        Self {
            store,
            profile,
            page,
            marketplace_host: marketplace_host.into(),
        }
    }

    pub fn status(&self) -> FormStatus {
        if is_marketplace_job_page(&self.page.url, &self.marketplace_host) {
            FormStatus::Ready
        } else {
            FormStatus::NotAJobPage
        }
    }

    /// Name to prefill, from synced storage.
    pub fn remembered_name(&self) -> Result<Option<String>, ProfileError> {
        self.profile.display_name()
    }

    /// Validate, remember the name, and write the claim.
    pub async fn save(
        &self,
        name: &str,
        identity: Option<&Identity>,
    ) -> Result<SaveOutcome, ClaimError> {
        if self.status() == FormStatus::NotAJobPage {
            return Err(ClaimError::Validation(
                "This is not a marketplace job page.".to_string(),
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ClaimError::Validation(
                "Please enter your name first.".to_string(),
            ));
        }
        self.profile.set_display_name(name)?;

        let job_id = JobId::from_url(&self.page.url).ok_or_else(|| {
            ClaimError::Validation("Could not extract job id (~...)".to_string())
        })?;

        let claim = Claim::new(job_id, &self.page, name, identity, Utc::now());
        let outcome = match self.store.create(&claim).await {
            CreateOutcome::Created => {
                info!(job_id = %claim.job_id, "claim saved from form");
                SaveOutcome::Saved
            }
            CreateOutcome::Conflict => SaveOutcome::AlreadyExists,
            CreateOutcome::Failed(err) if err.is_transport() => {
                warn!(job_id = %claim.job_id, error = %err, "claim form save failed");
                SaveOutcome::Failed("Network error".to_string())
            }
            CreateOutcome::Failed(err) => {
                warn!(job_id = %claim.job_id, error = %err, "claim form save failed");
                SaveOutcome::Failed(format!("Error: {err}"))
            }
        };
        Ok(outcome)
    }
}
