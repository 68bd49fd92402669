//! Per-page claim checker.
//!
//! ```text
//! Unknown ──check──▶ Available ──claim──▶ Saving ──▶ Taken
//!    │                   ▲                  │
//!    ├──▶ Taken          └──── SaveError ◀──┘
//!    └──▶ CheckError
//! ```
//!
//! A page without a job id never leaves `Inactive`. `Taken`, `CheckError`
//! and `Inactive` are terminal; a fresh page view starts a new checker.

use std::sync::Arc;

use bidclaim_core::claim::ANONYMOUS_OWNER;
use bidclaim_core::{Claim, Identity, JobId, PageInfo};
use bidclaim_store::{ClaimStore, CreateOutcome, StoreError};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::Notice;

/// Name recorded when the user never chose one.
pub const UNNAMED_CLAIMANT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerState {
    /// The page carries no job id.
    Inactive,
    Unknown,
    Available,
    Saving,
    Taken { owner: String },
    CheckError { message: String },
    SaveError { message: String },
}

impl CheckerState {
    /// Button caption for this state.
    pub fn label(&self) -> String {
        match self {
            Self::Inactive => String::new(),
            Self::Unknown => "Checking...".to_string(),
            Self::Available => "Select Job Post".to_string(),
            Self::Saving => "Saving...".to_string(),
            Self::Taken { owner } => format!("Taken by {owner}"),
            Self::CheckError { .. } => "Error".to_string(),
            Self::SaveError { .. } => "Error - Retry".to_string(),
        }
    }

    /// Whether the claim action is enabled.
    pub fn can_claim(&self) -> bool {
        matches!(self, Self::Available | Self::SaveError { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Inactive | Self::Taken { .. } | Self::CheckError { .. }
        )
    }
}

pub struct ClaimChecker {
    store: Arc<dyn ClaimStore>,
    page: PageInfo,
    job_id: Option<JobId>,
    state: CheckerState,
    history: Vec<CheckerState>,
}

impl ClaimChecker {
    pub fn new(store: Arc<dyn ClaimStore>, page: PageInfo) -> Self {
        let job_id = JobId::from_url(&page.url);
        let state = if job_id.is_some() {
            CheckerState::Unknown
        } else {
            CheckerState::Inactive
        };
        Self {
            store,
            page,
            job_id,
            history: vec![state.clone()],
            state,
        }
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    pub fn state(&self) -> &CheckerState {
        &self.state
    }

    /// Every state visited so far, oldest first.
    pub fn history(&self) -> &[CheckerState] {
        &self.history
    }

    fn transition(&mut self, next: CheckerState) {
        self.history.push(next.clone());
        self.state = next;
    }

    /// Look the job up once. Only acts from `Unknown`.
    pub async fn check(&mut self) -> &CheckerState {
        let Some(job_id) = self.job_id.clone() else {
            return &self.state;
        };
        if self.state != CheckerState::Unknown {
            return &self.state;
        }

        match self.store.get(&job_id).await {
            Ok(Some(record)) => {
                info!(job_id = %job_id, owner = %record.claim.owner_name(), "job already claimed");
                self.transition(CheckerState::Taken {
                    owner: record.claim.owner_name().to_string(),
                });
            }
            Ok(None) => {
                info!(job_id = %job_id, "job available");
                self.transition(CheckerState::Available);
            }
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "claim check failed");
                self.transition(CheckerState::CheckError {
                    message: err.to_string(),
                });
            }
        }
        &self.state
    }

    /// Claim the job under `added_by`, stamped with the current time.
    ///
    /// Returns the notice to show, or `None` when the action is disabled.
    pub async fn claim(
        &mut self,
        added_by: Option<&str>,
        identity: Option<&Identity>,
    ) -> Option<Notice> {
        self.claim_at(added_by, identity, Utc::now()).await
    }

    pub async fn claim_at(
        &mut self,
        added_by: Option<&str>,
        identity: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Option<Notice> {
        let job_id = self.job_id.clone()?;
        if !self.state.can_claim() {
            return None;
        }

        let name = added_by
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_CLAIMANT)
            .to_string();
        let claim = Claim::new(job_id.clone(), &self.page, name.clone(), identity, now);

        self.transition(CheckerState::Saving);
        let notice = match self.store.create(&claim).await {
            CreateOutcome::Created => {
                self.transition(CheckerState::Taken { owner: name });
                Notice::success("URL saved successfully!")
            }
            CreateOutcome::Conflict => {
                let owner = self.current_owner(&job_id).await;
                let notice = Notice::warning(format!("Already taken by {owner}"));
                self.transition(CheckerState::Taken { owner });
                notice
            }
            CreateOutcome::Failed(err) => {
                let notice = save_failure_notice(&err);
                self.transition(CheckerState::SaveError {
                    message: err.to_string(),
                });
                notice
            }
        };
        Some(notice)
    }

    /// Who actually holds the job after a lost race.
    async fn current_owner(&self, job_id: &JobId) -> String {
        match self.store.get(job_id).await {
            Ok(Some(record)) => record.claim.owner_name().to_string(),
            Ok(None) => ANONYMOUS_OWNER.to_string(),
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "owner lookup after conflict failed");
                ANONYMOUS_OWNER.to_string()
            }
        }
    }
}

fn save_failure_notice(err: &StoreError) -> Notice {
    if err.is_transport() {
        Notice::error("Network error. Please try again.")
    } else {
        Notice::error("Failed to save. Please try again.")
    }
}
