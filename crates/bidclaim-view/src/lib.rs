//! View models driven by a claim store: the per-page checker, the manual
//! claim form, and the recent-claims dashboard.

pub mod checker;
pub mod dashboard;
pub mod form;
pub mod notice;

pub use checker::{CheckerState, ClaimChecker, UNNAMED_CLAIMANT};
pub use dashboard::{
    CONFIRM_WORD, DashboardRow, DashboardStatus, DashboardView, DeleteError, INITIAL_WINDOW,
    WINDOW_STEP, can_delete, sort_newest_first,
};
pub use form::{ClaimError, ClaimForm, FormStatus, SaveOutcome};
pub use notice::{Notice, NoticeKind};
