//! Two teammates on the same job page, sharing one store.

use std::sync::Arc;

use bidclaim_core::{Identity, PageInfo};
use bidclaim_host::{IdentityBridge, ProfileStore, StaticProfile};
use bidclaim_store::{ClaimStore, MemoryStore};
use bidclaim_view::{CheckerState, ClaimChecker, ClaimForm, DashboardView, SaveOutcome};
use chrono::Utc;

const JOB_URL: &str = "https://www.upwork.com/jobs/~0123456789";

fn page() -> PageInfo {
    PageInfo::new(JOB_URL, "Rust developer needed")
}

#[tokio::test]
async fn second_viewer_sees_first_claim() {
    let store: Arc<dyn ClaimStore> = Arc::new(MemoryStore::new());
    let alex = Identity::new("1001", "alex@example.com");

    let mut first = ClaimChecker::new(store.clone(), page());
    assert_eq!(first.check().await, &CheckerState::Available);
    first.claim(Some("Alex"), Some(&alex)).await.unwrap();
    assert_eq!(
        first.history(),
        &[
            CheckerState::Unknown,
            CheckerState::Available,
            CheckerState::Saving,
            CheckerState::Taken {
                owner: "Alex".into()
            },
        ]
    );

    let mut second = ClaimChecker::new(store.clone(), page());
    assert_eq!(
        second.check().await,
        &CheckerState::Taken {
            owner: "Alex".into()
        }
    );
    assert!(!second.state().can_claim());
    // The second viewer goes straight to Taken without ever offering the claim.
    assert_eq!(
        second.history(),
        &[
            CheckerState::Unknown,
            CheckerState::Taken {
                owner: "Alex".into()
            },
        ]
    );
}

#[tokio::test]
async fn form_and_button_race_on_same_job() {
    let store: Arc<dyn ClaimStore> = Arc::new(MemoryStore::new());
    let dir = tempfile::tempdir().unwrap();
    let profile = ProfileStore::open(dir.path().join("profile.json"));

    let mut checker = ClaimChecker::new(store.clone(), page());
    checker.check().await;

    let form = ClaimForm::new(store.clone(), &profile, page(), "upwork.com");
    assert_eq!(form.save("Sam", None).await.unwrap(), SaveOutcome::Saved);

    // The checker still believes the job is free; its create loses the race.
    let notice = checker.claim(Some("Alex"), None).await.unwrap();
    assert_eq!(notice.message, "Already taken by Sam");
    assert_eq!(
        checker.state(),
        &CheckerState::Taken {
            owner: "Sam".into()
        }
    );
}

#[tokio::test]
async fn owner_can_delete_own_claim_from_dashboard() {
    let store: Arc<dyn ClaimStore> = Arc::new(MemoryStore::new());
    let alex = Identity::new("1001", "alex@example.com");

    let mut checker = ClaimChecker::new(store.clone(), page());
    checker.check().await;
    checker.claim(Some("Alex"), Some(&alex)).await.unwrap();

    let bridge = IdentityBridge::spawn(StaticProfile(Some(alex)));
    let mut view = DashboardView::open(store.clone(), &bridge, "https://www.upwork.com/jobs/").await;
    let now = Utc::now();
    let rows = view.rows(&now);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].can_delete);

    view.request_delete(&rows[0].doc_id, &now).unwrap();
    assert!(view.set_confirmation("delete"));
    view.confirm_delete().await.unwrap();

    let mut again = ClaimChecker::new(store, page());
    assert_eq!(again.check().await, &CheckerState::Available);
}
