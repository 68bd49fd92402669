#![cfg(feature = "http")]

use std::time::Duration;

use bidclaim_core::{Claim, Identity, JobId, PageInfo};
use bidclaim_store::{ClaimStore, CreateOutcome, StoreError};
use bidclaim_sync::{FirestoreStore, HttpSettings};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "/v1/projects/team-bids/databases/(default)/documents/bids";

fn store(server: &MockServer) -> FirestoreStore {
    FirestoreStore::new(
        &server.uri(),
        "team-bids",
        "test-key",
        "bids",
        HttpSettings::default(),
    )
    .expect("client builds")
}

fn claim() -> Claim {
    Claim::new(
        JobId::new_unchecked("~0123456789"),
        &PageInfo::new(
            "https://marketplace.example/jobs/~0123456789/details",
            "Build a parser",
        ),
        "Alex",
        Some(&Identity::new("1001", "alex@example.com")),
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap(),
    )
}

fn document_json(id: &str, added_by: &str, timestamp: &str) -> serde_json::Value {
    json!({
        "name": format!("projects/team-bids/databases/(default)/documents/bids/{id}"),
        "fields": {
            "url": {"stringValue": format!("https://www.upwork.com/jobs/{id}")},
            "title": {"stringValue": "A job"},
            "addedBy": {"stringValue": added_by},
            "jobId": {"stringValue": id},
            "timestamp": {"stringValue": timestamp}
        }
    })
}

#[tokio::test]
async fn get_missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{COLLECTION}/~404")))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let found = store(&server)
        .get(&JobId::new_unchecked("~404"))
        .await
        .expect("not found is not an error");
    assert!(found.is_none());
}

#[tokio::test]
async fn get_existing_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{COLLECTION}/~0123456789")))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json(
            "~0123456789",
            "Alex",
            "2026-05-01T09:30:00.000Z",
        )))
        .mount(&server)
        .await;

    let record = store(&server)
        .get(&JobId::new_unchecked("~0123456789"))
        .await
        .unwrap()
        .expect("document exists");
    assert_eq!(record.doc_id, "~0123456789");
    assert_eq!(record.claim.added_by, "Alex");
    assert_eq!(record.claim.timestamp, "2026-05-01T09:30:00.000Z");
}

#[tokio::test]
async fn get_server_error_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = store(&server)
        .get(&JobId::new_unchecked("~1"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Remote {
            status: 403,
            message: "Missing or insufficient permissions.".into()
        }
    );
}

#[tokio::test]
async fn create_posts_wrapped_fields_with_explicit_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COLLECTION))
        .and(query_param("documentId", "~0123456789"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "fields": {
                "addedBy": {"stringValue": "Alex"},
                "jobId": {"stringValue": "~0123456789"},
                "ownerId": {"stringValue": "1001"},
                "timestamp": {"stringValue": "2026-05-01T09:30:00.000Z"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json(
            "~0123456789",
            "Alex",
            "2026-05-01T09:30:00.000Z",
        )))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(store(&server).create(&claim()).await, CreateOutcome::Created);
}

#[tokio::test]
async fn create_on_existing_key_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": 409, "message": "Document already exists", "status": "ALREADY_EXISTS"}
        })))
        .mount(&server)
        .await;

    assert_eq!(store(&server).create(&claim()).await, CreateOutcome::Conflict);
}

#[tokio::test]
async fn already_exists_status_is_conflict_regardless_of_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "exists", "status": "ALREADY_EXISTS"}
        })))
        .mount(&server)
        .await;

    assert_eq!(store(&server).create(&claim()).await, CreateOutcome::Conflict);
}

#[tokio::test]
async fn create_failure_carries_store_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    assert_eq!(
        store(&server).create(&claim()).await,
        CreateOutcome::Failed(StoreError::Remote {
            status: 400,
            message: "API key not valid.".into()
        })
    );
}

#[tokio::test]
async fn list_requests_one_bounded_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("pageSize", "100"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                document_json("~1", "Alex", "2026-05-01T09:30:00.000Z"),
                document_json("~2", "Sam", "2026-05-02T09:30:00.000Z")
            ],
            "nextPageToken": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = store(&server).list(100).await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["~1", "~2"]);
}

#[tokio::test]
async fn list_of_empty_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(store(&server).list(100).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_by_document_key() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/~0123456789")))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).delete("~0123456789").await.unwrap();
}

#[tokio::test]
async fn delete_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store(&server).delete("~1").await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Remote {
            status: 500,
            message: "Internal Server Error".into()
        }
    );
}

#[tokio::test]
async fn slow_store_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(document_json("~1", "Alex", "2026-05-01T09:30:00.000Z")),
        )
        .mount(&server)
        .await;

    let settings = HttpSettings {
        request_timeout: Duration::from_millis(50),
        ..HttpSettings::default()
    };
    let store = FirestoreStore::new(&server.uri(), "team-bids", "test-key", "bids", settings)
        .expect("client builds");
    let err = store.get(&JobId::new_unchecked("~1")).await.unwrap_err();
    assert!(matches!(err, StoreError::Timeout(_)), "got {err:?}");
    assert!(err.is_transport());
}
