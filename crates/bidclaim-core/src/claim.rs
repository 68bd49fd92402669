//! Claim records shared by the checker, the claim form, and the dashboard.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::JobId;

/// Name shown for a claim whose author field is blank.
pub const ANONYMOUS_OWNER: &str = "Someone";

/// A record asserting that a job has been taken by a named user.
///
/// Created once by a create-if-absent write keyed by `job_id`, never updated,
/// destroyed only by an explicit delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub job_id: JobId,
    pub url: String,
    pub title: String,
    pub added_by: String,
    /// ISO 8601 timestamp string, client generated.
    pub timestamp: String,
    /// Opaque id of the signed-in identity; empty when unavailable.
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub owner_email: String,
}

impl Claim {
    /// Snapshot a page into a new claim stamped with `now`.
    pub fn new(
        job_id: JobId,
        page: &PageInfo,
        added_by: impl Into<String>,
        identity: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Self {
        let (owner_id, owner_email) = identity
            .map(|i| (i.id.clone(), i.email.clone()))
            .unwrap_or_default();
        Self {
            job_id,
            url: page.url.clone(),
            title: page.title.clone(),
            added_by: added_by.into(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            owner_id,
            owner_email,
        }
    }

    /// Author name for "taken by" messages.
    pub fn owner_name(&self) -> &str {
        if self.added_by.is_empty() {
            ANONYMOUS_OWNER
        } else {
            &self.added_by
        }
    }

    /// Creation time used for ordering. Unparseable timestamps sort as the epoch.
    pub fn created_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.timestamp).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// A claim as read back from the store, with the key of its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    pub doc_id: String,
    pub claim: Claim,
}

impl ClaimRecord {
    pub fn new(doc_id: impl Into<String>, claim: Claim) -> Self {
        Self {
            doc_id: doc_id.into(),
            claim,
        }
    }
}

/// The signed-in account as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Address and title of the page being inspected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

impl PageInfo {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as UTC midnight.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn page() -> PageInfo {
        PageInfo::new(
            "https://www.upwork.com/jobs/~0123456789",
            "Rust developer needed",
        )
    }

    #[test]
    fn new_claim_stamps_millisecond_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let claim = Claim::new(
            JobId::new_unchecked("~0123456789"),
            &page(),
            "Alex",
            None,
            now,
        );
        assert_eq!(claim.timestamp, "2026-03-04T05:06:07.000Z");
        assert_eq!(claim.owner_id, "");
        assert_eq!(claim.owner_email, "");
        assert_eq!(claim.title, "Rust developer needed");
    }

    #[test]
    fn new_claim_copies_identity() {
        let identity = Identity::new("1234", "alex@example.com");
        let claim = Claim::new(
            JobId::new_unchecked("~01"),
            &page(),
            "Alex",
            Some(&identity),
            Utc::now(),
        );
        assert_eq!(claim.owner_id, "1234");
        assert_eq!(claim.owner_email, "alex@example.com");
    }

    #[test]
    fn blank_author_reads_as_someone() {
        let mut claim = Claim::new(
            JobId::new_unchecked("~01"),
            &page(),
            "",
            None,
            Utc::now(),
        );
        assert_eq!(claim.owner_name(), "Someone");
        claim.added_by = "Sam".into();
        assert_eq!(claim.owner_name(), "Sam");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2026-01-02T03:04:05.678+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 1, 2, 1, 4, 5).unwrap() + chrono::Duration::milliseconds(678));
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let ts = parse_timestamp("1970-01-01").unwrap();
        assert_eq!(ts, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn garbage_sorts_as_epoch() {
        let mut claim = Claim::new(
            JobId::new_unchecked("~01"),
            &page(),
            "Alex",
            None,
            Utc::now(),
        );
        claim.timestamp = "yesterday-ish".into();
        assert!(parse_timestamp(&claim.timestamp).is_none());
        assert_eq!(claim.created_at(), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn claim_json_uses_camel_case() {
        let claim = Claim::new(
            JobId::new_unchecked("~01"),
            &page(),
            "Alex",
            Some(&Identity::new("1", "a@example.com")),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        );
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["jobId"], "~01");
        assert_eq!(json["addedBy"], "Alex");
        assert_eq!(json["ownerId"], "1");
        assert_eq!(json["ownerEmail"], "a@example.com");
    }

    #[test]
    fn claim_json_owner_fields_optional() {
        let json = r#"{
            "jobId": "~01",
            "url": "https://www.upwork.com/jobs/~01",
            "title": "t",
            "addedBy": "Sam",
            "timestamp": "2026-01-01T00:00:00.000Z"
        }"#;
        let claim: Claim = serde_json::from_str(json).unwrap();
        assert!(claim.owner_id.is_empty());
        assert_eq!(claim.added_by, "Sam");
    }
}
