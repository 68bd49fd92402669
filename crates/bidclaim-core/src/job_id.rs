//! Job identifier extraction from marketplace URLs.
//!
//! Marketplace job pages carry a stable identifier in their address: a tilde
//! followed by a run of digits, e.g. `https://www.upwork.com/jobs/~0123456789`.
//! That token (tilde included) is the document key of a claim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A marketplace job identifier such as `~0123456789`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Extract the first `~<digits>` token from a URL.
    ///
    /// A tilde with no digits after it is skipped and scanning continues, so
    /// `~x~42` yields `~42`.
    pub fn from_url(url: &str) -> Option<Self> {
        let bytes = url.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'~' {
                let digits = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                if digits > 0 {
                    return Some(Self(url[i..i + 1 + digits].to_string()));
                }
            }
            i += 1;
        }
        None
    }

    /// Wrap an identifier that is already known to be well formed, e.g. a
    /// document key read back from the store.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Link back to the job posting.
    ///
    /// `"https://www.upwork.com/jobs/"` + `~01` → `"https://www.upwork.com/jobs/~01"`
    pub fn job_url(&self, base: &str) -> String {
        format!("{}{}", base, self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Loose page check used by the claim form: the URL mentions the marketplace
/// host and contains a tilde.
pub fn is_marketplace_job_page(url: &str, host: &str) -> bool {
    !host.is_empty() && url.contains(host) && url.contains('~')
}
