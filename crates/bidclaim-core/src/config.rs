//! Configuration records shared by the backends and the CLI.
//!
//! The CLI reads these from a TOML file; every section except `[store]` has
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::Identity;

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_COLLECTION: &str = "bids";
pub const DEFAULT_MARKETPLACE_HOST: &str = "upwork.com";
pub const DEFAULT_JOB_URL_BASE: &str = "https://www.upwork.com/jobs/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http timeouts must be at least one second".into(),
            ));
        }
        match &self.store {
            StoreConfig::Firestore {
                project_id,
                api_key,
                ..
            } if project_id.is_empty() || api_key.is_empty() => Err(ConfigError::Invalid(
                "firestore needs project_id and api_key".into(),
            )),
            StoreConfig::Webhook { webhook_url, .. } if webhook_url.is_empty() => {
                Err(ConfigError::Invalid("webhook needs webhook_url".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Which backend holds the claims, and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Document-store REST API keyed by job id.
    Firestore {
        #[serde(default = "default_endpoint")]
        endpoint: String,
        project_id: String,
        api_key: String,
        #[serde(default = "default_collection")]
        collection: String,
    },
    /// Spreadsheet-backed webhook guarded by a shared secret.
    Webhook {
        webhook_url: String,
        shared_secret: String,
    },
    /// Process-local store; nothing survives the process.
    Memory,
}

impl StoreConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Firestore { .. } => "firestore",
            Self::Webhook { .. } => "webhook",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 15,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Substring a job page URL must contain.
    pub host: String,
    /// Prefix used to link a job id back to its posting.
    pub job_url_base: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MARKETPLACE_HOST.to_string(),
            job_url_base: DEFAULT_JOB_URL_BASE.to_string(),
        }
    }
}

/// The signed-in account the host reports, when it reports one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityConfig {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

impl From<IdentityConfig> for Identity {
    fn from(cfg: IdentityConfig) -> Self {
        Identity::new(cfg.id, cfg.email)
    }
}

fn default_endpoint() -> String {
    DEFAULT_FIRESTORE_ENDPOINT.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}
