use std::time::Duration;

use bidclaim_core::HttpConfig;
use bidclaim_store::StoreError;

/// Timeouts applied to every request a backend makes.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpSettings {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            request_timeout: cfg.request_timeout(),
        }
    }
}

impl HttpSettings {
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, StoreError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| StoreError::Other(err.to_string()))
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        return StoreError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return StoreError::Malformed(err.to_string());
    }
    StoreError::Network(err.to_string())
}
