//! Remote claim-store backends and backend selection.

#[cfg(feature = "http")]
mod client;
#[cfg(feature = "http")]
pub mod firestore;
#[cfg(feature = "http")]
pub mod webhook;
#[cfg(feature = "http")]
pub mod wire;

#[cfg(feature = "http")]
pub use client::HttpSettings;
#[cfg(feature = "http")]
pub use firestore::FirestoreStore;
#[cfg(feature = "http")]
pub use webhook::WebhookStore;

use std::sync::Arc;

use bidclaim_core::{HttpConfig, StoreConfig};
use bidclaim_store::{ClaimStore, MemoryStore, StoreError};
use tracing::info;

/// Build the backend named by `store`.
pub fn connect(store: &StoreConfig, http: &HttpConfig) -> Result<Arc<dyn ClaimStore>, StoreError> {
    info!(backend = store.backend_name(), "connecting claim store");
    match store {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "http")]
        StoreConfig::Firestore {
            endpoint,
            project_id,
            api_key,
            collection,
        } => Ok(Arc::new(FirestoreStore::new(
            endpoint,
            project_id,
            api_key,
            collection,
            HttpSettings::from(http),
        )?)),
        #[cfg(feature = "http")]
        StoreConfig::Webhook {
            webhook_url,
            shared_secret,
        } => Ok(Arc::new(WebhookStore::new(
            webhook_url,
            shared_secret,
            HttpSettings::from(http),
        )?)),
        #[cfg(not(feature = "http"))]
        other => {
            let _ = http;
            Err(StoreError::Other(format!(
                "{} backend requires the `http` feature",
                other.backend_name()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_needs_no_network() {
        let store = connect(&StoreConfig::Memory, &HttpConfig::default());
        assert!(store.is_ok());
    }
}
