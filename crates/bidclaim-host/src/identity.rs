//! Identity bridge.
//!
//! Only a background task may ask the host who is signed in. Views send it a
//! message naming the action and await the reply; the task answers with the
//! account's id and email, or empty strings when the host cannot tell.

use async_trait::async_trait;
use bidclaim_core::Identity;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// The only action the bridge understands.
pub const GET_USER_INFO: &str = "getUserInfo";

const QUEUE_DEPTH: usize = 16;

/// Raw bridge reply. Both fields are empty when the host has no account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("signed-in identity unavailable")]
pub struct IdentityUnavailable;

/// Where the background task reads the signed-in account from.
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn profile_user_info(&self) -> Option<Identity>;
}

/// A fixed account, e.g. from configuration. `None` means signed out.
#[derive(Debug, Clone, Default)]
pub struct StaticProfile(pub Option<Identity>);

#[async_trait]
impl ProfileSource for StaticProfile {
    async fn profile_user_info(&self) -> Option<Identity> {
        self.0.clone()
    }
}

struct BridgeMessage {
    action: String,
    reply: oneshot::Sender<UserInfo>,
}

/// Handle to the background identity task. Cheap to clone.
#[derive(Clone)]
pub struct IdentityBridge {
    tx: mpsc::Sender<BridgeMessage>,
}

impl IdentityBridge {
    /// Start the background task. Must be called inside a tokio runtime.
    pub fn spawn(source: impl ProfileSource) -> Self {
        let (tx, mut rx) = mpsc::channel::<BridgeMessage>(QUEUE_DEPTH);
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if msg.action != GET_USER_INFO {
                    warn!(action = %msg.action, "unrecognised bridge action");
                    continue;
                }
                let info = source
                    .profile_user_info()
                    .await
                    .map(|i| UserInfo {
                        id: i.id,
                        email: i.email,
                    })
                    .unwrap_or_default();
                let _ = msg.reply.send(info);
            }
            debug!("identity bridge stopped");
        });
        Self { tx }
    }

    /// Send `action` and wait for the reply. `None` when the task does not
    /// answer (unknown action, or the task is gone).
    pub async fn send(&self, action: &str) -> Option<UserInfo> {
        let (reply, rx) = oneshot::channel();
        let msg = BridgeMessage {
            action: action.to_string(),
            reply,
        };
        self.tx.send(msg).await.ok()?;
        rx.await.ok()
    }

    /// Ask who is signed in.
    pub async fn current_identity(&self) -> Result<Identity, IdentityUnavailable> {
        let info = self.send(GET_USER_INFO).await.ok_or(IdentityUnavailable)?;
        if info.id.is_empty() && info.email.is_empty() {
            info!("no signed-in identity");
            return Err(IdentityUnavailable);
        }
        info!("signed-in identity resolved");
        Ok(Identity::new(info.id, info.email))
    }
}
