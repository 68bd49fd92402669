//! Host collaborators: who is signed in, and what name they claim jobs under.

pub mod identity;
pub mod profile;

pub use identity::{
    GET_USER_INFO, IdentityBridge, IdentityUnavailable, ProfileSource, StaticProfile, UserInfo,
};
pub use profile::{DISPLAY_NAME_KEY, ProfileError, ProfileStore};
