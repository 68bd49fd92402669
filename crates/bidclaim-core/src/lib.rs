pub mod claim;
pub mod color;
pub mod config;
pub mod job_id;

pub use claim::{Claim, ClaimRecord, Identity, PageInfo, parse_timestamp};
pub use color::{BadgeColor, badge_color, name_hash};
pub use config::{AppConfig, ConfigError, HttpConfig, IdentityConfig, MarketplaceConfig, StoreConfig};
pub use job_id::{JobId, is_marketplace_job_page};
