//! Aggregation and filtering engine for a dashboard of parliamentarians'
//! social-media presence.
//!
//! A flat list of politician records is turned into per-platform account
//! status counts (optionally scoped to a party or coalition) and into a
//! filtered, name-sorted table, reusing precomputed stats when they answer the
//! query.

pub mod activity;
pub mod collate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod filter;
pub mod live;
pub mod parties;
pub mod reconcile;
pub mod stats;
pub mod types;

pub use activity::{classify, ActivityStatus, ACTIVITY_THRESHOLD_DAYS};
pub use config::{Config, ConfigBuilder, ConfigFile};
pub use dashboard::{Dashboard, DashboardView};
pub use error::{Error, Result};
pub use feed::{FeedClient, FeedSource};
pub use filter::{
    filter_politicians, FilterPipeline, FilterResult, FilterState, PoliticianFilter, Presence,
};
pub use live::LiveDashboard;
pub use parties::{Coalition, Coalitions, PartySelection, UNKNOWN_PARTY};
pub use reconcile::{resolve_stats, PrecomputedStats};
pub use stats::{aggregate, Bucket, DashboardStatsData, StatusStats};
pub use types::{Platform, Politician, PostMarker, SocialAccount, SocialAccounts};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder, ConfigFile};
    pub use crate::dashboard::{Dashboard, DashboardView};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterState, Presence};
    pub use crate::live::LiveDashboard;
    pub use crate::parties::{Coalitions, PartySelection};
    pub use crate::reconcile::PrecomputedStats;
    pub use crate::stats::{DashboardStatsData, StatusStats};
    pub use crate::types::{Platform, Politician};
}
