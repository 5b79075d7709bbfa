use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::{classify, ActivityStatus};
use crate::types::{Platform, Politician, SocialAccount};

/// One of the four mutually exclusive status categories
///
/// Declaration order is the priority used for the `all` aggregate: a
/// politician lands in the first bucket any of their platforms reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Active,
    Inactive,
    Closed,
    None,
}

impl From<Option<ActivityStatus>> for Bucket {
    fn from(status: Option<ActivityStatus>) -> Self {
        match status {
            Some(ActivityStatus::Active) => Bucket::Active,
            Some(ActivityStatus::Inactive) => Bucket::Inactive,
            Some(ActivityStatus::Closed) => Bucket::Closed,
            None => Bucket::None,
        }
    }
}

/// Bucket of a single platform slot
pub fn slot_bucket(account: Option<&SocialAccount>, now: DateTime<Utc>) -> Bucket {
    account.map(|a| classify(&a.last_post, now)).into()
}

/// Bucket of a politician across all platforms
pub fn overall_bucket(politician: &Politician, now: DateTime<Utc>) -> Bucket {
    politician
        .social
        .slots()
        .map(|(_, account)| slot_bucket(account, now))
        .min()
        .unwrap_or(Bucket::None)
}

/// Status counts for one platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusStats {
    pub active: usize,
    pub inactive: usize,
    pub closed: usize,
    pub none: usize,
    pub total: usize,
}

impl StatusStats {
    pub fn record(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Active => self.active += 1,
            Bucket::Inactive => self.inactive += 1,
            Bucket::Closed => self.closed += 1,
            Bucket::None => self.none += 1,
        }
        self.total += 1;
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Active => self.active,
            Bucket::Inactive => self.inactive,
            Bucket::Closed => self.closed,
            Bucket::None => self.none,
        }
    }

    /// Members with an account, whatever its state
    ///
    /// Zero when `none` exceeds `total`, as in an inconsistent stats document.
    pub fn with_account(&self) -> usize {
        self.total.saturating_sub(self.none)
    }

    /// Whether the buckets add up to the total
    pub fn is_consistent(&self) -> bool {
        [self.active, self.inactive, self.closed, self.none]
            .into_iter()
            .try_fold(0usize, usize::checked_add)
            == Some(self.total)
    }
}

/// Status counts per platform, plus the per-politician `all` aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsData {
    pub all: StatusStats,
    pub x: StatusStats,
    pub bluesky: StatusStats,
    pub mastodon: StatusStats,
}

impl DashboardStatsData {
    pub fn get(&self, platform: Platform) -> &StatusStats {
        match platform {
            Platform::All => &self.all,
            Platform::X => &self.x,
            Platform::Bluesky => &self.bluesky,
            Platform::Mastodon => &self.mastodon,
        }
    }

    fn get_mut(&mut self, platform: Platform) -> &mut StatusStats {
        match platform {
            Platform::All => &mut self.all,
            Platform::X => &mut self.x,
            Platform::Bluesky => &mut self.bluesky,
            Platform::Mastodon => &mut self.mastodon,
        }
    }

    /// Count one politician into every table
    pub fn record(&mut self, politician: &Politician, now: DateTime<Utc>) {
        let mut overall = Bucket::None;
        for (platform, account) in politician.social.slots() {
            let bucket = slot_bucket(account, now);
            self.get_mut(platform).record(bucket);
            overall = overall.min(bucket);
        }
        self.all.record(overall);
    }

    pub fn is_consistent(&self) -> bool {
        [Platform::All, Platform::X, Platform::Bluesky, Platform::Mastodon]
            .iter()
            .all(|p| self.get(*p).is_consistent())
    }
}

/// Reduce any set of politicians (the whole dataset or a filtered slice) into
/// per-platform status counts
pub fn aggregate<'a>(
    politicians: impl IntoIterator<Item = &'a Politician>,
    now: DateTime<Utc>,
) -> DashboardStatsData {
    politicians
        .into_iter()
        .fold(DashboardStatsData::default(), |mut stats, p| {
            stats.record(p, now);
            stats
        })
}

/// Status counts for each normalized party label
pub fn breakdown_by_party<'a>(
    politicians: impl IntoIterator<Item = &'a Politician>,
    now: DateTime<Utc>,
) -> BTreeMap<String, DashboardStatsData> {
    let mut parties: BTreeMap<String, DashboardStatsData> = BTreeMap::new();
    for p in politicians {
        parties
            .entry(p.party_label().to_string())
            .or_default()
            .record(p, now);
    }
    parties
}
