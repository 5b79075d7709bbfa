use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::feed::FeedClient;
use crate::filter::{FilterPipeline, FilterState};
use crate::parties::{self, Coalitions};
use crate::reconcile::{self, PrecomputedStats};
use crate::stats::{self, DashboardStatsData, StatusStats};
use crate::types::{Platform, Politician};

/// Everything the rendering layer reads for one filter state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub platform: Platform,
    pub stats: DashboardStatsData,
    pub politicians: Vec<Politician>,
    pub parties: Vec<String>,
}

impl DashboardView {
    /// Counts for the platform currently shown
    pub fn platform_stats(&self) -> &StatusStats {
        self.stats.get(self.platform)
    }
}

/// A loaded dataset, immutable for the whole session
#[derive(Debug, Clone)]
pub struct Dashboard {
    politicians: Vec<Politician>,
    precomputed: Option<PrecomputedStats>,
    coalitions: Coalitions,
    party_labels: Vec<String>,
    now: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(
        politicians: Vec<Politician>,
        precomputed: Option<PrecomputedStats>,
        coalitions: Coalitions,
    ) -> Self {
        let party_labels = parties::party_labels(&politicians, &coalitions);
        Self {
            politicians,
            precomputed,
            coalitions,
            party_labels,
            now: Utc::now(),
        }
    }

    /// Fix the instant activity is measured against
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Fetch both feeds concurrently
    ///
    /// A failing data feed fails the load; a failing stats feed only means
    /// stats are computed locally.
    pub async fn load(config: &Config) -> Result<Self> {
        let client = FeedClient::new()?;
        let (politicians, precomputed) = tokio::join!(
            client.load_politicians(&config.data_source),
            client.load_precomputed(config.stats_source.as_ref()),
        );
        Ok(Self::new(politicians?, precomputed, config.coalitions.clone()))
    }

    pub fn politicians(&self) -> &[Politician] {
        &self.politicians
    }

    pub fn coalitions(&self) -> &Coalitions {
        &self.coalitions
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Selector labels: coalition tags, then parties
    pub fn party_labels(&self) -> &[String] {
        &self.party_labels
    }

    /// Stats for the party selection and search term of `state`
    pub fn stats(&self, state: &FilterState) -> DashboardStatsData {
        let pipeline = FilterPipeline::new(state, &self.coalitions);
        reconcile::resolve_stats(
            self.precomputed.as_ref(),
            &state.search_term,
            pipeline.selection(),
            || stats::aggregate(pipeline.stats_scope(&self.politicians), self.now),
        )
    }

    /// Table rows for `state`, sorted by name
    pub fn filtered(&self, state: &FilterState) -> Vec<&Politician> {
        FilterPipeline::new(state, &self.coalitions).apply(&self.politicians)
    }

    /// Stats and table rows for `state`
    pub fn view(&self, state: &FilterState) -> DashboardView {
        DashboardView {
            platform: state.active_platform,
            stats: self.stats(state),
            politicians: self.filtered(state).into_iter().cloned().collect(),
            parties: self.party_labels.clone(),
        }
    }

    /// The stats document for this dataset, as the stats feed would serve it
    pub fn precompute(&self) -> PrecomputedStats {
        PrecomputedStats::compute(&self.politicians, &self.coalitions, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PostMarker, SocialAccount, SocialAccounts};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn dataset() -> Vec<Politician> {
        let recent = PostMarker::Timestamp((now() - Duration::days(1)).to_rfc3339());
        let member = |name: &str, party: Option<&str>, bluesky: Option<PostMarker>| Politician {
            id: name.to_string(),
            name: name.to_string(),
            party: party.map(str::to_string),
            social: SocialAccounts {
                x: None,
                bluesky: bluesky.map(|m| SocialAccount::new(name, m)),
                mastodon: None,
            },
        };
        vec![
            member("Östen", Some("Moderaterna"), Some(recent.clone())),
            member("Agnes", Some("Miljöpartiet"), Some(recent)),
            member("Bertil", None, None),
        ]
    }

    #[test]
    fn test_view_with_and_without_precomputed_agree() {
        let local = Dashboard::new(dataset(), None, Coalitions::default()).with_now(now());
        let doc = local.precompute();
        let cached = Dashboard::new(dataset(), Some(doc), Coalitions::default()).with_now(now());

        for state in [
            FilterState::default(),
            FilterState::default().with_party(Some("Moderaterna")),
            FilterState::default().with_party(Some("Oppositionen")),
            FilterState::default().with_party(Some("Unknown")),
            FilterState::default().with_search("e"),
            FilterState::default().with_platform(Platform::Bluesky),
        ] {
            assert_eq!(local.view(&state), cached.view(&state), "{:?}", state);
        }
    }

    #[test]
    fn test_view_outputs() {
        let dashboard = Dashboard::new(dataset(), None, Coalitions::default()).with_now(now());
        let view = dashboard.view(&FilterState::default().with_platform(Platform::Bluesky));

        let names: Vec<&str> = view.politicians.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Agnes", "Östen"]);
        assert_eq!(view.platform_stats().active, 2);
        assert_eq!(view.platform_stats().none, 1);
        assert_eq!(
            view.parties,
            vec!["Tidöpartierna", "Oppositionen", "Miljöpartiet", "Moderaterna", "Unknown"]
        );
    }
}
