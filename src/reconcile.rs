use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::parties::{Coalitions, PartySelection};
use crate::stats::{self, DashboardStatsData};
use crate::types::Politician;

/// The document served by the stats feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecomputedStats {
    pub global: DashboardStatsData,
    /// Keyed by party label and by coalition tag
    #[serde(default)]
    pub parties: BTreeMap<String, DashboardStatsData>,
}

impl PrecomputedStats {
    /// Build the document for a dataset: one entry per party label present
    /// and one per configured coalition
    pub fn compute(politicians: &[Politician], coalitions: &Coalitions, now: DateTime<Utc>) -> Self {
        let mut parties = stats::breakdown_by_party(politicians, now);
        for coalition in coalitions.iter() {
            let members = politicians
                .iter()
                .filter(|p| coalition.includes(p.party_label()));
            parties.insert(coalition.tag.clone(), stats::aggregate(members, now));
        }

        Self {
            global: stats::aggregate(politicians, now),
            parties,
        }
    }

    /// Entry for exactly this selection, if the document has one
    pub fn lookup(&self, selection: &PartySelection) -> Option<&DashboardStatsData> {
        match selection.key() {
            None => Some(&self.global),
            Some(key) => self.parties.get(key),
        }
    }
}

/// Pick precomputed stats when they answer the query, otherwise compute
///
/// Precomputed entries are only valid without a search term; a search narrows
/// the scope below what the document covers.
pub fn resolve_stats<F>(
    precomputed: Option<&PrecomputedStats>,
    search_term: &str,
    selection: &PartySelection,
    live_compute: F,
) -> DashboardStatsData
where
    F: FnOnce() -> DashboardStatsData,
{
    if search_term.is_empty() {
        if let Some(hit) = precomputed.and_then(|doc| doc.lookup(selection)) {
            debug!(selection = ?selection.key(), "using precomputed stats");
            return *hit;
        }
    }

    debug!(
        selection = ?selection.key(),
        searching = !search_term.is_empty(),
        "computing stats locally"
    );
    live_compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterPipeline, FilterState};
    use crate::parties::Coalition;
    use crate::stats::StatusStats;
    use crate::types::{PostMarker, SocialAccount, SocialAccounts};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn politician(name: &str, party: Option<&str>, bluesky: Option<PostMarker>) -> Politician {
        Politician {
            id: name.to_string(),
            name: name.to_string(),
            party: party.map(str::to_string),
            social: SocialAccounts {
                x: None,
                bluesky: bluesky.map(|m| SocialAccount::new(name, m)),
                mastodon: None,
            },
        }
    }

    fn dataset() -> Vec<Politician> {
        let recent = PostMarker::Timestamp((now() - Duration::days(1)).to_rfc3339());
        vec![
            politician("Anna", Some("Moderaterna"), Some(recent.clone())),
            politician("Bo", Some("Moderaterna"), Some(PostMarker::Closed)),
            politician("Cecilia", Some("Vänsterpartiet"), Some(recent)),
            politician("David", None, None),
            politician("Eva", Some("Liberalerna"), Some(PostMarker::Absent)),
        ]
    }

    fn live(data: &[Politician], state: &FilterState, coalitions: &Coalitions) -> DashboardStatsData {
        let pipeline = FilterPipeline::new(state, coalitions);
        stats::aggregate(pipeline.stats_scope(data), now())
    }

    #[test]
    fn test_precomputed_matches_local_for_every_selection() {
        let data = dataset();
        let coalitions = Coalitions::default();
        let doc = PrecomputedStats::compute(&data, &coalitions, now());

        let mut selections: Vec<Option<String>> = vec![None];
        selections.extend(doc.parties.keys().cloned().map(Some));

        for selected in selections {
            let state = FilterState::default().with_party(selected.clone());
            let selection = PartySelection::resolve(selected.as_deref(), &coalitions);

            let from_doc = doc.lookup(&selection).copied();
            assert_eq!(from_doc, Some(live(&data, &state, &coalitions)), "{:?}", selected);

            let resolved = resolve_stats(Some(&doc), "", &selection, || {
                panic!("precomputed entry should be used for {:?}", selected)
            });
            assert_eq!(Some(resolved), from_doc);
        }
    }

    #[test]
    fn test_search_term_forces_local_compute() {
        let data = dataset();
        let coalitions = Coalitions::default();
        let doc = PrecomputedStats::compute(&data, &coalitions, now());
        let state = FilterState::default().with_search("a");
        let selection = PartySelection::All;

        let resolved = resolve_stats(Some(&doc), &state.search_term, &selection, || {
            live(&data, &state, &coalitions)
        });

        // Anna, Cecilia, David, Eva
        assert_eq!(resolved.all.total, 4);
        assert_ne!(resolved, doc.global);
    }

    #[test]
    fn test_missing_entry_falls_back() {
        let data = dataset();
        let coalitions = Coalitions::new(vec![Coalition::new("Bloc", ["Moderaterna"])]);
        let doc = PrecomputedStats::compute(&data, &Coalitions::empty(), now());
        let state = FilterState::default().with_party(Some("Bloc"));
        let selection = PartySelection::resolve(Some("Bloc"), &coalitions);

        let resolved = resolve_stats(Some(&doc), "", &selection, || live(&data, &state, &coalitions));

        assert_eq!(resolved.all.total, 2);
        assert_eq!(
            resolved.bluesky,
            StatusStats { active: 1, inactive: 0, closed: 1, none: 0, total: 2 }
        );
    }

    #[test]
    fn test_without_document_computes() {
        let data = dataset();
        let coalitions = Coalitions::default();
        let state = FilterState::default();

        let resolved = resolve_stats(None, "", &PartySelection::All, || live(&data, &state, &coalitions));

        assert_eq!(resolved, PrecomputedStats::compute(&data, &coalitions, now()).global);
    }

    #[test]
    fn test_document_roundtrip_shape() {
        let doc = PrecomputedStats::compute(&dataset(), &Coalitions::default(), now());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["global"]["all"]["total"].is_u64());
        assert!(json["parties"]["Tidöpartierna"]["bluesky"].is_object());
        assert!(json["parties"]["Unknown"].is_object());
    }
}
