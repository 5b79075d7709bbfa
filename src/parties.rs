use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::collate;
use crate::error::{Error, Result};
use crate::types::Politician;

/// Label for politicians without a known party
pub const UNKNOWN_PARTY: &str = "Unknown";

/// Normalize an optional party name to the label used for grouping
pub fn party_label(party: Option<&str>) -> &str {
    match party {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNKNOWN_PARTY,
    }
}

/// A named bloc of parties that can be selected instead of a single party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coalition {
    pub tag: String,
    pub parties: Vec<String>,
}

impl Coalition {
    pub fn new<S: Into<String>>(tag: impl Into<String>, parties: impl IntoIterator<Item = S>) -> Self {
        Self {
            tag: tag.into(),
            parties: parties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn includes(&self, label: &str) -> bool {
        self.parties.iter().any(|p| p == label)
    }
}

/// The configured coalitions, in selector order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coalitions(Vec<Coalition>);

impl Coalitions {
    pub fn new(coalitions: Vec<Coalition>) -> Self {
        Self(coalitions)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn find(&self, tag: &str) -> Option<&Coalition> {
        self.0.iter().find(|c| c.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coalition> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that tags are usable as selector keys
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for coalition in &self.0 {
            if coalition.tag.trim().is_empty() {
                return Err(Error::Config("Coalition tag must not be empty".to_string()));
            }
            if coalition.tag == UNKNOWN_PARTY {
                return Err(Error::Config(format!(
                    "Coalition tag '{}' is reserved for politicians without a party",
                    UNKNOWN_PARTY
                )));
            }
            if !seen.insert(coalition.tag.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate coalition tag '{}'",
                    coalition.tag
                )));
            }
        }
        Ok(())
    }
}

impl Default for Coalitions {
    /// The two blocs of the Swedish Riksdag
    fn default() -> Self {
        Self(vec![
            Coalition::new(
                "Tidöpartierna",
                [
                    "Moderaterna",
                    "Kristdemokraterna",
                    "Liberalerna",
                    "Sverigedemokraterna",
                ],
            ),
            Coalition::new(
                "Oppositionen",
                [
                    "Socialdemokraterna",
                    "Vänsterpartiet",
                    "Miljöpartiet",
                    "Centerpartiet",
                ],
            ),
        ])
    }
}

/// Which politicians the party selector lets through
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartySelection {
    #[default]
    All,
    /// A normalized party label, including `UNKNOWN_PARTY`
    Party(String),
    Coalition(Coalition),
}

impl PartySelection {
    /// Resolve a selector value: coalition tags win over party labels
    pub fn resolve(selected: Option<&str>, coalitions: &Coalitions) -> Self {
        match selected {
            None => PartySelection::All,
            Some(value) => match coalitions.find(value) {
                Some(coalition) => PartySelection::Coalition(coalition.clone()),
                None => PartySelection::Party(party_label(Some(value)).to_string()),
            },
        }
    }

    /// Key of this selection in a precomputed stats document; `None` is global
    pub fn key(&self) -> Option<&str> {
        match self {
            PartySelection::All => None,
            PartySelection::Party(label) => Some(label.as_str()),
            PartySelection::Coalition(coalition) => Some(coalition.tag.as_str()),
        }
    }

    pub fn matches(&self, politician: &Politician) -> bool {
        match self {
            PartySelection::All => true,
            PartySelection::Party(label) => politician.party_label() == label.as_str(),
            PartySelection::Coalition(coalition) => coalition.includes(politician.party_label()),
        }
    }
}

/// Labels for the party selector
///
/// Coalition tags come first (configured order, only those with at least one
/// member in the dataset), then party labels in Swedish collation order, then
/// `UNKNOWN_PARTY` last when present.
pub fn party_labels<'a>(
    politicians: impl IntoIterator<Item = &'a Politician>,
    coalitions: &Coalitions,
) -> Vec<String> {
    let present: BTreeSet<&str> = politicians.into_iter().map(|p| p.party_label()).collect();

    let mut labels: Vec<String> = coalitions
        .iter()
        .filter(|c| c.parties.iter().any(|p| present.contains(p.as_str())))
        .map(|c| c.tag.clone())
        .collect();

    let mut parties: Vec<&str> = present
        .iter()
        .copied()
        .filter(|label| *label != UNKNOWN_PARTY)
        .collect();
    collate::sort_by_name(&mut parties, |label| *label);
    labels.extend(parties.into_iter().map(str::to_string));

    if present.contains(UNKNOWN_PARTY) {
        labels.push(UNKNOWN_PARTY.to_string());
    }
    labels
}
