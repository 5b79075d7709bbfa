use crate::collate;
use crate::error::{Error, Result};
use crate::parties::{Coalitions, PartySelection};
use crate::types::{Platform, Politician};

/// Account-presence checkboxes: one per network plus "no accounts"
///
/// A politician is kept when any checked box applies to them. Everything is
/// checked by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub x: bool,
    pub bluesky: bool,
    pub mastodon: bool,
    pub none: bool,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            x: true,
            bluesky: true,
            mastodon: true,
            none: true,
        }
    }
}

impl Presence {
    /// Every box unchecked; keeps nobody
    pub fn unchecked() -> Self {
        Self {
            x: false,
            bluesky: false,
            mastodon: false,
            none: false,
        }
    }

    /// Set the box of one network; `All` sets all three networks
    pub fn with(mut self, platform: Platform, checked: bool) -> Self {
        match platform {
            Platform::All => {
                self.x = checked;
                self.bluesky = checked;
                self.mastodon = checked;
            }
            Platform::X => self.x = checked,
            Platform::Bluesky => self.bluesky = checked,
            Platform::Mastodon => self.mastodon = checked,
        }
        self
    }

    /// Set the "no accounts" box
    pub fn with_none(mut self, checked: bool) -> Self {
        self.none = checked;
        self
    }

    pub fn is_checked(&self, platform: Platform) -> bool {
        match platform {
            Platform::All => self.x && self.bluesky && self.mastodon,
            Platform::X => self.x,
            Platform::Bluesky => self.bluesky,
            Platform::Mastodon => self.mastodon,
        }
    }

    pub fn matches(&self, politician: &Politician) -> bool {
        let mut has_any = false;
        for platform in Platform::NETWORKS {
            if politician.social.get(platform).is_some() {
                if self.is_checked(platform) {
                    return true;
                }
                has_any = true;
            }
        }
        !has_any && self.none
    }

    /// Parse a list of checked boxes such as `x,bluesky,none`
    pub fn from_checked<S: AsRef<str>>(items: &[S]) -> Result<Self> {
        items.iter().try_fold(Self::unchecked(), |presence, item| {
            let item = item.as_ref().trim();
            if item.eq_ignore_ascii_case("none") {
                Ok(presence.with_none(true))
            } else {
                let platform = item.parse::<Platform>().map_err(|_| {
                    Error::Config(format!(
                        "Invalid account filter '{}'. Allowed values are: x, bluesky, mastodon, none",
                        item
                    ))
                })?;
                Ok(presence.with(platform, true))
            }
        })
    }
}

/// Snapshot of the table controls
///
/// Transitions return a new snapshot; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    /// A party label, a coalition tag, or `None` for everyone
    pub selected_party: Option<String>,
    pub active_platform: Platform,
    pub presence: Presence,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_party: None,
            active_platform: Platform::All,
            presence: Presence::default(),
        }
    }
}

impl FilterState {
    pub fn with_search(&self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..self.clone()
        }
    }

    pub fn with_party(&self, party: Option<impl Into<String>>) -> Self {
        Self {
            selected_party: party.map(Into::into),
            ..self.clone()
        }
    }

    /// Clicking the selected party again clears the selection
    pub fn toggle_party(&self, party: &str) -> Self {
        if self.selected_party.as_deref() == Some(party) {
            self.with_party(None::<String>)
        } else {
            self.with_party(Some(party))
        }
    }

    pub fn with_platform(&self, platform: Platform) -> Self {
        Self {
            active_platform: platform,
            ..self.clone()
        }
    }

    pub fn with_presence(&self, presence: Presence) -> Self {
        Self {
            presence,
            ..self.clone()
        }
    }

    /// True when `other` differs from `self` in the search term and nothing else
    pub fn only_search_differs(&self, other: &FilterState) -> bool {
        self.search_term != other.search_term
            && self.selected_party == other.selected_party
            && self.active_platform == other.active_platform
            && self.presence == other.presence
    }
}

/// Filter result indicating whether a politician should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl From<bool> for FilterResult {
    fn from(keep: bool) -> Self {
        if keep {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}

/// One independent filtering stage
pub trait PoliticianFilter {
    fn should_keep(&self, politician: &Politician) -> FilterResult;
}

/// Party or coalition membership
pub struct PartyFilter {
    selection: PartySelection,
}

impl PartyFilter {
    pub fn new(selection: PartySelection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &PartySelection {
        &self.selection
    }
}

impl PoliticianFilter for PartyFilter {
    fn should_keep(&self, politician: &Politician) -> FilterResult {
        self.selection.matches(politician).into()
    }
}

/// Presence of an account on the active platform; `All` keeps everyone
pub struct PlatformFilter {
    platform: Platform,
}

impl PlatformFilter {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl PoliticianFilter for PlatformFilter {
    fn should_keep(&self, politician: &Politician) -> FilterResult {
        match self.platform {
            Platform::All => FilterResult::Keep,
            platform => politician.social.get(platform).is_some().into(),
        }
    }
}

/// Account-presence checkboxes, OR-combined
pub struct PresenceFilter {
    presence: Presence,
}

impl PresenceFilter {
    pub fn new(presence: Presence) -> Self {
        Self { presence }
    }
}

impl PoliticianFilter for PresenceFilter {
    fn should_keep(&self, politician: &Politician) -> FilterResult {
        self.presence.matches(politician).into()
    }
}

/// Case-insensitive substring match on the name
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }
}

impl PoliticianFilter for SearchFilter {
    fn should_keep(&self, politician: &Politician) -> FilterResult {
        if self.needle.is_empty() {
            return FilterResult::Keep;
        }
        politician
            .name
            .to_lowercase()
            .contains(&self.needle)
            .into()
    }
}

/// All stages for one `FilterState`
pub struct FilterPipeline {
    party: PartyFilter,
    platform: PlatformFilter,
    presence: PresenceFilter,
    search: SearchFilter,
}

impl FilterPipeline {
    pub fn new(state: &FilterState, coalitions: &Coalitions) -> Self {
        Self {
            party: PartyFilter::new(PartySelection::resolve(
                state.selected_party.as_deref(),
                coalitions,
            )),
            platform: PlatformFilter::new(state.active_platform),
            presence: PresenceFilter::new(state.presence),
            search: SearchFilter::new(&state.search_term),
        }
    }

    pub fn selection(&self) -> &PartySelection {
        self.party.selection()
    }

    fn keeps(stages: &[&dyn PoliticianFilter], politician: &Politician) -> bool {
        stages
            .iter()
            .all(|stage| stage.should_keep(politician) == FilterResult::Keep)
    }

    /// Politicians shown in the table, sorted by name
    pub fn apply<'a>(
        &self,
        politicians: impl IntoIterator<Item = &'a Politician>,
    ) -> Vec<&'a Politician> {
        let stages: [&dyn PoliticianFilter; 4] =
            [&self.party, &self.platform, &self.presence, &self.search];
        let mut kept: Vec<&Politician> = politicians
            .into_iter()
            .filter(|p| Self::keeps(&stages, p))
            .collect();
        collate::sort_by_name(&mut kept, |p| p.name.as_str());
        kept
    }

    /// Politicians the stats cover: party and search stages only, unsorted
    ///
    /// The platform and presence stages are left out since the stats already
    /// break down by platform.
    pub fn stats_scope<'a>(
        &self,
        politicians: impl IntoIterator<Item = &'a Politician>,
    ) -> Vec<&'a Politician> {
        let stages: [&dyn PoliticianFilter; 2] = [&self.party, &self.search];
        politicians
            .into_iter()
            .filter(|p| Self::keeps(&stages, p))
            .collect()
    }
}

/// Apply `state` to `politicians`, returning the table rows in name order
pub fn filter_politicians<'a>(
    politicians: &'a [Politician],
    state: &FilterState,
    coalitions: &Coalitions,
) -> Vec<&'a Politician> {
    FilterPipeline::new(state, coalitions).apply(politicians)
}
