use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::activity;

/// A tracked social network, plus the synthetic `all` aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    All,
    X,
    Bluesky,
    Mastodon,
}

impl Platform {
    /// The three real networks, in display order
    pub const NETWORKS: [Platform; 3] = [Platform::X, Platform::Bluesky, Platform::Mastodon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::All => "all",
            Platform::X => "x",
            Platform::Bluesky => "bluesky",
            Platform::Mastodon => "mastodon",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Platform::All),
            "x" | "twitter" => Ok(Platform::X),
            "bluesky" | "bsky" => Ok(Platform::Bluesky),
            "mastodon" => Ok(Platform::Mastodon),
            other => Err(crate::Error::Config(format!(
                "Invalid platform '{}'. Allowed values are: all, x, bluesky, mastodon",
                other
            ))),
        }
    }
}

/// The raw `last_post` value of an account
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PostMarker {
    /// The account exists but nothing is known about its posts
    #[default]
    Absent,
    Closed,
    Protected,
    /// Anything else; expected to be an ISO-8601 timestamp but not guaranteed
    Timestamp(String),
}

impl From<Option<String>> for PostMarker {
    fn from(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return PostMarker::Absent;
        };
        if raw.is_empty() {
            PostMarker::Absent
        } else if raw == "closed" {
            PostMarker::Closed
        } else if raw == "protected" {
            PostMarker::Protected
        } else {
            PostMarker::Timestamp(raw)
        }
    }
}

impl From<PostMarker> for Option<String> {
    fn from(marker: PostMarker) -> Self {
        match marker {
            PostMarker::Absent => None,
            PostMarker::Closed => Some("closed".to_string()),
            PostMarker::Protected => Some("protected".to_string()),
            PostMarker::Timestamp(ts) => Some(ts),
        }
    }
}

impl PostMarker {
    /// Label for the "last post" column of the table
    ///
    /// Timestamps render as their UTC date. A timestamp that cannot be parsed
    /// is shown as-is rather than hidden.
    pub fn label(&self) -> String {
        match self {
            PostMarker::Absent => "never".to_string(),
            PostMarker::Closed => "closed".to_string(),
            PostMarker::Protected => "protected".to_string(),
            PostMarker::Timestamp(raw) => match activity::parse_timestamp(raw) {
                Some(ts) => ts.format("%Y-%m-%d").to_string(),
                None => raw.clone(),
            },
        }
    }
}

/// One account on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub handle: String,
    #[serde(default)]
    pub last_post: PostMarker,
}

impl SocialAccount {
    pub fn new(handle: impl Into<String>, last_post: PostMarker) -> Self {
        Self {
            handle: handle.into(),
            last_post,
        }
    }

    /// Public profile URL of this account on `platform`
    ///
    /// Mastodon handles must look like `user@instance` (optionally with a
    /// leading `@`); anything else has no URL.
    pub fn profile_url(&self, platform: Platform) -> Option<String> {
        match platform {
            Platform::X => Some(format!("https://x.com/{}", self.handle)),
            Platform::Bluesky => Some(format!("https://bsky.app/profile/{}", self.handle)),
            Platform::Mastodon => {
                let handle = self.handle.strip_prefix('@').unwrap_or(&self.handle);
                let mut parts = handle.split('@');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(user), Some(instance), None) if !user.is_empty() && !instance.is_empty() => {
                        Some(format!("https://{}/@{}", instance, user))
                    }
                    _ => None,
                }
            }
            Platform::All => None,
        }
    }
}

/// Older datasets store the X account as a bare handle string
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountRepr {
    Handle(String),
    Account(SocialAccount),
}

fn deserialize_account<'de, D>(deserializer: D) -> Result<Option<SocialAccount>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<AccountRepr>::deserialize(deserializer)?;
    Ok(repr.map(|repr| match repr {
        AccountRepr::Handle(handle) => SocialAccount::new(handle, PostMarker::Absent),
        AccountRepr::Account(account) => account,
    }))
}

/// The per-platform account slots of a politician
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAccounts {
    #[serde(default, deserialize_with = "deserialize_account")]
    pub x: Option<SocialAccount>,
    #[serde(default, deserialize_with = "deserialize_account")]
    pub bluesky: Option<SocialAccount>,
    #[serde(default, deserialize_with = "deserialize_account")]
    pub mastodon: Option<SocialAccount>,
}

impl SocialAccounts {
    /// Account in the slot for `platform`; `All` has no slot
    pub fn get(&self, platform: Platform) -> Option<&SocialAccount> {
        match platform {
            Platform::X => self.x.as_ref(),
            Platform::Bluesky => self.bluesky.as_ref(),
            Platform::Mastodon => self.mastodon.as_ref(),
            Platform::All => None,
        }
    }

    /// Iterate over the three slots in `Platform::NETWORKS` order
    pub fn slots(&self) -> impl Iterator<Item = (Platform, Option<&SocialAccount>)> {
        Platform::NETWORKS.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// A member of parliament as served by the data feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Politician {
    /// Knowledge-base identifier (e.g. a Wikidata Q-id)
    pub id: String,
    pub name: String,
    pub party: Option<String>,
    #[serde(default)]
    pub social: SocialAccounts,
}

impl Politician {
    /// Party label used wherever politicians are grouped
    pub fn party_label(&self) -> &str {
        crate::parties::party_label(self.party.as_deref())
    }

    /// Page where the record can be corrected
    pub fn edit_url(&self) -> String {
        format!("https://www.wikidata.org/wiki/{}", self.id)
    }
}
