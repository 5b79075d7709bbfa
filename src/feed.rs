use serde::de::DeserializeOwned;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::reconcile::PrecomputedStats;
use crate::types::Politician;

/// Published politician dataset
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/PierreMesure/politix-sweden/refs/heads/master/data.json";

/// Published precomputed stats document
pub const DEFAULT_STATS_URL: &str =
    "https://raw.githubusercontent.com/PierreMesure/politix-sweden/refs/heads/master/stats.json";

const USER_AGENT: &str = concat!("politix/", env!("CARGO_PKG_VERSION"));

/// Where a feed is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl From<&str> for FeedSource {
    fn from(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            FeedSource::Url(s.to_string())
        } else {
            FeedSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => f.write_str(url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads feeds over HTTP or from disk
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    async fn fetch_bytes(&self, source: &FeedSource) -> Result<Vec<u8>> {
        match source {
            FeedSource::Url(url) => {
                let response = self.http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Feed {
                        feed: url.clone(),
                        message: format!("HTTP status {}", status),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            FeedSource::File(path) => Ok(tokio::fs::read(path).await?),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, source: &FeedSource) -> Result<T> {
        let bytes = self.fetch_bytes(source).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Feed {
            feed: source.to_string(),
            message: format!("invalid JSON: {}", e),
        })
    }

    /// Load the politician list
    ///
    /// Any failure here is fatal to the dashboard and is returned as-is.
    pub async fn load_politicians(&self, source: &FeedSource) -> Result<Vec<Politician>> {
        let politicians: Vec<Politician> = self.fetch_json(source).await?;
        info!(source = %source, count = politicians.len(), "loaded politicians");
        Ok(politicians)
    }

    /// Load the precomputed stats document
    ///
    /// Failures are logged and yield `None`; callers compute locally instead.
    pub async fn load_precomputed(&self, source: Option<&FeedSource>) -> Option<PrecomputedStats> {
        let source = source?;
        match self.fetch_json::<PrecomputedStats>(source).await {
            Ok(doc) => {
                info!(source = %source, parties = doc.parties.len(), "loaded precomputed stats");
                Some(doc)
            }
            Err(e) => {
                warn!(source = %source, error = %e, "precomputed stats unavailable, computing locally");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!(
            FeedSource::from("https://example.org/data.json"),
            FeedSource::Url("https://example.org/data.json".to_string())
        );
        assert_eq!(
            FeedSource::from("data.json"),
            FeedSource::File(PathBuf::from("data.json"))
        );
    }

    #[tokio::test]
    async fn test_load_politicians_from_file() {
        let file = write_temp(
            r#"[{"id": "Q1", "name": "Anna", "party": "Liberalerna",
                 "social": {"x": null, "bluesky": {"handle": "anna", "last_post": null}, "mastodon": null}}]"#,
        );
        let client = FeedClient::new().unwrap();

        let politicians = client
            .load_politicians(&FeedSource::File(file.path().to_path_buf()))
            .await
            .unwrap();

        assert_eq!(politicians.len(), 1);
        assert_eq!(politicians[0].party_label(), "Liberalerna");
    }

    #[tokio::test]
    async fn test_missing_data_feed_is_an_error() {
        let client = FeedClient::new().unwrap();
        let result = client
            .load_politicians(&FeedSource::File(PathBuf::from("/nonexistent/data.json")))
            .await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_data_feed_is_an_error() {
        let file = write_temp("{ not json");
        let client = FeedClient::new().unwrap();
        let result = client
            .load_politicians(&FeedSource::File(file.path().to_path_buf()))
            .await;
        assert!(matches!(result, Err(Error::Feed { .. })));
    }

    #[tokio::test]
    async fn test_stats_feed_failures_are_recovered() {
        let client = FeedClient::new().unwrap();
        assert!(client.load_precomputed(None).await.is_none());

        let missing = FeedSource::File(PathBuf::from("/nonexistent/stats.json"));
        assert!(client.load_precomputed(Some(&missing)).await.is_none());

        let file = write_temp("[1, 2, 3]");
        let bad = FeedSource::File(file.path().to_path_buf());
        assert!(client.load_precomputed(Some(&bad)).await.is_none());
    }

    #[tokio::test]
    async fn test_load_precomputed_from_file() {
        let file = write_temp(
            r#"{"global": {"all": {"active": 1, "inactive": 0, "closed": 0, "none": 0, "total": 1},
                           "x": {"none": 1, "total": 1},
                           "bluesky": {"active": 1, "total": 1},
                           "mastodon": {"none": 1, "total": 1}},
                "parties": {}}"#,
        );
        let client = FeedClient::new().unwrap();

        let doc = client
            .load_precomputed(Some(&FeedSource::File(file.path().to_path_buf())))
            .await
            .unwrap();

        assert_eq!(doc.global.all.active, 1);
        assert!(doc.global.is_consistent());
    }
}
