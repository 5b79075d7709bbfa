use crate::error::{Error, Result};
use crate::feed::{FeedSource, DEFAULT_DATA_URL, DEFAULT_STATS_URL};
use crate::parties::{Coalition, Coalitions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// How long typing must pause before a search recomputes the view
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Configuration for a dashboard session
#[derive(Debug, Clone)]
pub struct Config {
    pub data_source: FeedSource,
    pub stats_source: Option<FeedSource>,
    pub coalitions: Coalitions,
    pub search_debounce: Duration,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            data_source: FeedSource::from(DEFAULT_DATA_URL),
            stats_source: Some(FeedSource::from(DEFAULT_STATS_URL)),
            coalitions: Coalitions::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let FeedSource::File(path) = &self.data_source {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Data file does not exist: {}",
                    path.display()
                )));
            }
        }

        self.coalitions.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk configuration, TOML or YAML
///
/// ```toml
/// data = "data.json"
/// stats = "https://example.org/stats.json"
/// search_debounce_ms = 200
///
/// [[coalitions]]
/// tag = "Tidöpartierna"
/// parties = ["Moderaterna", "Kristdemokraterna", "Liberalerna", "Sverigedemokraterna"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub data: Option<String>,
    pub stats: Option<String>,
    pub search_debounce_ms: Option<u64>,
    pub coalitions: Option<Vec<Coalition>>,
}

impl ConfigFile {
    /// Load a config file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&contents)?),
            Some("yml") | Some("yaml") => Ok(serde_yaml::from_str(&contents)?),
            _ => Err(Error::Config(format!(
                "Unsupported config file '{}'. Use a .toml, .yml or .yaml file",
                path.display()
            ))),
        }
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    /// Apply the values present in a config file
    pub fn file(mut self, file: ConfigFile) -> Self {
        if let Some(data) = file.data {
            self = self.data_source(data.as_str());
        }
        if let Some(stats) = file.stats {
            self = self.stats_source(stats.as_str());
        }
        if let Some(ms) = file.search_debounce_ms {
            self = self.search_debounce(Duration::from_millis(ms));
        }
        if let Some(coalitions) = file.coalitions {
            self = self.coalitions(Coalitions::new(coalitions));
        }
        self
    }

    /// Apply `POLITIX_DATA` and `POLITIX_STATS` when set
    pub fn env(mut self) -> Self {
        if let Ok(data) = std::env::var("POLITIX_DATA") {
            self = self.data_source(data.as_str());
        }
        if let Ok(stats) = std::env::var("POLITIX_STATS") {
            self = self.stats_source(stats.as_str());
        }
        self
    }

    /// Set the politician feed
    pub fn data_source(mut self, source: impl Into<FeedSource>) -> Self {
        self.config.data_source = source.into();
        self
    }

    /// Set the precomputed stats feed
    pub fn stats_source(mut self, source: impl Into<FeedSource>) -> Self {
        self.config.stats_source = Some(source.into());
        self
    }

    /// Always compute stats locally
    pub fn no_stats(mut self) -> Self {
        self.config.stats_source = None;
        self
    }

    pub fn coalitions(mut self, coalitions: Coalitions) -> Self {
        self.config.coalitions = coalitions;
        self
    }

    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.config.search_debounce = debounce;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
