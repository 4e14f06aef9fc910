use crate::crawler::CrawlConfig;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Upstream {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.opendota.com/api".into()
}

fn default_user_agent() -> String {
    "dotaboard/0.1".into()
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, PartialEq)]
pub struct Freshness {
    #[serde(default = "default_threshold_minutes")]
    pub threshold_minutes: u64,
}

fn default_threshold_minutes() -> u64 {
    120
}

impl Default for Freshness {
    fn default() -> Self {
        Freshness {
            threshold_minutes: default_threshold_minutes(),
        }
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct SnapshotConfig {
    pub base_dir: String,
    pub filename: String,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub upstream: Upstream,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub freshness: Freshness,
    /// Shared secret checked on the push-sync path.
    pub sync_secret: String,
    /// Path to the roster YAML file.
    pub roster: String,
    pub snapshot: Option<SnapshotConfig>,
}
