//! The `RuntimeConfig` contract.
//!
//! This crate does not locate or parse a configuration file — that remains
//! an external concern (a CLI or service wrapper loads a TOML/JSON file and
//! deserializes it into this shape). What lives here is the shape itself,
//! plus the compiled-in defaults a caller gets if it supplies nothing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level runtime configuration, covering the data directory and the
/// scrape engine's retry/backoff defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Root directory under which `jobs.db`, `pubs.db`, downloads, and
    /// archives are stored.
    #[serde(default = "default_data_directory")]
    pub data_directory: PathBuf,

    /// Scrape engine defaults, used when a job does not override them.
    #[serde(default)]
    pub scrape_defaults: ScrapeDefaults,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            scrape_defaults: ScrapeDefaults::default(),
        }
    }
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("appeer_datadir")
}

/// Default parameters for the scrape engine's per-action retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrapeDefaults {
    /// Seconds to sleep between two consecutive actions of the same job.
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,

    /// Maximum number of attempts for a single request before giving up.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,

    /// Seconds to sleep before retrying after a non-429 failure.
    #[serde(default = "default_retry_sleep_time")]
    pub retry_sleep_time: f64,

    /// Seconds to sleep before retrying after an HTTP 429 response.
    ///
    /// Expressed in seconds, like every other field here, even though some
    /// external config loaders write it in minutes under the
    /// `_429_sleep_time` key — that spelling is accepted as an alias, but
    /// always deserializes into seconds.
    #[serde(alias = "_429_sleep_time", default = "default_retry_429_sleep_time")]
    pub retry_429_sleep_time: f64,
}

impl Default for ScrapeDefaults {
    fn default() -> Self {
        Self {
            sleep_time: default_sleep_time(),
            max_tries: default_max_tries(),
            retry_sleep_time: default_retry_sleep_time(),
            retry_429_sleep_time: default_retry_429_sleep_time(),
        }
    }
}

const fn default_sleep_time() -> f64 {
    1.0
}

const fn default_max_tries() -> u32 {
    3
}

const fn default_retry_sleep_time() -> f64 {
    10.0
}

const fn default_retry_429_sleep_time() -> f64 {
    300.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RuntimeConfig::default();
        assert_eq!(config.scrape_defaults.sleep_time, 1.0);
        assert_eq!(config.scrape_defaults.max_tries, 3);
        assert_eq!(config.scrape_defaults.retry_sleep_time, 10.0);
        assert_eq!(config.scrape_defaults.retry_429_sleep_time, 300.0);
    }

    #[test]
    fn accepts_underscore_429_alias() {
        let json = r#"{"_429_sleep_time": 42.0}"#;
        let defaults: ScrapeDefaults = serde_json::from_str(json).unwrap();
        assert!((defaults.retry_429_sleep_time - 42.0).abs() < f64::EPSILON);
    }
}
