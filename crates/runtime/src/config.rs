//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::JsonFileStore;
use crate::types::MATCH_REVEAL_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// JSON file holding the endless best record
    pub records_path: PathBuf,
    /// Fixed seed, or `None` to derive one from the clock
    pub seed: Option<u32>,
    /// How long a found path stays visible before the pair is removed
    pub reveal_ms: u32,
    /// Log file; no logging without it
    pub log_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            records_path: JsonFileStore::default_path(),
            seed: None,
            reveal_ms: MATCH_REVEAL_MS,
            log_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Read `TUI_LINK_RECORDS`, `TUI_LINK_SEED`, `TUI_LINK_REVEAL_MS` and
    /// `TUI_LINK_LOG`. Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let records_path = non_empty("TUI_LINK_RECORDS")
            .map(PathBuf::from)
            .unwrap_or_else(JsonFileStore::default_path);

        let seed = non_empty("TUI_LINK_SEED").and_then(|s| s.parse().ok());

        let reveal_ms = non_empty("TUI_LINK_REVEAL_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(MATCH_REVEAL_MS);

        let log_path = non_empty("TUI_LINK_LOG").map(PathBuf::from);

        Self {
            records_path,
            seed,
            reveal_ms,
            log_path,
        }
    }

    /// The configured seed, or one derived from the wall clock.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| (d.as_nanos() as u32) ^ (d.as_secs() as u32))
                .unwrap_or(12345)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config.seed, None);
        assert_eq!(config.reveal_ms, MATCH_REVEAL_MS);
        assert_eq!(config.log_path, None);
        assert!(config.records_path.ends_with("tui-link/records.json"));
    }

    #[test]
    fn reads_values() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TUI_LINK_RECORDS", "/tmp/r.json"),
            ("TUI_LINK_SEED", "42"),
            ("TUI_LINK_REVEAL_MS", "0"),
            ("TUI_LINK_LOG", " /tmp/link.log "),
        ]));
        assert_eq!(config.records_path, PathBuf::from("/tmp/r.json"));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.reveal_ms, 0);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/link.log")));
    }

    #[test]
    fn bad_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TUI_LINK_SEED", "soon"),
            ("TUI_LINK_REVEAL_MS", "-5"),
            ("TUI_LINK_LOG", "   "),
        ]));
        assert_eq!(config.seed, None);
        assert_eq!(config.reveal_ms, MATCH_REVEAL_MS);
        assert_eq!(config.log_path, None);
    }
}
