//! Service configuration from environment variables.

use crate::store::DEFAULT_NAMESPACE;
use std::path::PathBuf;
use std::time::Duration;

/// Web service settings. Unset or unparsable variables fall back to defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// `HOST`, default 0.0.0.0 so the service is reachable from outside the machine.
    pub host: String,
    /// `PORT`, default 8080.
    pub port: u16,
    /// `DATA_DIR`: directory holding the store file.
    pub data_dir: PathBuf,
    /// `STORE_NAMESPACE`: file stem of the store.
    pub namespace: String,
    /// `BACKUP_INTERVAL_SECS`; `None` (0) disables backups.
    pub backup_interval: Option<Duration>,
    /// `RNG_SEED`: fixed seed for reproducible draws.
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            namespace: DEFAULT_NAMESPACE.to_string(),
            backup_interval: Some(Duration::from_secs(30 * 60)),
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: non_empty("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            namespace: non_empty("STORE_NAMESPACE").unwrap_or(defaults.namespace),
            backup_interval: match non_empty("BACKUP_INTERVAL_SECS").and_then(|s| s.parse::<u64>().ok()) {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.backup_interval,
            },
            rng_seed: non_empty("RNG_SEED").and_then(|s| s.parse().ok()),
        }
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), ServerConfig::default());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let c = config(&[
            ("PORT", "9000"),
            ("DATA_DIR", "/var/lib/cups"),
            ("BACKUP_INTERVAL_SECS", "0"),
            ("RNG_SEED", "42"),
            ("HOST", "  "),
        ]);
        assert_eq!(c.port, 9000);
        assert_eq!(c.data_dir, PathBuf::from("/var/lib/cups"));
        assert_eq!(c.backup_interval, None);
        assert_eq!(c.rng_seed, Some(42));
        assert_eq!(c.host, "0.0.0.0");

        assert_eq!(config(&[("PORT", "eighty")]).port, 8080);
    }
}
