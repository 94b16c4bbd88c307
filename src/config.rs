//! Configuration
//!
//! YAML configuration naming the zone data directory and the managed zones.
//!
//! ```yaml
//! zone_data_directory: zones
//! zone_match: suffix
//! managed_zones:
//!   - fqdn: example.com
//!     ttl: 3600
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cname::ZoneMatch;
use crate::types::ManagedZone;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the zone data files; relative paths are resolved
    /// against the directory of the configuration file
    pub zone_data_directory: PathBuf,

    /// Zones the operator is responsible for
    #[serde(default)]
    pub managed_zones: Vec<ManagedZone>,

    /// How CNAME targets are matched against managed zones
    #[serde(default)]
    pub zone_match: ZoneMatch,
}

impl Config {
    /// Load, resolve and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        if config.zone_data_directory.is_relative() {
            if let Some(base) = path.parent() {
                config.zone_data_directory = base.join(&config.zone_data_directory);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from YAML without resolving paths
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Reject empty or duplicated zone names
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, mz) in self.managed_zones.iter().enumerate() {
            if mz.fqdn.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "managed_zones[{}]: empty fqdn",
                    i
                )));
            }
            if !seen.insert(mz.fqdn.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "managed_zones[{}]: duplicate zone '{}'",
                    i, mz.fqdn
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_ZONE_TTL;

    const YAML: &str = r#"
zone_data_directory: zones
managed_zones:
  - fqdn: example.com
    ttl: 300
  - fqdn: example.org
"#;

    #[test]
    fn test_parse_yaml() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.zone_data_directory, PathBuf::from("zones"));
        assert_eq!(config.zone_match, ZoneMatch::Suffix);
        assert_eq!(
            config.managed_zones,
            vec![
                ManagedZone::new("example.com", 300),
                ManagedZone::new("example.org", DEFAULT_ZONE_TTL),
            ]
        );
    }

    #[test]
    fn test_parse_zone_match() {
        let yaml = "zone_data_directory: /srv/zones\nzone_match: label\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.zone_match, ZoneMatch::Label);
        assert!(config.managed_zones.is_empty());
    }

    #[test]
    fn test_from_file_resolves_relative_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, YAML).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.zone_data_directory, tmp.path().join("zones"));
    }

    #[test]
    fn test_from_file_keeps_absolute_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, "zone_data_directory: /srv/zones\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.zone_data_directory, PathBuf::from("/srv/zones"));
    }

    #[test]
    fn test_from_file_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::from_file(tmp.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yml"));
    }

    #[test]
    fn test_from_file_bad_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, "managed_zones: 42\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_zones() {
        let mut config = Config::from_yaml(YAML).unwrap();
        config.managed_zones.push(ManagedZone::new("example.com", 60));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate zone 'example.com'"));

        config.managed_zones = vec![ManagedZone::new("", 60)];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
