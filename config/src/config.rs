//! Firewall configuration and store-file discovery.
//!
//! The firewall writes one pattern store per protected database, named after
//! the target address and the database flavour. Only the three keys needed
//! to rebuild that name are read; everything else in the file is ignored.
//!
//! # Example YAML
//!
//! ```yaml
//! targetIP: 10.0.0.1
//! dbms: mysql
//! dbDir: /var/lib/dbshield/model
//! listenPort: 33060
//! ```
//!
//! With this file the store lives at `/var/lib/dbshield/model/10.0.0.1_mysql.db`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Database flavour assumed when `dbms` is not configured.
pub const DEFAULT_DBMS: &str = "mysql";

/// Directory name under the system temp dir used when `dbDir` is not set.
pub const DEFAULT_DB_DIR_NAME: &str = "model";

/// The subset of the firewall configuration that locates the store file.
///
/// Every key is optional; the accessors apply the defaults.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use pattern_store_config::FirewallConfig;
///
/// let config: FirewallConfig =
///     serde_yaml::from_str("targetIP: 10.0.0.1\ndbDir: /data").unwrap();
/// assert_eq!(config.dbms(), "mysql");
/// assert_eq!(config.database_path(), PathBuf::from("/data/10.0.0.1_mysql.db"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallConfig {
    /// Address of the protected database server.
    #[serde(rename = "targetIP", default, skip_serializing_if = "Option::is_none")]
    pub target_ip: Option<String>,
    /// Database flavour, e.g. `mysql` or `postgres`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbms: Option<String>,
    /// Directory holding the learned pattern stores.
    #[serde(rename = "dbDir", default, skip_serializing_if = "Option::is_none")]
    pub db_dir: Option<PathBuf>,
}

impl FirewallConfig {
    /// Loads configuration from a YAML file.
    ///
    /// An empty file yields the all-defaults configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or [`YamlError`](ConfigError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn target_ip(&self) -> &str {
        self.target_ip.as_deref().unwrap_or_default()
    }

    pub fn dbms(&self) -> &str {
        self.dbms.as_deref().unwrap_or(DEFAULT_DBMS)
    }

    pub fn db_dir(&self) -> PathBuf {
        self.db_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_DIR_NAME))
    }

    /// Returns `<dbDir>/<targetIP>_<dbms>.db`.
    pub fn database_path(&self) -> PathBuf {
        self.db_dir()
            .join(format!("{}_{}.db", self.target_ip(), self.dbms()))
    }
}

/// Works out which store file to open.
///
/// `config` wins over `file` when both are given. The resolved file must
/// exist.
///
/// # Errors
///
/// - [`ConfigError::ConfigNotFound`] when neither argument is given or the
///   config file is missing.
/// - [`ConfigError::ConfigRead`] when the config file cannot be parsed.
/// - [`ConfigError::DatabaseNotFound`] when the store file is missing.
pub fn resolve_database_path(file: Option<&Path>, config: Option<&Path>) -> Result<PathBuf> {
    let path = match (file, config) {
        (_, Some(config)) => {
            if is_missing(config) {
                return Err(ConfigError::ConfigNotFound(Some(config.to_path_buf())));
            }
            let loaded = FirewallConfig::load(config)
                .map_err(|err| ConfigError::ConfigRead(Box::new(err)))?;
            let path = loaded.database_path();
            debug!(
                config = %config.display(),
                store = %path.display(),
                "resolved store from config"
            );
            path
        }
        (Some(file), None) => file.to_path_buf(),
        (None, None) => return Err(ConfigError::ConfigNotFound(None)),
    };

    if is_missing(&path) {
        return Err(ConfigError::DatabaseNotFound(path));
    }
    Ok(path)
}

// Only a definite "does not exist" counts; other stat failures surface on open.
fn is_missing(path: &Path) -> bool {
    matches!(path.try_exists(), Ok(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
targetIP: 192.168.1.20
dbms: postgres
dbDir: /srv/model
threads: 4
"#;
        let config: FirewallConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.target_ip(), "192.168.1.20");
        assert_eq!(config.dbms(), "postgres");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/model/192.168.1.20_postgres.db")
        );
    }

    #[test]
    fn test_defaults() {
        let config = FirewallConfig::default();
        assert_eq!(config.target_ip(), "");
        assert_eq!(config.dbms(), DEFAULT_DBMS);
        assert_eq!(
            config.database_path(),
            std::env::temp_dir().join("model").join("_mysql.db")
        );
    }

    #[test]
    fn test_neither_argument() {
        assert!(matches!(
            resolve_database_path(None, None),
            Err(ConfigError::ConfigNotFound(None))
        ));
    }

    #[test]
    fn test_missing_store_file() {
        let err = resolve_database_path(Some(Path::new("/definitely/not/here.db")), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DatabaseNotFound(_)));
        assert_eq!(err.path(), Some(Path::new("/definitely/not/here.db")));
    }

    #[test]
    fn test_serialize_skips_unset_keys() {
        let config = FirewallConfig {
            target_ip: Some("10.0.0.1".into()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("targetIP: 10.0.0.1"));
        assert!(!yaml.contains("dbms"));
    }
}
