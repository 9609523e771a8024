//! Locating the learned pattern store of a database firewall.
//!
//! A store file is named either directly or through the firewall's YAML
//! configuration. [`resolve_database_path`] applies the lookup rules and
//! reports failures as [`ConfigError`]s whose messages are shown to users.
//!
//! ```no_run
//! use std::path::Path;
//! use pattern_store_config::resolve_database_path;
//!
//! let path = resolve_database_path(None, Some(Path::new("/etc/dbshield.yml"))).unwrap();
//! println!("store: {}", path.display());
//! ```

mod config;
mod error;

pub use config::{DEFAULT_DB_DIR_NAME, DEFAULT_DBMS, FirewallConfig, resolve_database_path};
pub use error::{ConfigError, Result};
