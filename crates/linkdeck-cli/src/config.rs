//! `linkdeck.toml` loading.
//!
//! Lookup order: `--config`, `LINKDECK_CONFIG`, `./linkdeck.toml`, built-in
//! defaults. `LINKDECK_DATA` and `LINKDECK_USER` override single fields after
//! the file is read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use linkdeck_state::MutationPolicies;

use crate::formatter::OutputFormat;

pub const CONFIG_FILE: &str = "linkdeck.toml";
pub const CONFIG_ENV: &str = "LINKDECK_CONFIG";
pub const DATA_ENV: &str = "LINKDECK_DATA";
pub const USER_ENV: &str = "LINKDECK_USER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON document holding every user's links.
    pub data_file: PathBuf,
    /// Identity whose collection is loaded.
    pub user: String,
    pub format: OutputFormat,
    /// `copy` also writes the system clipboard; the url is printed either way.
    pub clipboard: bool,
    pub policy: MutationPolicies,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("linkdeck.json"),
            user: "local".to_string(),
            format: OutputFormat::Table,
            clipboard: true,
            policy: MutationPolicies::default(),
        }
    }
}

impl Config {
    /// Resolve and read the configuration, then apply env overrides.
    ///
    /// An explicitly named file (flag or env) must exist; the implicit
    /// `./linkdeck.toml` is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::read(&path)?,
            None => {
                let implicit = PathBuf::from(CONFIG_FILE);
                if implicit.is_file() {
                    Self::read(&implicit)?
                } else {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(
            std::env::var(DATA_ENV).ok(),
            std::env::var(USER_ENV).ok(),
        );
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, data_file: Option<String>, user: Option<String>) {
        if let Some(data) = data_file.filter(|d| !d.trim().is_empty()) {
            self.data_file = PathBuf::from(data);
        }
        if let Some(user) = user.filter(|u| !u.trim().is_empty()) {
            self.user = user.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdeck_state::{FailurePolicy, MutationPolicy};

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.clipboard);
    }

    #[test]
    fn parse_full_file() {
        let config = Config::parse(
            r#"
data_file = "/tmp/links.json"
user = "alice"
format = "json"
clipboard = false

[policy]
create = "optimistic"
on_failure = "rollback"
"#,
        )
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/links.json"));
        assert_eq!(config.user, "alice");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.clipboard);
        assert_eq!(config.policy.create, MutationPolicy::Optimistic);
        assert_eq!(config.policy.update, MutationPolicy::ConfirmedOnly);
        assert_eq!(config.policy.delete, MutationPolicy::Optimistic);
        assert_eq!(config.policy.on_failure, FailurePolicy::Rollback);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn overrides_replace_single_fields() {
        let mut config = Config::default();
        config.apply_overrides(Some("other.json".to_string()), None);
        assert_eq!(config.data_file, PathBuf::from("other.json"));
        assert_eq!(config.user, "local");

        config.apply_overrides(Some(String::new()), Some(" bob ".to_string()));
        assert_eq!(config.data_file, PathBuf::from("other.json"));
        assert_eq!(config.user, "bob");
    }

    #[test]
    fn read_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::read(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
