//! `sift.toml` configuration.
//!
//! ```toml
//! [database]
//! engine = "postgres"      # postgres | mysql | sqlite
//!
//! [pagination]
//! default_page_size = 50
//! max_page_size = 500
//!
//! [normalization]
//! kana = "katakana"        # katakana | none
//! ```
//!
//! Every key is optional. `SIFT_DATABASE` overrides `database.engine`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::SearchError;
use crate::filters::{IdentityKana, KanaNormalizer, KatakanaNormalizer};
use crate::search::{DatabaseEngine, Pagination};

pub const CONFIG_FILE_NAME: &str = "sift.toml";
pub const DATABASE_ENV: &str = "SIFT_DATABASE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub normalization: NormalizationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub engine: DatabaseEngine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    500
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KanaMode {
    #[default]
    Katakana,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationSettings {
    #[serde(default)]
    pub kana: KanaMode,
}

impl SiftConfig {
    /// Loads `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: SiftConfig = toml::from_str(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Looks for `sift.toml` in `start` and its ancestors; defaults when none exists.
    pub fn find_from(start: &Path) -> Result<Self, SearchError> {
        match Self::locate(start) {
            Some(path) => Self::load(&path),
            None => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                Ok(config)
            }
        }
    }

    fn locate(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), SearchError> {
        if let Ok(engine) = std::env::var(DATABASE_ENV) {
            self.database.engine = engine.parse()?;
        }
        Ok(())
    }

    pub fn kana_normalizer(&self) -> Arc<dyn KanaNormalizer> {
        match self.normalization.kana {
            KanaMode::Katakana => Arc::new(KatakanaNormalizer),
            KanaMode::None => Arc::new(IdentityKana),
        }
    }

    /// Page request clamped to the configured limits.
    pub fn pagination(&self, page: Option<u32>, page_size: Option<u32>) -> Pagination {
        Pagination::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.pagination.default_page_size),
            self.pagination.max_page_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    #[serial]
    fn defaults_without_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = SiftConfig::find_from(dir.path()).expect("config");

        assert_eq!(config.database.engine, DatabaseEngine::Postgres);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.pagination.max_page_size, 500);
        assert_eq!(config.normalization.kana, KanaMode::Katakana);
    }

    #[test]
    #[serial]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(
            dir.path(),
            "[database]\nengine = \"mysql\"\n\n[pagination]\nmax_page_size = 100\n",
        );

        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("nested dirs");
        let config = SiftConfig::find_from(&nested).expect("config");

        assert_eq!(config.database.engine, DatabaseEngine::MySql);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.pagination(Some(2), Some(1000)), Pagination { page: 2, page_size: 100 });
    }

    #[test]
    #[serial]
    fn environment_overrides_engine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "[database]\nengine = \"mysql\"\n");

        // SAFETY: the serial attribute keeps other tests from touching the environment concurrently.
        unsafe { std::env::set_var(DATABASE_ENV, "sqlite") };
        let config = SiftConfig::load(&path);
        unsafe { std::env::remove_var(DATABASE_ENV) };

        assert_eq!(config.expect("config").database.engine, DatabaseEngine::Sqlite);
    }

    #[test]
    #[serial]
    fn rejects_unknown_engine() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "[database]\nengine = \"oracle\"\n");

        assert!(matches!(SiftConfig::load(&path), Err(SearchError::Config(_))));
    }

    #[test]
    fn identity_kana_mode() {
        let config: SiftConfig =
            toml::from_str("[normalization]\nkana = \"none\"\n").expect("config");
        assert_eq!(config.kana_normalizer().normalize("やまだ"), "やまだ");
        assert_eq!(SiftConfig::default().kana_normalizer().normalize("やまだ"), "ヤマダ");
    }

    #[test]
    fn round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&SiftConfig::default()).expect("serialize");
        assert!(rendered.contains("engine = \"postgres\""));
        assert!(rendered.contains("default_page_size = 50"));
    }
}
