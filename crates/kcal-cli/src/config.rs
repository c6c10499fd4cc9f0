//! Configuration loading.
//!
//! Sources merge in order, later ones winning: built-in defaults, then
//! `<config_dir>/kcal/config.toml`, then the file given with `--config`, then
//! `KCAL_*` environment variables (`KCAL_DATABASE_PATH`).

use std::io;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Settings for the `kcal` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `SQLite` file holding the ledger.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("kcal.db"),
        }
    }
}

impl Config {
    /// Loads configuration, optionally layering an explicit file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("KCAL_")).extract()
    }

    /// Creates the directory the database file lives in.
    pub fn ensure_database_dir(&self) -> io::Result<()> {
        match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kcal"))
}

/// `~/.local/share/kcal` on Linux.
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("kcal"))
}
