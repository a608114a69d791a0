//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the optional TOML
//! file, then process environment (unprefixed, e.g. `PORT`,
//! `DATABASE_PATH`). A `.env` file is folded into the environment by `main`
//! before loading.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigError, Environment, File, Source};
use orbis_upstream::SourceConfig;
use serde::Deserialize;

/// File name of the cached summary image inside `cache_dir`.
pub const IMAGE_FILE: &str = "summary.png";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub database_path:         PathBuf,
  /// `sqlite://<path>` or a bare path; wins over `database_path` when set.
  pub database_url:          Option<String>,
  pub cache_dir:             PathBuf,
  pub countries_url:         String,
  pub rates_url:             String,
  pub upstream_timeout_secs: u64,
}

impl ServerConfig {
  /// Load from `file` (if it exists) and the process environment.
  pub fn load(file: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(
      File::from(file).required(false),
      Environment::default().try_parsing(true),
    )
  }

  fn from_sources<F>(file: F, env: Environment) -> Result<Self, ConfigError>
  where
    F: Source + Send + Sync + 'static,
  {
    let upstream = SourceConfig::default();
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("database_path", "countries.db")?
      .set_default("cache_dir", "cache")?
      .set_default("countries_url", upstream.countries_url)?
      .set_default("rates_url", upstream.rates_url)?
      .set_default("upstream_timeout_secs", upstream.timeout.as_secs())?
      .add_source(file)
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  /// Where the SQLite database lives.
  pub fn store_path(&self) -> PathBuf {
    match self.database_url.as_deref().filter(|u| !u.is_empty()) {
      Some(url) => {
        let path = url
          .strip_prefix("sqlite://")
          .or_else(|| url.strip_prefix("sqlite:"))
          .unwrap_or(url);
        expand_tilde(Path::new(path))
      }
      None => expand_tilde(&self.database_path),
    }
  }

  pub fn cache_dir(&self) -> PathBuf { expand_tilde(&self.cache_dir) }

  pub fn image_path(&self) -> PathBuf { self.cache_dir().join(IMAGE_FILE) }

  pub fn source_config(&self) -> SourceConfig {
    SourceConfig {
      countries_url: self.countries_url.clone(),
      rates_url:     self.rates_url.clone(),
      timeout:       Duration::from_secs(self.upstream_timeout_secs),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
