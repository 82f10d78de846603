//! Runtime configuration: defaults, then an optional TOML file, then
//! `PHONEBOOK_*` environment variables. Command-line flags are applied on top
//! by the caller.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Settings shared by the menu and the one-shot commands.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// SQLite file holding the phonebook. A leading `~/` is expanded.
  pub store_path: PathBuf,
  /// Contacts per page when listing by page number.
  pub page_size:  usize,
}

impl AppConfig {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "phonebook.db")?
      .set_default("page_size", 10)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("PHONEBOOK"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise configuration")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
