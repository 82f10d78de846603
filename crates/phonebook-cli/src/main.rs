//! `phonebook` — command-line phonebook backed by SQLite.
//!
//! # Usage
//!
//! ```text
//! phonebook                                  # interactive menu
//! phonebook --store-path ~/contacts.db list --page 2
//! phonebook bulk --name Ann --phone 5551234 --name Bob --phone 5555678
//! phonebook import contacts.csv
//! ```

mod csv_import;
mod menu;
mod render;
mod settings;

use std::{
  io::{self, Write as _},
  path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use phonebook_core::store::{ContactStore, DeleteRequest, Page};
use phonebook_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{menu::Menu, settings::AppConfig};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "phonebook", version, about = "Command-line phonebook")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "phonebook.toml")]
  config: PathBuf,

  /// SQLite file to use; overrides the configuration.
  #[arg(long, value_name = "PATH")]
  store_path: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the interactive menu (the default).
  Menu,
  /// Create the phonebook table.
  Init,
  /// Case-insensitive substring search over names and phones.
  Search {
    pattern: String,
    #[arg(long)]
    json:    bool,
  },
  /// Insert a contact, or replace the phone of the contact with this name.
  Upsert { name: String, phone: String },
  /// Insert many contacts; pass `--name` and `--phone` once per contact.
  Bulk {
    #[arg(long = "name", required = true)]
    names:  Vec<String>,
    #[arg(long = "phone", required = true)]
    phones: Vec<String>,
    #[arg(long)]
    json:   bool,
  },
  /// Import a CSV file with a header row and `name,phone` rows.
  Import {
    file: PathBuf,
    #[arg(long)]
    json: bool,
  },
  /// Show one contact by id.
  Show {
    id:   i64,
    #[arg(long)]
    json: bool,
  },
  /// List contacts in id order, by page number or by offset.
  List {
    /// 1-based page number.
    #[arg(long, conflicts_with = "offset")]
    page:   Option<usize>,
    /// Contacts per page (defaults to the configured page size).
    #[arg(long)]
    limit:  Option<usize>,
    #[arg(long)]
    offset: Option<usize>,
    #[arg(long)]
    json:   bool,
  },
  /// Delete every contact with this name, or the contact with this phone.
  Delete {
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    phone: Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so they never interleave with menu output.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = AppConfig::load(&cli.config)?;
  if let Some(path) = cli.store_path {
    cfg.store_path = settings::expand_tilde(&path);
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open phonebook at {}", cfg.store_path.display()))?;

  run(&store, &cfg, cli.command.unwrap_or(Command::Menu)).await
}

async fn run(store: &SqliteStore, cfg: &AppConfig, command: Command) -> anyhow::Result<()> {
  let mut out = io::stdout().lock();

  match command {
    Command::Menu => {
      Menu::new(store, io::stdin().lock(), out, cfg.page_size).run().await?;
    }
    Command::Init => {
      store.ensure_schema().await?;
      writeln!(out, "Table created.")?;
    }
    Command::Search { pattern, json } => {
      let hits = store.search(pattern).await?;
      if json {
        render::json(&mut out, &hits)?;
      } else {
        render::contacts(&mut out, &hits)?;
      }
    }
    Command::Upsert { name, phone } => {
      let up = store.upsert(name, phone).await?;
      render::upserted(&mut out, &up)?;
    }
    Command::Bulk { names, phones, json } => {
      let report = store.bulk_insert(names, phones).await?;
      if json {
        render::json(&mut out, &report)?;
      } else {
        render::report(&mut out, &report)?;
      }
    }
    Command::Import { file, json } => {
      let report = csv_import::import_file(store, &file).await?;
      if json {
        render::json(&mut out, &report)?;
      } else {
        render::report(&mut out, &report)?;
      }
    }
    Command::Show { id, json } => {
      let contact = store.get(id).await?;
      if json {
        render::json(&mut out, &contact)?;
      } else {
        render::contacts(&mut out, contact.as_slice())?;
      }
    }
    Command::List { page, limit, offset, json } => {
      let limit = limit.unwrap_or(cfg.page_size);
      let page = match offset {
        Some(offset) => Page::new(limit, offset),
        None => Page::number(page.unwrap_or(1), limit)?,
      };
      let rows = store.list(page).await?;
      if json {
        render::json(&mut out, &rows)?;
      } else {
        render::contacts(&mut out, &rows)?;
      }
    }
    Command::Delete { name, phone } => {
      let key = DeleteRequest { name, phone }.resolve()?;
      let removed = store.delete(key).await?;
      writeln!(out, "Deleted {removed} contact(s).")?;
    }
  }

  Ok(())
}
