//! The numbered interactive menu.
//!
//! Reads one choice per line, prompts for that operation's arguments, runs it
//! against the store and prints the result. Operation failures are printed
//! and the loop continues; end of input or the exit choice ends the session.

use std::{
  io::{BufRead, Write},
  path::Path,
};

use anyhow::{Context as _, Result};
use phonebook_core::{
  bulk::split_flat,
  store::{ContactStore, DeleteRequest, Page},
};
use strum::{EnumIter, EnumMessage, FromRepr, IntoEnumIterator};
use thiserror::Error;
use tracing::debug;

use crate::{csv_import, render};

// ─── Choices ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumMessage, FromRepr)]
#[repr(u8)]
pub enum MenuChoice {
  #[strum(message = "Create the phonebook table")]
  CreateTable = 1,
  #[strum(message = "Search by pattern")]
  Search,
  #[strum(message = "Insert or update a contact")]
  Upsert,
  #[strum(message = "Insert many contacts")]
  InsertMany,
  #[strum(message = "Import contacts from a CSV file")]
  ImportCsv,
  #[strum(message = "List a page of contacts")]
  ListPage,
  #[strum(message = "List contacts by limit and offset")]
  ListRange,
  #[strum(message = "Delete by name or phone")]
  Delete,
  #[strum(message = "Exit")]
  Exit,
}

impl MenuChoice {
  pub fn parse(input: &str) -> Option<Self> {
    input.trim().parse::<u8>().ok().and_then(Self::from_repr)
  }
}

/// Input ran out in the middle of a prompt.
#[derive(Debug, Error)]
#[error("end of input")]
struct EndOfInput;

// ─── Menu ─────────────────────────────────────────────────────────────────────

pub struct Menu<'a, S, R, W> {
  store:     &'a S,
  input:     R,
  out:       W,
  page_size: usize,
}

impl<'a, S, R, W> Menu<'a, S, R, W>
where
  S: ContactStore,
  R: BufRead,
  W: Write,
{
  pub fn new(store: &'a S, input: R, out: W, page_size: usize) -> Self {
    Self { store, input, out, page_size }
  }

  pub async fn run(mut self) -> Result<()> {
    let last = MenuChoice::Exit as u8;
    loop {
      self.print_menu()?;
      let Some(line) = self.prompt(&format!("Enter your choice (1-{last}): "))? else {
        writeln!(self.out)?;
        break;
      };

      let Some(choice) = MenuChoice::parse(&line) else {
        writeln!(self.out, "Invalid choice. Please try again.")?;
        continue;
      };
      if choice == MenuChoice::Exit {
        writeln!(self.out, "Exiting...")?;
        break;
      }

      match self.dispatch(choice).await {
        Ok(()) => {}
        Err(e) if e.is::<EndOfInput>() => {
          writeln!(self.out)?;
          break;
        }
        Err(e) => {
          debug!(?choice, error = %e, "menu operation failed");
          writeln!(self.out, "Error: {e:#}")?;
        }
      }
    }
    self.out.flush()?;
    Ok(())
  }

  fn print_menu(&mut self) -> Result<()> {
    writeln!(self.out, "Choose an option:")?;
    for choice in MenuChoice::iter() {
      writeln!(
        self.out,
        "{}. {}",
        choice as u8,
        choice.get_message().unwrap_or_default()
      )?;
    }
    Ok(())
  }

  async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
    let store = self.store;
    match choice {
      MenuChoice::CreateTable => {
        store.ensure_schema().await?;
        writeln!(self.out, "Table created.")?;
      }
      MenuChoice::Search => {
        let pattern = self.ask("Enter the pattern to search: ")?;
        let hits = store.search(pattern).await?;
        render::contacts(&mut self.out, &hits)?;
      }
      MenuChoice::Upsert => {
        let name = self.ask("Enter the name: ")?;
        let phone = self.ask("Enter the phone: ")?;
        let up = store.upsert(name, phone).await?;
        render::upserted(&mut self.out, &up)?;
      }
      MenuChoice::InsertMany => {
        let line = self.ask("Enter users as name,phone pairs (comma-separated): ")?;
        if line.trim().is_empty() {
          writeln!(self.out, "Nothing to insert.")?;
          return Ok(());
        }
        let items: Vec<&str> = line.split(',').collect();
        let (names, phones) = split_flat(&items)?;
        let report = store.bulk_insert(names, phones).await?;
        render::report(&mut self.out, &report)?;
      }
      MenuChoice::ImportCsv => {
        let path = self.ask("Enter the CSV file path: ")?;
        let report = csv_import::import_file(store, Path::new(path.trim())).await?;
        render::report(&mut self.out, &report)?;
      }
      MenuChoice::ListPage => {
        let total = store.count().await?;
        let pages = Page::count_for(total, self.page_size);
        let number = self.ask_number(&format!("Enter page number (1-{pages}): "))?;
        let rows = store.list(Page::number(number, self.page_size)?).await?;
        render::contacts(&mut self.out, &rows)?;
        writeln!(self.out, "Page {number} of {pages}.")?;
      }
      MenuChoice::ListRange => {
        let limit = self.ask_number("Enter limit: ")?;
        let offset = self.ask_number("Enter offset: ")?;
        let rows = store.list(Page::new(limit, offset)).await?;
        render::contacts(&mut self.out, &rows)?;
      }
      MenuChoice::Delete => {
        let name = self.ask("Enter the name to delete (blank to use a phone): ")?;
        let phone = if name.trim().is_empty() {
          Some(self.ask("Enter the phone to delete: ")?)
        } else {
          None
        };
        let key = DeleteRequest { name: Some(name), phone }.resolve()?;
        let removed = store.delete(key).await?;
        writeln!(self.out, "Deleted {removed} contact(s).")?;
      }
      MenuChoice::Exit => {}
    }
    Ok(())
  }

  // ── Input ─────────────────────────────────────────────────────────────────

  /// Print `label` and read one line without its line ending. `None` at end
  /// of input.
  fn prompt(&mut self, label: &str) -> Result<Option<String>> {
    write!(self.out, "{label}")?;
    self.out.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line).context("reading input")? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
  }

  fn ask(&mut self, label: &str) -> Result<String> {
    self.prompt(label)?.ok_or_else(|| EndOfInput.into())
  }

  fn ask_number(&mut self, label: &str) -> Result<usize> {
    let raw = self.ask(label)?;
    raw
      .trim()
      .parse()
      .with_context(|| format!("{:?} is not a non-negative whole number", raw.trim()))
  }
}
