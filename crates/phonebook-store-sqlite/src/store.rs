//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::{debug, info, warn};

use phonebook_core::{
  bulk::{BulkReport, InvalidReason, pair_up},
  contact::{Contact, Upserted},
  phone::is_valid_phone,
  store::{ContactStore, DeleteKey, Page},
};

use crate::{
  Error, Result,
  encode::{contact_from_row, decode_count, encode_count, like_pattern},
  schema::{CONTACT_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A phonebook backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a phonebook at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path)
      .await
      .map_err(|source| Error::Connect { path: path.clone(), source })?;
    let store = Self { conn };
    store.init_schema().await.map_err(|e| match e {
      Error::Database(source) => Error::Connect { path: path.clone(), source },
      other => other,
    })?;
    debug!(path = %path.display(), "opened phonebook");
    Ok(store)
  }

  /// Open an in-memory phonebook — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|source| Error::Connect { path: ":memory:".into(), source })?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn ensure_schema(&self) -> Result<()> {
    self.init_schema().await?;
    info!("phonebook table ready");
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert(&self, name: String, phone: String) -> Result<Upserted> {
    let phone_for_err = phone.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock before the lookup, so no other
        // writer can slip in between the check and the write.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM phonebook WHERE first_name = ?1 ORDER BY id LIMIT 1",
            rusqlite::params![name],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match existing {
          Some(id) => {
            tx.execute(
              "UPDATE phonebook SET phone_number = ?1 WHERE id = ?2",
              rusqlite::params![phone, id],
            )?;
            Upserted::Updated(Contact { id, name, phone })
          }
          None => {
            tx.execute(
              "INSERT INTO phonebook (first_name, phone_number) VALUES (?1, ?2)",
              rusqlite::params![name, phone],
            )?;
            let id = tx.last_insert_rowid();
            Upserted::Inserted(Contact { id, name, phone })
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await
      .map_err(|e| Error::from_write(e, &phone_for_err))?;

    match &outcome {
      Upserted::Inserted(c) => info!(id = c.id, name = %c.name, "contact inserted"),
      Upserted::Updated(c) => info!(id = c.id, name = %c.name, "contact phone updated"),
    }
    Ok(outcome)
  }

  async fn bulk_insert(&self, names: Vec<String>, phones: Vec<String>) -> Result<BulkReport> {
    let pairs = pair_up(names, phones)?;
    let total = pairs.len();

    let report = self
      .conn
      .call(move |conn| {
        let mut report = BulkReport::default();
        let mut stmt = conn.prepare(
          "INSERT INTO phonebook (first_name, phone_number) VALUES (?1, ?2)
           ON CONFLICT(phone_number) DO NOTHING",
        )?;

        // Each pair commits on its own; one bad pair never undoes another.
        for (name, phone) in pairs {
          if !is_valid_phone(&phone) {
            report.record_invalid(name, phone, InvalidReason::MalformedPhone);
            continue;
          }
          let written = stmt.execute(rusqlite::params![name, phone]);
          match written {
            Ok(0) => report.skipped_duplicates += 1,
            Ok(_) => report.inserted += 1,
            Err(e) => report.record_invalid(name, phone, InvalidReason::Rejected(e.to_string())),
          }
        }

        Ok(report)
      })
      .await?;

    for entry in &report.invalid {
      warn!(name = %entry.name, phone = %entry.phone, reason = ?entry.reason, "bulk entry not imported");
    }
    info!(
      total,
      inserted = report.inserted,
      skipped_duplicates = report.skipped_duplicates,
      invalid = report.invalid.len(),
      "bulk insert finished"
    );
    Ok(report)
  }

  async fn delete(&self, key: DeleteKey) -> Result<usize> {
    let (sql, value) = match &key {
      DeleteKey::Name(name) => ("DELETE FROM phonebook WHERE first_name = ?1", name.clone()),
      DeleteKey::Phone(phone) => ("DELETE FROM phonebook WHERE phone_number = ?1", phone.clone()),
    };

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![value])?))
      .await?;

    info!(?key, removed, "delete finished");
    Ok(removed)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: i64) -> Result<Option<Contact>> {
    let contact = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CONTACT_COLUMNS} FROM phonebook WHERE id = ?1"),
              rusqlite::params![id],
              contact_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(contact)
  }

  async fn search(&self, pattern: String) -> Result<Vec<Contact>> {
    let like = like_pattern(&pattern);

    // LIKE is case-insensitive for ASCII letters.
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM phonebook
           WHERE first_name LIKE ?1 ESCAPE '\\'
              OR phone_number LIKE ?1 ESCAPE '\\'
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![like], contact_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(%pattern, hits = rows.len(), "search");
    Ok(rows)
  }

  async fn list(&self, page: Page) -> Result<Vec<Contact>> {
    let limit = encode_count(page.limit);
    let offset = encode_count(page.offset);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTACT_COLUMNS} FROM phonebook ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], contact_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM phonebook", [], |r| r.get(0))?))
      .await?;
    Ok(decode_count(n))
  }
}
