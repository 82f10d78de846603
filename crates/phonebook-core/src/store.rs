//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `phonebook-store-sqlite`). The command-line front end depends on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  bulk::BulkReport,
  contact::{Contact, Upserted},
};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A bounded slice of the phonebook, ordered by contact id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub limit:  usize,
  pub offset: usize,
}

impl Page {
  pub fn new(limit: usize, offset: usize) -> Self { Self { limit, offset } }

  /// Page `number` (1-based) of `limit` contacts each.
  pub fn number(number: usize, limit: usize) -> Result<Self> {
    let index = number.checked_sub(1).ok_or(Error::InvalidPage)?;
    Ok(Self { limit, offset: index.saturating_mul(limit) })
  }

  /// Number of pages needed to show `total` contacts; at least one.
  pub fn count_for(total: usize, limit: usize) -> usize {
    if limit == 0 { 1 } else { total.div_ceil(limit).max(1) }
  }
}

// ─── Deletion ────────────────────────────────────────────────────────────────

/// Caller input for a deletion. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteRequest {
  pub name:  Option<String>,
  pub phone: Option<String>,
}

/// The exact-match key a deletion runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteKey {
  /// Every contact with this name.
  Name(String),
  /// The contact with this phone number.
  Phone(String),
}

impl DeleteRequest {
  /// Pick the key to delete by. A name takes precedence over a phone.
  pub fn resolve(self) -> Result<DeleteKey> {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    match (present(self.name), present(self.phone)) {
      (Some(name), _) => Ok(DeleteKey::Name(name)),
      (None, Some(phone)) => Ok(DeleteKey::Phone(phone)),
      (None, None) => Err(Error::MissingIdentifier),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a phonebook storage backend.
///
/// All methods return `Send` futures so the trait can be driven from a
/// multi-threaded tokio runtime.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the contacts table if it does not exist yet.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert `(name, phone)`, or replace the phone of the existing contact
  /// called `name`. The existence check and the write are atomic.
  ///
  /// Fails if `phone` already belongs to another contact.
  fn upsert(
    &self,
    name: String,
    phone: String,
  ) -> impl Future<Output = Result<Upserted, Self::Error>> + Send + '_;

  /// Validate and insert each pair independently. Duplicate phones are
  /// skipped; malformed or rejected pairs are collected in the report.
  ///
  /// Fails up front if the lists differ in length.
  fn bulk_insert(
    &self,
    names: Vec<String>,
    phones: Vec<String>,
  ) -> impl Future<Output = Result<BulkReport, Self::Error>> + Send + '_;

  /// Remove every contact matching `key` exactly; returns the number removed.
  fn delete(&self, key: DeleteKey) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get(&self, id: i64) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over names and phone numbers.
  fn search(
    &self,
    pattern: String,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// One page of contacts in id order.
  fn list(&self, page: Page) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Total number of stored contacts.
  fn count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
