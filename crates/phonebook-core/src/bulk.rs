//! Bulk import bookkeeping.
//!
//! A bulk import processes every (name, phone) pair on its own. Pairs that
//! cannot be stored end up in [`BulkReport::invalid`]; pairs whose phone is
//! already taken are counted as skipped duplicates and are not errors.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Why a pair was left out of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InvalidReason {
  /// The phone failed the shape check; no insert was attempted.
  MalformedPhone,
  /// The insert was attempted and refused by the store.
  Rejected(String),
}

/// A pair that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidEntry {
  pub name:   String,
  pub phone:  String,
  pub reason: InvalidReason,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
  pub inserted:           usize,
  pub skipped_duplicates: usize,
  pub invalid:            Vec<InvalidEntry>,
}

impl BulkReport {
  pub fn record_invalid(
    &mut self,
    name: impl Into<String>,
    phone: impl Into<String>,
    reason: InvalidReason,
  ) {
    self.invalid.push(InvalidEntry { name: name.into(), phone: phone.into(), reason });
  }

  /// Fold another report into this one.
  pub fn merge(&mut self, other: BulkReport) {
    self.inserted += other.inserted;
    self.skipped_duplicates += other.skipped_duplicates;
    self.invalid.extend(other.invalid);
  }

  /// Total number of pairs accounted for.
  pub fn processed(&self) -> usize {
    self.inserted + self.skipped_duplicates + self.invalid.len()
  }

  /// The invalid pairs as `(name, phone)` tuples, in input order.
  pub fn invalid_pairs(&self) -> Vec<(&str, &str)> {
    self
      .invalid
      .iter()
      .map(|e| (e.name.as_str(), e.phone.as_str()))
      .collect()
  }
}

/// Zip parallel name and phone lists, refusing lists of different lengths.
pub fn pair_up(names: Vec<String>, phones: Vec<String>) -> Result<Vec<(String, String)>> {
  if names.len() != phones.len() {
    return Err(Error::LengthMismatch { names: names.len(), phones: phones.len() });
  }
  Ok(names.into_iter().zip(phones).collect())
}

/// Split a flat `name,phone,name,phone,…` list into parallel lists.
///
/// Items are trimmed. A trailing name without a phone is an error.
pub fn split_flat(items: &[&str]) -> Result<(Vec<String>, Vec<String>)> {
  if items.len() % 2 != 0 {
    return Err(Error::LengthMismatch {
      names:  items.len().div_ceil(2),
      phones: items.len() / 2,
    });
  }
  Ok(
    items
      .chunks_exact(2)
      .map(|pair| (pair[0].trim().to_owned(), pair[1].trim().to_owned()))
      .unzip(),
  )
}
