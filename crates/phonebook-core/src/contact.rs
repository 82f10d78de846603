//! Contact — a single phonebook row.

use serde::{Deserialize, Serialize};

/// Maximum length of a contact name, in characters.
pub const NAME_MAX_LEN: usize = 50;

/// Maximum length of a stored phone number, in characters.
pub const PHONE_MAX_LEN: usize = 20;

/// A stored contact. Phone numbers are unique across the phonebook; names are
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  /// Store-assigned; never changes after insertion.
  pub id:    i64,
  pub name:  String,
  pub phone: String,
}

/// What [`crate::store::ContactStore::upsert`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "contact", rename_all = "snake_case")]
pub enum Upserted {
  /// No contact had the name; a new one was created.
  Inserted(Contact),
  /// An existing contact's phone number was replaced.
  Updated(Contact),
}

impl Upserted {
  pub fn contact(&self) -> &Contact {
    match self {
      Self::Inserted(c) | Self::Updated(c) => c,
    }
  }

  pub fn into_contact(self) -> Contact {
    match self {
      Self::Inserted(c) | Self::Updated(c) => c,
    }
  }
}
