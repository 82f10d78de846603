//! Error type for `phonebook-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

use crate::encode::is_unique_violation;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] phonebook_core::Error),

  /// The database could not be opened at all.
  #[error("cannot open phonebook at {path:?}: {source}")]
  Connect {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  /// The phone number already belongs to a different contact.
  #[error("phone number {phone:?} is already taken")]
  Conflict { phone: String },

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl Error {
  /// Turn a failed write of `phone` into [`Error::Conflict`] when the phone
  /// uniqueness constraint is what failed.
  pub(crate) fn from_write(err: tokio_rusqlite::Error, phone: &str) -> Self {
    match &err {
      tokio_rusqlite::Error::Rusqlite(inner) if is_unique_violation(inner) => {
        Error::Conflict { phone: phone.to_owned() }
      }
      _ => Error::Database(err),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
