//! Error types for `phonebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid phone number: {0:?}")]
  InvalidPhone(String),

  /// A delete was requested without a name or a phone number.
  #[error("no identifier provided: supply a name or a phone number")]
  MissingIdentifier,

  #[error("bulk insert needs one phone per name (got {names} names, {phones} phones)")]
  LengthMismatch { names: usize, phones: usize },

  #[error("page numbers start at 1")]
  InvalidPage,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
