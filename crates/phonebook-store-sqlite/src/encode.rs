//! Conversions between domain types and SQLite rows and parameters.

use phonebook_core::contact::Contact;
use rusqlite::{ErrorCode, Row, ffi};

/// Build a [`Contact`] from a row selected with
/// [`crate::schema::CONTACT_COLUMNS`].
pub fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
  Ok(Contact {
    id:    row.get(0)?,
    name:  row.get(1)?,
    phone: row.get(2)?,
  })
}

/// SQLite integers are signed; clamp anything larger than `i64::MAX`.
pub fn encode_count(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

pub fn decode_count(n: i64) -> usize { usize::try_from(n).unwrap_or(0) }

/// Wrap `needle` for a `LIKE … ESCAPE '\'` substring match, escaping the
/// wildcard characters it contains.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for ch in needle.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

/// Whether `err` is a UNIQUE (or primary key) constraint failure.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
  match err {
    rusqlite::Error::SqliteFailure(e, _) => {
      e.code == ErrorCode::ConstraintViolation
        && matches!(
          e.extended_code,
          ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
    _ => false,
  }
}
