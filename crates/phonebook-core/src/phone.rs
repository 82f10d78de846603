//! Phone number shape check.
//!
//! Accepts an optional leading `+` followed by 7 to 15 characters drawn from
//! ASCII digits, ASCII whitespace and `-`. Country codes and digit counts are
//! not checked.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\+?(?-u:[-\d\s]){7,15}$").expect("phone pattern is a valid regex")
});

/// Whether `phone` has the shape of an international-ish phone number.
pub fn is_valid_phone(phone: &str) -> bool { PHONE.is_match(phone) }

/// Like [`is_valid_phone`], but returns the offending value as an error.
pub fn validate_phone(phone: &str) -> Result<()> {
  if is_valid_phone(phone) {
    Ok(())
  } else {
    Err(Error::InvalidPhone(phone.to_owned()))
  }
}
