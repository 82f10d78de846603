//! Plain-text and JSON output for contacts and import reports.

use std::io::{self, Write};

use phonebook_core::{
  bulk::{BulkReport, InvalidReason},
  contact::{Contact, Upserted},
};
use serde::Serialize;

pub const NO_RECORDS: &str = "No records found.";

/// One contact per line, columns aligned; [`NO_RECORDS`] when empty.
pub fn contacts(out: &mut impl Write, contacts: &[Contact]) -> io::Result<()> {
  if contacts.is_empty() {
    return writeln!(out, "{NO_RECORDS}");
  }

  let id_w = contacts.iter().map(|c| c.id.to_string().len()).max().unwrap_or(2).max(2);
  let name_w = contacts.iter().map(|c| c.name.chars().count()).max().unwrap_or(4).max(4);

  writeln!(out, "{:>id_w$}  {:<name_w$}  phone", "id", "name")?;
  for c in contacts {
    writeln!(out, "{:>id_w$}  {:<name_w$}  {}", c.id, c.name, c.phone)?;
  }
  Ok(())
}

pub fn upserted(out: &mut impl Write, up: &Upserted) -> io::Result<()> {
  match up {
    Upserted::Inserted(c) => writeln!(out, "Inserted {} ({}) as #{}.", c.name, c.phone, c.id),
    Upserted::Updated(c) => writeln!(out, "Updated #{} {}: phone is now {}.", c.id, c.name, c.phone),
  }
}

pub fn report(out: &mut impl Write, report: &BulkReport) -> io::Result<()> {
  writeln!(
    out,
    "Inserted {}, skipped {} duplicate(s), {} invalid.",
    report.inserted,
    report.skipped_duplicates,
    report.invalid.len()
  )?;
  for entry in &report.invalid {
    let why = match &entry.reason {
      InvalidReason::MalformedPhone => "malformed phone",
      InvalidReason::Rejected(msg) => msg.as_str(),
    };
    writeln!(out, "  invalid: {:?}, {:?} ({why})", entry.name, entry.phone)?;
  }
  Ok(())
}

pub fn json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buf = Vec::new();
    f(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
  }

  #[test]
  fn empty_list_says_so() {
    assert_eq!(render(|o| contacts(o, &[])), "No records found.\n");
  }

  #[test]
  fn contacts_are_aligned() {
    let list = [
      Contact { id: 1, name: "Ann".into(), phone: "5551234".into() },
      Contact { id: 12, name: "Bartholomew".into(), phone: "+7 701 000".into() },
    ];
    let text = render(|o| contacts(o, &list));
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "id  name         phone");
    assert_eq!(lines[1], " 1  Ann          5551234");
    assert_eq!(lines[2], "12  Bartholomew  +7 701 000");
  }

  #[test]
  fn report_lists_invalid_entries() {
    let mut r = BulkReport { inserted: 2, ..Default::default() };
    r.record_invalid("B", "bad", InvalidReason::MalformedPhone);
    let text = render(|o| report(o, &r));
    assert!(text.starts_with("Inserted 2, skipped 0 duplicate(s), 1 invalid."));
    assert!(text.contains("invalid: \"B\", \"bad\" (malformed phone)"));
  }
}
