//! CSV import: a header row followed by `name,phone` rows.
//!
//! Well-formed rows are handed to [`ContactStore::bulk_insert`], so phones
//! are validated and duplicates are skipped on conflict. Rows that cannot be
//! read as exactly two fields are reported as invalid without touching the
//! store.

use std::{fs::File, io::Read, path::Path};

use anyhow::Context as _;
use phonebook_core::{
  bulk::{BulkReport, InvalidReason},
  store::ContactStore,
};
use tracing::info;

/// Rows split into parallel lists, plus the rows that could not be used.
#[derive(Debug, Default)]
pub struct ParsedCsv {
  pub names:     Vec<String>,
  pub phones:    Vec<String>,
  pub malformed: BulkReport,
}

pub fn parse(reader: impl Read) -> ParsedCsv {
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let mut parsed = ParsedCsv::default();
  for result in rdr.records() {
    match result {
      Ok(record) if record.len() == 2 => {
        parsed.names.push(record[0].to_owned());
        parsed.phones.push(record[1].to_owned());
      }
      Ok(record) => {
        let line = record.position().map_or(0, |p| p.line());
        parsed.malformed.record_invalid(
          record.get(0).unwrap_or_default(),
          record.get(1).unwrap_or_default(),
          InvalidReason::Rejected(format!(
            "malformed row at line {line}: expected 2 fields, got {}",
            record.len()
          )),
        );
      }
      Err(e) => {
        parsed
          .malformed
          .record_invalid("", "", InvalidReason::Rejected(format!("unreadable row: {e}")));
      }
    }
  }
  parsed
}

/// Import every usable row of `reader` into `store`.
pub async fn import<S: ContactStore>(store: &S, reader: impl Read) -> anyhow::Result<BulkReport> {
  let ParsedCsv { names, phones, malformed } = parse(reader);
  let mut report = store.bulk_insert(names, phones).await?;
  report.merge(malformed);
  Ok(report)
}

pub async fn import_file<S: ContactStore>(store: &S, path: &Path) -> anyhow::Result<BulkReport> {
  let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
  let report = import(store, file).await?;
  info!(path = %path.display(), inserted = report.inserted, "csv import finished");
  Ok(report)
}
