//! SQL schema for the phonebook SQLite store.
//!
//! Executed at connection startup and on demand. `PRAGMA user_version` records
//! the layout revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Names may repeat; phone numbers may not.
-- AUTOINCREMENT keeps ids of deleted contacts from being reused.
CREATE TABLE IF NOT EXISTS phonebook (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    VARCHAR(50) NOT NULL CHECK (length(first_name) <= 50),
    phone_number  VARCHAR(20) NOT NULL UNIQUE CHECK (length(phone_number) <= 20)
);

CREATE INDEX IF NOT EXISTS phonebook_name_idx ON phonebook(first_name);

PRAGMA user_version = 1;
";

/// Columns selected wherever a [`phonebook_core::contact::Contact`] is read.
pub const CONTACT_COLUMNS: &str = "id, first_name, phone_number";
