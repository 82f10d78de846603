//! Core types and trait definitions for the phonebook.
//!
//! This crate is deliberately free of database dependencies. The storage
//! backend and the command-line front end both depend on it.

pub mod bulk;
pub mod contact;
pub mod error;
pub mod phone;
pub mod store;

pub use error::{Error, Result};
