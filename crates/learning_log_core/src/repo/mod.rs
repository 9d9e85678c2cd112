//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the journal service depends on.
//! - Isolate SQLite query details from ownership and form logic.
//!
//! # Invariants
//! - Repositories never filter by owner on id lookups; ownership is decided
//!   by the service, so absence and foreign ownership look the same upstream.
//! - Repository APIs return semantic errors (`EntryNotFound`) in addition to
//!   DB transport errors.

pub mod journal_repo;
