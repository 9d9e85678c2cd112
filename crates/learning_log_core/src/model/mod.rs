//! Journal domain model.
//!
//! # Responsibility
//! - Define the topic/entry records shared by storage, service and views.
//! - Keep identity opaque: the core only compares it for equality.
//!
//! # Invariants
//! - Every topic and entry is identified by a stable UUID.
//! - Every entry points at exactly one parent topic.
//! - A topic's owner is fixed when the topic is created.

pub mod entry;
pub mod identity;
pub mod topic;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch collapse to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
