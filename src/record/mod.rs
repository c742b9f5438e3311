//! Persisted record layout
//!
//! This module defines the counter record and where it lives inside the
//! region. Everything after the record is reserved padding that exists only
//! to fill the region out to whole erase blocks.

pub mod counter;

// Re-export main types
pub use counter::{CounterRecord, ERASED_BYTE, RECORD_OFFSET, RECORD_WIDTH};
