//! Block-erasable storage medium module
//!
//! This module defines the driver interface the store consumes, and a
//! RAM-backed simulation of NOR flash for hosts, tests and demos.

pub mod driver;
pub mod ram;

// Re-export main types
pub use driver::StorageMedium;
pub use ram::{MediumStats, RamMedium};
