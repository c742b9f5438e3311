//! Error handling module for flashtally
//!
//! This module provides the error taxonomy for opening, reading, erasing and
//! programming the counter region.

pub mod medium;
pub mod region;
pub mod types;

// Re-export main types
pub use medium::MediumError;
pub use region::RegionError;
pub use types::{OpenFailure, StoreError, StoreResult};
