//! Storage region module
//!
//! This module describes the fixed, block-aligned span of flash dedicated to
//! the counter, and the static reservation that makes the build step deliver
//! it zero-filled.

pub mod geometry;
pub mod reserve;

// Re-export main types
pub use geometry::StorageRegion;
pub use reserve::{RESERVATION_ALIGN, ZeroedRegion, reserve_region};
