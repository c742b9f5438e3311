//! Store configuration trait and default implementation
//!
//! This module defines the StoreConfig trait that fixes the counter region's
//! geometry at compile time.

use crate::error::RegionError;
use crate::record::RECORD_WIDTH;
use crate::region::StorageRegion;

/// Store configuration trait for compile-time region geometry
///
/// The erase block size is a property of the target's flash part. It is
/// configured here, never chosen by the store. The region size must be an
/// exact multiple of it.
pub trait StoreConfig: Clone {
    /// Total size of the reserved region in bytes
    const REGION_SIZE: usize;

    /// Erase block (sector) size of the backing medium in bytes
    const ERASE_BLOCK_SIZE: usize;

    /// Validates that the configuration is consistent
    fn validate() -> Result<(), &'static str> {
        if Self::ERASE_BLOCK_SIZE == 0 {
            return Err("ERASE_BLOCK_SIZE must be non-zero");
        }

        if !Self::ERASE_BLOCK_SIZE.is_power_of_two() {
            return Err("ERASE_BLOCK_SIZE must be a power of 2");
        }

        if Self::REGION_SIZE == 0 {
            return Err("REGION_SIZE must be non-zero");
        }

        if Self::REGION_SIZE % Self::ERASE_BLOCK_SIZE != 0 {
            return Err("REGION_SIZE must be a multiple of ERASE_BLOCK_SIZE");
        }

        if RECORD_WIDTH > Self::REGION_SIZE {
            return Err("counter record does not fit inside the region");
        }

        Ok(())
    }

    /// Number of erase blocks covered by the region
    fn block_count() -> usize {
        if Self::ERASE_BLOCK_SIZE == 0 {
            return 0;
        }
        Self::REGION_SIZE / Self::ERASE_BLOCK_SIZE
    }

    /// Bytes of the region not occupied by the counter record
    fn reserved_bytes() -> usize {
        Self::REGION_SIZE.saturating_sub(RECORD_WIDTH)
    }

    /// Builds a validated region of this geometry at `base_address`
    fn region_at(base_address: usize) -> Result<StorageRegion, RegionError> {
        StorageRegion::new(base_address, Self::REGION_SIZE, Self::ERASE_BLOCK_SIZE)
    }
}

/// Default configuration: 64 KiB region on 4 KiB erase sectors
#[derive(Debug, Clone, Copy)]
pub struct DefaultConfig;

impl Default for DefaultConfig {
    fn default() -> Self {
        Self
    }
}

impl StoreConfig for DefaultConfig {
    const REGION_SIZE: usize = 64 * 1024; // 64KB
    const ERASE_BLOCK_SIZE: usize = 4 * 1024; // 4KB sectors
}
