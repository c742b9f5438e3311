//! Configuration validation utilities
//!
//! This module provides runtime validation of store configurations, split
//! by aspect so a failing check names what is wrong.

use crate::config::StoreConfig;
use crate::record::RECORD_WIDTH;

/// Smallest erase block size accepted, in bytes
pub const MIN_ERASE_BLOCK_SIZE: usize = 256;

/// Largest erase block size accepted, in bytes
pub const MAX_ERASE_BLOCK_SIZE: usize = 256 * 1024;

/// Largest region accepted, in bytes
///
/// The caller provides a staging buffer of the same size, normally in a
/// `static`, so this is also the RAM it must set aside.
pub const MAX_REGION_SIZE: usize = 256 * 1024;

/// Configuration validator for runtime verification
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a store configuration at runtime
    pub fn validate<C: StoreConfig>() -> Result<(), &'static str> {
        C::validate()
    }

    /// Validates the erase block size
    pub fn check_block_size<C: StoreConfig>() -> Result<(), &'static str> {
        let block = C::ERASE_BLOCK_SIZE;

        if block == 0 || !block.is_power_of_two() {
            return Err("ERASE_BLOCK_SIZE must be a power of 2");
        }

        if !(MIN_ERASE_BLOCK_SIZE..=MAX_ERASE_BLOCK_SIZE).contains(&block) {
            return Err("ERASE_BLOCK_SIZE should be between 256 bytes and 256KB");
        }

        Ok(())
    }

    /// Validates that the region covers a whole number of blocks
    pub fn check_region_size<C: StoreConfig>() -> Result<(), &'static str> {
        if C::REGION_SIZE == 0 {
            return Err("REGION_SIZE must be non-zero");
        }

        if C::ERASE_BLOCK_SIZE == 0 || C::REGION_SIZE % C::ERASE_BLOCK_SIZE != 0 {
            return Err("REGION_SIZE must be a multiple of ERASE_BLOCK_SIZE");
        }

        if C::REGION_SIZE > MAX_REGION_SIZE {
            return Err("REGION_SIZE should not exceed 256KB of staging RAM");
        }

        Ok(())
    }

    /// Validates that the counter record fits in the region
    pub fn check_record_placement<C: StoreConfig>() -> Result<(), &'static str> {
        if RECORD_WIDTH > C::REGION_SIZE {
            return Err("counter record does not fit inside the region");
        }

        Ok(())
    }

    /// Comprehensive validation of all configuration aspects
    pub fn validate_all<C: StoreConfig>() -> Result<(), &'static str> {
        Self::check_block_size::<C>()?;

        Self::check_region_size::<C>()?;

        Self::check_record_placement::<C>()?;

        Ok(())
    }
}

// Note: Geometry validation is performed at runtime only.
// Use ConfigValidator::validate_all::<YourConfig>() to validate configurations.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultConfig, define_store_config};

    #[test]
    fn test_default_config_validation() {
        assert!(ConfigValidator::validate_all::<DefaultConfig>().is_ok());
    }

    #[test]
    fn test_block_size_check() {
        assert!(ConfigValidator::check_block_size::<DefaultConfig>().is_ok());
    }

    #[test]
    fn test_region_size_check() {
        assert!(ConfigValidator::check_region_size::<DefaultConfig>().is_ok());
    }

    #[test]
    fn test_record_placement_check() {
        assert!(ConfigValidator::check_record_placement::<DefaultConfig>().is_ok());
    }

    define_store_config! {
        name: TinyBlockConfig,
        region_size: 1024,
        erase_block_size: 64,
    }

    #[test]
    fn test_tiny_block_rejected() {
        assert!(TinyBlockConfig::validate().is_ok());
        assert!(ConfigValidator::check_block_size::<TinyBlockConfig>().is_err());
        assert!(ConfigValidator::validate_all::<TinyBlockConfig>().is_err());
    }

    define_store_config! {
        name: HugeRegionConfig,
        region_size: 1024 * 1024,
        erase_block_size: 64 * 1024,
    }

    #[test]
    fn test_huge_region_rejected() {
        assert!(HugeRegionConfig::validate().is_ok());
        assert_eq!(
            ConfigValidator::check_region_size::<HugeRegionConfig>(),
            Err("REGION_SIZE should not exceed 256KB of staging RAM")
        );
    }
}
