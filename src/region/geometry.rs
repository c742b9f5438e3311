//! Region geometry
//!
//! A region is a contiguous span of block-erasable storage. It is sized and
//! aligned to whole erase blocks, allocated once at image-build time and never
//! resized or relocated.

use crate::error::RegionError;

#[cfg(feature = "defmt")]
use defmt::Format;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A block-aligned span of persistent storage
///
/// Construction validates the geometry, so every `StorageRegion` value
/// satisfies:
/// - `erase_block_size` is a non-zero power of two
/// - `size_bytes` is a non-zero multiple of `erase_block_size`
/// - `base_address` is a multiple of `erase_block_size`
/// - `base_address + size_bytes` does not overflow
///
/// # Example
/// ```rust
/// use flashtally::region::StorageRegion;
/// use flashtally::error::RegionError;
///
/// let region = StorageRegion::new(0x1001_0000, 64 * 1024, 4096)?;
/// assert_eq!(region.block_count(), 16);
/// assert_eq!(region.end_address(), 0x1002_0000);
///
/// assert_eq!(
///     StorageRegion::new(0x1001_0000, 6000, 4096),
///     Err(RegionError::SizeNotBlockMultiple)
/// );
/// # Ok::<(), RegionError>(())
/// ```
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageRegion {
    base_address: usize,
    size_bytes: usize,
    erase_block_size: usize,
}

impl StorageRegion {
    /// Creates a validated region
    pub const fn new(
        base_address: usize,
        size_bytes: usize,
        erase_block_size: usize,
    ) -> Result<Self, RegionError> {
        if let Err(err) = check_geometry(base_address, size_bytes, erase_block_size) {
            return Err(err);
        }

        Ok(Self {
            base_address,
            size_bytes,
            erase_block_size,
        })
    }

    /// Returns the first address of the region
    pub const fn base_address(&self) -> usize {
        self.base_address
    }

    /// Returns the region size in bytes
    pub const fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Returns the erase block size the region was laid out for
    pub const fn erase_block_size(&self) -> usize {
        self.erase_block_size
    }

    /// Returns the first address past the region
    pub const fn end_address(&self) -> usize {
        // Overflow ruled out at construction
        self.base_address + self.size_bytes
    }

    /// Returns the number of erase blocks the region covers
    pub const fn block_count(&self) -> usize {
        self.size_bytes / self.erase_block_size
    }

    /// Returns true if `address` falls inside the region
    pub const fn contains(&self, address: usize) -> bool {
        address >= self.base_address && address < self.end_address()
    }

    /// Translates an absolute address into an offset from the region base
    pub const fn offset_of(&self, address: usize) -> Option<usize> {
        if self.contains(address) {
            Some(address - self.base_address)
        } else {
            None
        }
    }

    /// Checks the region against the erase block size a medium reports
    ///
    /// The region must be sized and aligned to the medium's blocks, and must
    /// have been laid out for that same block size.
    pub const fn check_medium_block_size(&self, medium_block: usize) -> Result<(), RegionError> {
        if let Err(err) = check_geometry(self.base_address, self.size_bytes, medium_block) {
            return Err(err);
        }

        if medium_block != self.erase_block_size {
            return Err(RegionError::BlockSizeMismatch);
        }

        Ok(())
    }
}

const fn check_geometry(
    base_address: usize,
    size_bytes: usize,
    erase_block_size: usize,
) -> Result<(), RegionError> {
    if erase_block_size == 0 {
        return Err(RegionError::ZeroBlockSize);
    }

    if !erase_block_size.is_power_of_two() {
        return Err(RegionError::BlockSizeNotPowerOfTwo);
    }

    if size_bytes == 0 {
        return Err(RegionError::ZeroSize);
    }

    if size_bytes % erase_block_size != 0 {
        return Err(RegionError::SizeNotBlockMultiple);
    }

    if base_address % erase_block_size != 0 {
        return Err(RegionError::BaseMisaligned);
    }

    if base_address.checked_add(size_bytes).is_none() {
        return Err(RegionError::AddressOverflow);
    }

    Ok(())
}
