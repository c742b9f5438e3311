//! Region geometry error types

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Reasons a [`StorageRegion`](crate::region::StorageRegion) geometry is rejected
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// Region size is zero
    ZeroSize,
    /// Erase block size is zero
    ZeroBlockSize,
    /// Erase block size is not a power of two
    BlockSizeNotPowerOfTwo,
    /// Region size is not an exact multiple of the erase block size
    SizeNotBlockMultiple,
    /// Base address is not aligned to the erase block size
    BaseMisaligned,
    /// Base address plus size does not fit in the address space
    AddressOverflow,
    /// The medium reports a different erase block size than the region was built for
    BlockSizeMismatch,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ZeroSize => "region size is zero",
            Self::ZeroBlockSize => "erase block size is zero",
            Self::BlockSizeNotPowerOfTwo => "erase block size is not a power of two",
            Self::SizeNotBlockMultiple => "region size is not a multiple of the erase block size",
            Self::BaseMisaligned => "base address is not block aligned",
            Self::AddressOverflow => "region end overflows the address space",
            Self::BlockSizeMismatch => "medium erase block size differs from region",
        };
        f.write_str(text)
    }
}
