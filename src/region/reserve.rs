//! Build-time zeroed reservation
//!
//! The counter's first read must return 0 on a freshly flashed device. That
//! guarantee comes from the image itself: an immutable, block-aligned static
//! whose bytes are all zero is emitted into read-only data and programmed
//! together with the firmware. No code runs at reset to initialise it.
//!
//! Never read the live counter through the static. The compiler is free to
//! assume an immutable static keeps its build-time value and may fold loads
//! from it to zero. Go through a [`StorageMedium`](crate::medium::StorageMedium)
//! instead.

use crate::error::RegionError;
use crate::region::StorageRegion;

/// Alignment of every [`ZeroedRegion`], in bytes
///
/// Covers erase blocks up to 4 KiB. Larger blocks need the reservation placed
/// by the linker script through `link_section`.
pub const RESERVATION_ALIGN: usize = 4096;

/// Zero-filled, 4 KiB aligned byte array intended for `static` placement
///
/// # Example
/// ```rust
/// use flashtally::region::ZeroedRegion;
///
/// static COUNTER_REGION: ZeroedRegion<8192> = ZeroedRegion::new();
///
/// let region = COUNTER_REGION.region(4096)?;
/// assert_eq!(region.size_bytes(), 8192);
/// assert_eq!(region.base_address() % 4096, 0);
/// assert!(COUNTER_REGION.image().iter().all(|&b| b == 0));
/// # Ok::<(), flashtally::error::RegionError>(())
/// ```
#[repr(C, align(4096))]
pub struct ZeroedRegion<const SIZE: usize> {
    bytes: [u8; SIZE],
}

impl<const SIZE: usize> ZeroedRegion<SIZE> {
    /// Creates the reservation; usable in `static` initialisers
    pub const fn new() -> Self {
        Self { bytes: [0; SIZE] }
    }

    /// Returns the reservation size in bytes
    pub const fn len(&self) -> usize {
        SIZE
    }

    /// Returns true if the reservation has no bytes
    pub const fn is_empty(&self) -> bool {
        SIZE == 0
    }

    /// Returns the numeric address of the reservation
    ///
    /// This is the only place a static's address is turned into an integer
    /// for the storage driver.
    pub fn address(&'static self) -> usize {
        self.bytes.as_ptr() as usize
    }

    /// Returns the bytes as the image was built
    pub const fn image(&self) -> &[u8; SIZE] {
        &self.bytes
    }

    /// Describes the reservation as a validated [`StorageRegion`]
    pub fn region(&'static self, erase_block_size: usize) -> Result<StorageRegion, RegionError> {
        StorageRegion::new(self.address(), SIZE, erase_block_size)
    }
}

impl<const SIZE: usize> Default for ZeroedRegion<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares a zero-initialized, block-aligned static reservation
///
/// The geometry comes from a [`StoreConfig`](crate::config::StoreConfig).
/// Region size is checked against the erase block size at compile time. An
/// optional `link_section` places the reservation with the linker script,
/// which is required for erase blocks larger than [`RESERVATION_ALIGN`].
///
/// # Example
/// ```rust
/// use flashtally::config::{DefaultConfig, StoreConfig};
/// use flashtally::reserve_region;
///
/// reserve_region! {
///     static COUNTER_REGION: DefaultConfig;
/// }
///
/// let region = COUNTER_REGION.region(DefaultConfig::ERASE_BLOCK_SIZE)?;
/// assert_eq!(region.size_bytes(), DefaultConfig::REGION_SIZE);
/// # Ok::<(), flashtally::error::RegionError>(())
/// ```
#[macro_export]
macro_rules! reserve_region {
    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident: $config:ty
        $(, link_section = $section:literal)?
        ;
    ) => {
        const _: () = {
            let size = <$config as $crate::config::StoreConfig>::REGION_SIZE;
            let block = <$config as $crate::config::StoreConfig>::ERASE_BLOCK_SIZE;
            assert!(block.is_power_of_two(), "erase block size must be a power of two");
            assert!(size != 0 && size % block == 0, "region must cover whole erase blocks");
        };

        $(#[$meta])*
        $(#[unsafe(link_section = $section)])?
        $vis static $name: $crate::region::ZeroedRegion<
            { <$config as $crate::config::StoreConfig>::REGION_SIZE },
        > = $crate::region::ZeroedRegion::new();
    };
}

// Re-export the macro for convenience
pub use reserve_region;
