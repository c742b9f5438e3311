//! Storage medium driver trait
//!
//! Erase-before-write storage can only be erased in whole blocks, after which
//! each erased byte may be programmed once. Erase and program both block the
//! caller for a time proportional to the length, and on most parts they stall
//! execute-in-place code fetches. Do not call them from time-critical context.

use crate::error::MediumError;
use crate::record::ERASED_BYTE;

/// Driver interface for a block-erasable storage medium
///
/// All offsets passed to `read`, `erase` and `program` are relative to the
/// base address given to `open`. Implementations must reject requests that
/// fall outside the opened range.
pub trait StorageMedium {
    /// Returns the erase block size of the device in bytes
    fn erase_block_size(&self) -> usize;

    /// Returns the byte value the device reads back after an erase
    fn erased_value(&self) -> u8 {
        ERASED_BYTE
    }

    /// Binds the driver to `size_bytes` of storage starting at `base_address`
    ///
    /// May register the range with the device. Must not erase or program.
    fn open(&mut self, base_address: usize, size_bytes: usize) -> Result<(), MediumError>;

    /// Reads `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), MediumError>;

    /// Erases `length` bytes starting at `offset`; both must be block aligned
    fn erase(&mut self, offset: usize, length: usize) -> Result<(), MediumError>;

    /// Programs `data` starting at `offset` into previously erased storage
    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError>;

    /// Releases the range bound by `open`
    fn close(&mut self);
}

impl<M: StorageMedium + ?Sized> StorageMedium for &mut M {
    fn erase_block_size(&self) -> usize {
        (**self).erase_block_size()
    }

    fn erased_value(&self) -> u8 {
        (**self).erased_value()
    }

    fn open(&mut self, base_address: usize, size_bytes: usize) -> Result<(), MediumError> {
        (**self).open(base_address, size_bytes)
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), MediumError> {
        (**self).read(offset, buffer)
    }

    fn erase(&mut self, offset: usize, length: usize) -> Result<(), MediumError> {
        (**self).erase(offset, length)
    }

    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        (**self).program(offset, data)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
