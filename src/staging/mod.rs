//! Staging buffer
//!
//! Erase-before-write storage cannot be patched in place. An update copies
//! the whole region into RAM, edits the copy, erases the region and programs
//! the copy back. The caller owns the buffer and lends it to one
//! [`CounterStore`](crate::store::CounterStore) at a time; the borrow ends when
//! the store is closed or dropped, on success and on every early return.
//!
//! A region-sized buffer rarely fits on an embedded stack. Place it in a
//! `static` and hand the store a `&'static mut` to it (for example through
//! `cortex_m::singleton!`). [`StagingBuffer::new`] is `const` for that reason.

use core::fmt;

use crate::error::MediumError;
use crate::medium::StorageMedium;
use crate::record::{CounterRecord, RECORD_OFFSET, RECORD_WIDTH};

/// Volatile working copy of a `SIZE`-byte region
///
/// `SIZE` must be at least [`RECORD_WIDTH`]; smaller sizes fail to compile
/// when the buffer is created.
///
/// # Memory Usage
/// - Fixed size: SIZE bytes, wherever the caller places it
pub struct StagingBuffer<const SIZE: usize> {
    bytes: [u8; SIZE],
}

impl<const SIZE: usize> StagingBuffer<SIZE> {
    const HOLDS_RECORD: () = assert!(
        SIZE >= RECORD_OFFSET + RECORD_WIDTH,
        "staging buffer smaller than the counter record"
    );

    /// Creates a zero-filled buffer
    pub const fn new() -> Self {
        let () = Self::HOLDS_RECORD;
        Self { bytes: [0; SIZE] }
    }

    /// Creates a buffer holding `bytes`
    pub const fn from_bytes(bytes: [u8; SIZE]) -> Self {
        let () = Self::HOLDS_RECORD;
        Self { bytes }
    }

    /// Returns the buffer length in bytes
    pub const fn len(&self) -> usize {
        SIZE
    }

    /// Returns true if the buffer has no bytes
    pub const fn is_empty(&self) -> bool {
        SIZE == 0
    }

    /// Returns the buffered bytes
    pub const fn bytes(&self) -> &[u8; SIZE] {
        &self.bytes
    }

    /// Returns the buffered bytes for editing
    pub fn bytes_mut(&mut self) -> &mut [u8; SIZE] {
        &mut self.bytes
    }

    /// Replaces the buffer contents with a verbatim copy of the open region
    pub fn capture<M: StorageMedium + ?Sized>(&mut self, medium: &mut M) -> Result<(), MediumError> {
        trace!("staging: capture {} bytes", SIZE);
        medium.read(0, &mut self.bytes)
    }

    /// Programs the whole buffer into the freshly erased region
    pub fn program_into<M: StorageMedium + ?Sized>(&self, medium: &mut M) -> Result<(), MediumError> {
        trace!("staging: program {} bytes", SIZE);
        medium.program(0, &self.bytes)
    }

    /// Decodes the counter record
    pub fn record(&self) -> CounterRecord {
        let mut field = [0u8; RECORD_WIDTH];
        field.copy_from_slice(&self.bytes[RECORD_OFFSET..RECORD_OFFSET + RECORD_WIDTH]);
        CounterRecord::decode(&field)
    }

    /// Encodes `record` into the counter field, leaving every other byte as is
    pub fn set_record(&mut self, record: CounterRecord) {
        self.bytes[RECORD_OFFSET..RECORD_OFFSET + RECORD_WIDTH].copy_from_slice(&record.encode());
    }
}

// Contents are elided; a region copy is too large to print
impl<const SIZE: usize> fmt::Debug for StagingBuffer<SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagingBuffer")
            .field("len", &SIZE)
            .field("record", &self.record())
            .finish_non_exhaustive()
    }
}

impl<const SIZE: usize> Default for StagingBuffer<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
