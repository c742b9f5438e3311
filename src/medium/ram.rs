//! RAM-backed NOR flash simulation
//!
//! Models the parts of NOR flash behaviour the store depends on: whole-block
//! erase to `0xFF`, program-once-after-erase, and blocking operations that
//! can fail part way. Fault injection lets tests and demos reproduce the
//! failures the store has to report.

use crate::error::MediumError;
use crate::medium::StorageMedium;
use crate::record::ERASED_BYTE;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Operation counters kept by [`RamMedium`]
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediumStats {
    /// Successful `open` calls
    pub opens: u32,
    /// `read` calls that returned data
    pub reads: u32,
    /// `erase` calls that touched the cells (including interrupted ones)
    pub erases: u32,
    /// Erase blocks cleared
    pub blocks_erased: u32,
    /// `program` calls that touched the cells (including torn ones)
    pub programs: u32,
    /// Bytes written by `program`
    pub bytes_programmed: u64,
}

/// One-shot faults armed on a [`RamMedium`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FaultPlan {
    open: bool,
    read: bool,
    erase: bool,
    program: bool,
    torn_program: Option<usize>,
}

/// Simulated NOR flash of `CAPACITY` bytes mapped at `origin`
///
/// # Memory Usage
/// - Fixed size: CAPACITY bytes of cells plus ~64 bytes of bookkeeping
///
/// # Example
/// ```rust
/// use flashtally::medium::{RamMedium, StorageMedium};
///
/// let mut flash = RamMedium::<8192>::provisioned(0x1000_0000, 4096);
/// flash.open(0x1000_0000, 4096)?;
///
/// flash.erase(0, 4096)?;
/// flash.program(0, &[7, 0, 0, 0])?;
///
/// let mut word = [0u8; 4];
/// flash.read(0, &mut word)?;
/// assert_eq!(word, [7, 0, 0, 0]);
///
/// // Programming over non-erased bytes is refused
/// assert!(flash.program(0, &[8]).is_err());
/// # Ok::<(), flashtally::error::MediumError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RamMedium<const CAPACITY: usize> {
    origin: usize,
    block_size: usize,
    cells: [u8; CAPACITY],
    /// Opened range as (offset into cells, length)
    window: Option<(usize, usize)>,
    stats: MediumStats,
    faults: FaultPlan,
}

impl<const CAPACITY: usize> RamMedium<CAPACITY> {
    const fn with_fill(origin: usize, block_size: usize, fill: u8) -> Self {
        Self {
            origin,
            block_size,
            cells: [fill; CAPACITY],
            window: None,
            stats: MediumStats {
                opens: 0,
                reads: 0,
                erases: 0,
                blocks_erased: 0,
                programs: 0,
                bytes_programmed: 0,
            },
            faults: FaultPlan {
                open: false,
                read: false,
                erase: false,
                program: false,
                torn_program: None,
            },
        }
    }

    /// Creates a device whose cells are all zero, as a freshly flashed image delivers them
    pub const fn provisioned(origin: usize, block_size: usize) -> Self {
        Self::with_fill(origin, block_size, 0x00)
    }

    /// Creates a device whose cells are all erased
    pub const fn blank(origin: usize, block_size: usize) -> Self {
        Self::with_fill(origin, block_size, ERASED_BYTE)
    }

    /// Creates an erased device and writes `image` at `origin`
    ///
    /// Bytes of `image` beyond `CAPACITY` are dropped.
    pub fn from_image(origin: usize, block_size: usize, image: &[u8]) -> Self {
        let mut medium = Self::blank(origin, block_size);
        let len = image.len().min(CAPACITY);
        medium.cells[..len].copy_from_slice(&image[..len]);
        medium
    }

    /// Returns the first address the device maps
    pub const fn origin(&self) -> usize {
        self.origin
    }

    /// Returns the device capacity in bytes
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Returns true while a range is open
    pub const fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Returns all cells of the device
    pub const fn cells(&self) -> &[u8; CAPACITY] {
        &self.cells
    }

    /// Returns `len` cells starting at absolute `address`, if mapped
    pub fn slice(&self, address: usize, len: usize) -> Option<&[u8]> {
        let start = address.checked_sub(self.origin)?;
        let end = start.checked_add(len)?;
        self.cells.get(start..end)
    }

    /// Overwrites cells at absolute `address`, bypassing erase rules
    ///
    /// Stands in for whatever the image or a previous firmware left behind.
    pub fn preload(&mut self, address: usize, data: &[u8]) -> Result<(), MediumError> {
        let start = address
            .checked_sub(self.origin)
            .ok_or(MediumError::OutOfBounds)?;
        let end = start
            .checked_add(data.len())
            .ok_or(MediumError::OutOfBounds)?;
        let target = self
            .cells
            .get_mut(start..end)
            .ok_or(MediumError::OutOfBounds)?;
        target.copy_from_slice(data);
        Ok(())
    }

    /// Returns the operation counters
    pub const fn stats(&self) -> MediumStats {
        self.stats
    }

    /// Clears the operation counters
    pub fn reset_stats(&mut self) {
        self.stats = MediumStats::default();
    }

    /// Makes the next `open` fail with [`MediumError::Fault`]
    pub fn fail_next_open(&mut self) {
        self.faults.open = true;
    }

    /// Makes the next `read` fail with [`MediumError::Fault`]
    pub fn fail_next_read(&mut self) {
        self.faults.read = true;
    }

    /// Makes the next `erase` clear its first block and then fail
    pub fn fail_next_erase(&mut self) {
        self.faults.erase = true;
    }

    /// Makes the next `program` fail before writing anything
    pub fn fail_next_program(&mut self) {
        self.faults.program = true;
    }

    /// Makes the next `program` write only its first `written` bytes and then fail
    pub fn tear_next_program(&mut self, written: usize) {
        self.faults.torn_program = Some(written);
    }

    /// Resolves `offset..offset + len` inside the open window to cell indices
    fn resolve(&self, offset: usize, len: usize) -> Result<(usize, usize), MediumError> {
        let (start, size) = self.window.ok_or(MediumError::NotOpen)?;
        let end = offset.checked_add(len).ok_or(MediumError::OutOfBounds)?;
        if end > size {
            return Err(MediumError::OutOfBounds);
        }
        Ok((start + offset, start + end))
    }
}

impl<const CAPACITY: usize> StorageMedium for RamMedium<CAPACITY> {
    fn erase_block_size(&self) -> usize {
        self.block_size
    }

    fn open(&mut self, base_address: usize, size_bytes: usize) -> Result<(), MediumError> {
        if core::mem::take(&mut self.faults.open) {
            return Err(MediumError::Fault);
        }

        let start = base_address
            .checked_sub(self.origin)
            .ok_or(MediumError::OutOfBounds)?;
        let end = start
            .checked_add(size_bytes)
            .ok_or(MediumError::OutOfBounds)?;
        if end > CAPACITY {
            return Err(MediumError::OutOfBounds);
        }

        if self.block_size == 0
            || base_address % self.block_size != 0
            || size_bytes % self.block_size != 0
        {
            return Err(MediumError::Misaligned);
        }

        self.window = Some((start, size_bytes));
        self.stats.opens += 1;
        Ok(())
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), MediumError> {
        let (start, end) = self.resolve(offset, buffer.len())?;

        if core::mem::take(&mut self.faults.read) {
            return Err(MediumError::Fault);
        }

        buffer.copy_from_slice(&self.cells[start..end]);
        self.stats.reads += 1;
        Ok(())
    }

    fn erase(&mut self, offset: usize, length: usize) -> Result<(), MediumError> {
        let (start, end) = self.resolve(offset, length)?;

        if offset % self.block_size != 0 || length % self.block_size != 0 {
            return Err(MediumError::Misaligned);
        }

        self.stats.erases += 1;

        if core::mem::take(&mut self.faults.erase) {
            // Interrupted part way: the first block is gone, the rest untouched
            let stop = (start + self.block_size).min(end);
            self.cells[start..stop].fill(ERASED_BYTE);
            if stop > start {
                self.stats.blocks_erased += 1;
            }
            return Err(MediumError::Fault);
        }

        self.cells[start..end].fill(ERASED_BYTE);
        self.stats.blocks_erased += (length / self.block_size) as u32;
        Ok(())
    }

    fn program(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        let (start, end) = self.resolve(offset, data.len())?;

        if self.cells[start..end].iter().any(|&b| b != ERASED_BYTE) {
            return Err(MediumError::NotErased);
        }

        if core::mem::take(&mut self.faults.program) {
            return Err(MediumError::Fault);
        }

        self.stats.programs += 1;

        if let Some(written) = self.faults.torn_program.take() {
            let written = written.min(data.len());
            self.cells[start..start + written].copy_from_slice(&data[..written]);
            self.stats.bytes_programmed += written as u64;
            return Err(MediumError::Fault);
        }

        self.cells[start..end].copy_from_slice(data);
        self.stats.bytes_programmed += data.len() as u64;
        Ok(())
    }

    fn close(&mut self) {
        self.window = None;
    }
}
