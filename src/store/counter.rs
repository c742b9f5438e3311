//! Single-slot counter store
//!
//! Persists one [`CounterRecord`] in one fixed region of erase-before-write
//! storage. Only one writer exists, and only for the duration of the boot
//! routine that owns the store.

use crate::error::{OpenFailure, StoreError, StoreResult};
use crate::medium::StorageMedium;
use crate::record::CounterRecord;
use crate::region::StorageRegion;
use crate::staging::StagingBuffer;
use crate::store::StoreState;

/// Counter store bound to a region of `SIZE` bytes
///
/// `SIZE` is the staging buffer size and must equal the region size. The
/// staging buffer is storage the caller provides: a stack local on hosts,
/// a `static` on targets whose stack cannot hold a whole region. The store
/// borrows it until [`close`](Self::close).
///
/// The store owns `M` for its whole lifetime; pass `&mut medium` to keep the
/// device after `close` or after a failed [`initialize`](Self::initialize).
///
/// # Type Parameters
/// - `M`: Storage medium driver
/// - `SIZE`: Region and staging buffer size in bytes
///
/// # Memory Usage
/// - `size_of::<M>()` + 40 bytes; the SIZE-byte staging buffer lives wherever the caller put it
///
/// # Example
/// ```rust
/// use flashtally::prelude::*;
///
/// let mut flash = RamMedium::<8192>::provisioned(0x1000_0000, 4096);
/// let region = StorageRegion::new(0x1000_0000, 4096, 4096)?;
/// let mut staging = StagingBuffer::<4096>::new();
///
/// let mut store = CounterStore::initialize(&mut flash, region, &mut staging)?;
/// assert_eq!(store.read_counter()?.value(), 0);
/// assert_eq!(store.advance_and_persist()?.value(), 1);
/// store.close();
///
/// let mut store = CounterStore::initialize(&mut flash, region, &mut staging)?;
/// assert_eq!(store.read_counter()?.value(), 1);
/// # Ok::<(), flashtally::error::StoreError>(())
/// ```
#[derive(Debug)]
pub struct CounterStore<'s, M: StorageMedium, const SIZE: usize> {
    medium: M,
    region: StorageRegion,
    staging: &'s mut StagingBuffer<SIZE>,
    state: StoreState,
}

impl<'s, M: StorageMedium, const SIZE: usize> CounterStore<'s, M, SIZE> {
    /// Opens the store against `region`, staging updates in `staging`
    ///
    /// The region's bytes must have been zeroed by the build step the first
    /// time this runs on a device. This call never erases or writes.
    ///
    /// A medium passed by value is dropped on failure. Pass `&mut medium`
    /// to keep the device for reporting or a later attempt.
    ///
    /// # Errors
    /// [`StoreError::StorageUnavailable`] if the region is not sized and
    /// aligned to the medium's erase blocks, if its size differs from `SIZE`,
    /// or if the medium refuses to open it.
    pub fn initialize(
        mut medium: M,
        region: StorageRegion,
        staging: &'s mut StagingBuffer<SIZE>,
    ) -> StoreResult<Self> {
        let block = medium.erase_block_size();
        if let Err(err) = region.check_medium_block_size(block) {
            error!("store: region rejected for {} byte blocks: {}", block, err);
            return Err(OpenFailure::Geometry(err).into());
        }

        if region.size_bytes() != SIZE {
            error!(
                "store: region is {} bytes, staging is {}",
                region.size_bytes(),
                SIZE
            );
            return Err(OpenFailure::StagingMismatch {
                expected: SIZE,
                actual: region.size_bytes(),
            }
            .into());
        }

        medium
            .open(region.base_address(), region.size_bytes())
            .map_err(OpenFailure::Medium)?;

        info!(
            "store: opened {} bytes at {:#x} ({} blocks)",
            region.size_bytes(),
            region.base_address(),
            region.block_count()
        );

        Ok(Self {
            medium,
            region,
            staging,
            state: StoreState::Opened,
        })
    }

    /// Returns the region the store is bound to
    pub const fn region(&self) -> &StorageRegion {
        &self.region
    }

    /// Returns the current lifecycle state
    pub const fn state(&self) -> StoreState {
        self.state
    }

    /// Returns the medium for inspection
    pub const fn medium(&self) -> &M {
        &self.medium
    }

    /// Reads the current counter without modifying the region
    ///
    /// # Errors
    /// [`StoreError::ReadError`] if the medium read fails, or
    /// [`StoreError::InvalidState`] after a failed update.
    pub fn read_counter(&mut self) -> StoreResult<CounterRecord> {
        self.ensure_ready()?;
        self.state = StoreState::Reading;

        let result = self
            .staging
            .capture(&mut self.medium)
            .map(|()| self.staging.record())
            .map_err(StoreError::ReadError);

        self.state = StoreState::Opened;

        let record = result?;
        let erased = self.medium.erased_value();
        if record.encode().iter().all(|&b| b == erased) {
            warn!("store: counter field reads as erased flash");
        }
        debug!("store: read counter {}", record.value());
        Ok(record)
    }

    /// Advances the counter by exactly one and persists it
    ///
    /// Copies the whole region into the staging buffer, erases the region,
    /// writes the incremented counter into the copy and programs the copy
    /// back. Every byte outside the counter field is written back verbatim.
    ///
    /// Nothing is retried. After an erase or program failure the store is
    /// [`Faulted`](StoreState::Faulted) for the rest of the boot cycle.
    ///
    /// # Errors
    /// - [`StoreError::ReadError`]: region untouched
    /// - [`StoreError::CounterOverflow`]: value is `u32::MAX`; region untouched
    /// - [`StoreError::EraseError`]: region contents are medium-defined
    /// - [`StoreError::ProgramError`]: region may hold partially written bytes
    /// - [`StoreError::InvalidState`]: a previous update failed
    pub fn advance_and_persist(&mut self) -> StoreResult<CounterRecord> {
        self.ensure_ready()?;

        let result = self.update();

        self.state = match result {
            Err(err) if err.leaves_region_inconsistent() => {
                error!("store: update failed, region inconsistent: {}", err);
                StoreState::Faulted
            }
            _ => StoreState::Opened,
        };

        result
    }

    /// Closes the store, releases the staging buffer and hands the medium back
    pub fn close(mut self) -> M {
        self.medium.close();
        debug!("store: closed");
        self.medium
    }

    fn ensure_ready(&self) -> StoreResult<()> {
        if self.state.is_ready() {
            Ok(())
        } else {
            Err(StoreError::InvalidState(self.state))
        }
    }

    fn update(&mut self) -> StoreResult<CounterRecord> {
        self.state = StoreState::Reading;

        self.staging
            .capture(&mut self.medium)
            .map_err(StoreError::ReadError)?;

        // Refuse to wrap before anything is erased
        if self.staging.record().next().is_none() {
            warn!("store: counter at maximum, region left as is");
            return Err(StoreError::CounterOverflow);
        }

        self.state = StoreState::Updating;

        self.medium
            .erase(0, SIZE)
            .map_err(StoreError::EraseError)?;

        // Decode from the pre-erase snapshot
        let previous = self.staging.record();
        let next = previous.next().ok_or(StoreError::CounterOverflow)?;
        self.staging.set_record(next);

        self.staging
            .program_into(&mut self.medium)
            .map_err(StoreError::ProgramError)?;

        info!("store: counter {} -> {}", previous.value(), next.value());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MediumError, RegionError};
    use crate::medium::RamMedium;
    use crate::record::ERASED_BYTE;

    const BASE: usize = 0x800;
    const BLOCK: usize = 512;
    const SIZE: usize = 1024;

    fn region() -> StorageRegion {
        StorageRegion::new(BASE, SIZE, BLOCK).unwrap()
    }

    fn device() -> RamMedium<4096> {
        RamMedium::provisioned(0, BLOCK)
    }

    #[test]
    fn test_initialize_opens_without_writing() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        assert_eq!(store.state(), StoreState::Opened);
        assert_eq!(store.region(), &region());
        assert!(store.medium().is_open());
        store.close();

        let stats = flash.stats();
        assert_eq!(stats.opens, 1);
        assert_eq!(stats.erases, 0);
        assert_eq!(stats.programs, 0);
        assert!(!flash.is_open());
    }

    #[test]
    fn test_initialize_rejects_staging_mismatch() {
        let mut flash = device();
        let mut staging = StagingBuffer::<2048>::new();
        let result = CounterStore::initialize(&mut flash, region(), &mut staging);
        assert_eq!(
            result.unwrap_err(),
            StoreError::StorageUnavailable(OpenFailure::StagingMismatch {
                expected: 2048,
                actual: SIZE,
            })
        );
        assert!(!flash.is_open());
    }

    #[test]
    fn test_initialize_rejects_foreign_block_size() {
        let mut flash = RamMedium::<4096>::provisioned(0, 2048);
        let mut staging = StagingBuffer::<SIZE>::new();
        let result = CounterStore::initialize(&mut flash, region(), &mut staging);
        assert_eq!(
            result.unwrap_err(),
            StoreError::StorageUnavailable(OpenFailure::Geometry(
                RegionError::SizeNotBlockMultiple
            ))
        );
    }

    #[test]
    fn test_initialize_reports_medium_refusal() {
        let mut flash = RamMedium::<2048>::provisioned(0, BLOCK);
        let far = StorageRegion::new(0x10_0000, SIZE, BLOCK).unwrap();
        let mut staging = StagingBuffer::<SIZE>::new();
        let result = CounterStore::initialize(&mut flash, far, &mut staging);
        assert_eq!(
            result.unwrap_err(),
            StoreError::StorageUnavailable(OpenFailure::Medium(MediumError::OutOfBounds))
        );
    }

    #[test]
    fn test_zero_start() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        assert_eq!(store.read_counter().unwrap(), CounterRecord::initial());
    }

    #[test]
    fn test_advance_increments_and_persists() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();

        assert_eq!(store.advance_and_persist().unwrap().value(), 1);
        assert_eq!(store.read_counter().unwrap().value(), 1);
        assert_eq!(store.advance_and_persist().unwrap().value(), 2);
        store.close();

        assert_eq!(flash.slice(BASE, 4).unwrap(), &[2, 0, 0, 0]);
    }

    #[test]
    fn test_advance_erases_whole_region_once() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        store.advance_and_persist().unwrap();
        store.close();

        let stats = flash.stats();
        assert_eq!(stats.erases, 1);
        assert_eq!(stats.blocks_erased, (SIZE / BLOCK) as u32);
        assert_eq!(stats.programs, 1);
        assert_eq!(stats.bytes_programmed, SIZE as u64);
    }

    #[test]
    fn test_advance_preserves_padding() {
        let mut flash = device();
        flash.preload(BASE + 4, b"reserved").unwrap();
        flash.preload(BASE + SIZE - 1, &[0x5A]).unwrap();

        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        store.advance_and_persist().unwrap();
        store.close();

        assert_eq!(flash.slice(BASE + 4, 8).unwrap(), b"reserved");
        assert_eq!(flash.slice(BASE + SIZE - 1, 1).unwrap(), &[0x5A]);
    }

    #[test]
    fn test_advance_leaves_neighbours_alone() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        store.advance_and_persist().unwrap();
        store.close();

        assert!(flash.slice(BASE - BLOCK, BLOCK).unwrap().iter().all(|&b| b == 0));
        assert!(flash.slice(BASE + SIZE, BLOCK).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_read_error_keeps_store_usable() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();

        store.medium.fail_next_read();
        assert_eq!(
            store.read_counter(),
            Err(StoreError::ReadError(MediumError::Fault))
        );
        assert_eq!(store.state(), StoreState::Opened);
        assert_eq!(store.read_counter().unwrap().value(), 0);
    }

    #[test]
    fn test_erase_failure_stops_before_program() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();

        store.medium.fail_next_erase();
        assert_eq!(
            store.advance_and_persist(),
            Err(StoreError::EraseError(MediumError::Fault))
        );
        assert_eq!(store.state(), StoreState::Faulted);
        assert_eq!(store.medium().stats().programs, 0);

        // Terminal for this boot cycle
        assert_eq!(
            store.read_counter(),
            Err(StoreError::InvalidState(StoreState::Faulted))
        );
        assert_eq!(
            store.advance_and_persist(),
            Err(StoreError::InvalidState(StoreState::Faulted))
        );
        store.close();

        // The interrupted erase already destroyed the old value
        assert_eq!(flash.slice(BASE, 4).unwrap(), &[ERASED_BYTE; 4]);
    }

    #[test]
    fn test_program_failure_faults_store() {
        let mut flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();

        store.medium.fail_next_program();
        assert_eq!(
            store.advance_and_persist(),
            Err(StoreError::ProgramError(MediumError::Fault))
        );
        assert_eq!(store.state(), StoreState::Faulted);
    }

    #[test]
    fn test_overflow_rejected_before_erase() {
        let mut flash = device();
        flash.preload(BASE, &u32::MAX.to_le_bytes()).unwrap();

        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        assert_eq!(store.advance_and_persist(), Err(StoreError::CounterOverflow));
        assert_eq!(store.state(), StoreState::Opened);
        store.close();

        assert_eq!(flash.stats().erases, 0);
        assert_eq!(flash.slice(BASE, 4).unwrap(), &[0xFF; 4]);
    }

    #[test]
    fn test_owned_medium_returned_on_close() {
        let flash = device();
        let mut staging = StagingBuffer::<SIZE>::new();
        let mut store = CounterStore::initialize(flash, region(), &mut staging).unwrap();
        store.advance_and_persist().unwrap();
        let flash = store.close();
        assert!(!flash.is_open());
        assert_eq!(flash.slice(BASE, 1).unwrap(), &[1]);
    }

    #[test]
    fn test_staging_is_caller_storage() {
        // The store itself never holds a region-sized array
        assert!(core::mem::size_of::<CounterStore<'static, &mut RamMedium<4096>, 4096>>() < 64);

        let mut flash = device();
        flash.preload(BASE + 4, &[0x42]).unwrap();
        let mut staging = StagingBuffer::<SIZE>::new();

        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        store.advance_and_persist().unwrap();
        store.close();

        // Released on close, holding the image that was programmed
        assert_eq!(staging.record().value(), 1);
        assert_eq!(staging.bytes()[4], 0x42);
        assert_eq!(flash.slice(BASE, SIZE).unwrap(), &staging.bytes()[..]);
    }

    #[test]
    fn test_borrowed_medium_survives_failed_initialize() {
        let mut flash = device();
        flash.fail_next_open();
        let mut staging = StagingBuffer::<SIZE>::new();

        let result = CounterStore::initialize(&mut flash, region(), &mut staging);
        assert!(matches!(result, Err(StoreError::StorageUnavailable(_))));

        // Same device and staging, second attempt
        let mut store = CounterStore::initialize(&mut flash, region(), &mut staging).unwrap();
        assert_eq!(store.read_counter().unwrap().value(), 0);
        store.close();
        assert_eq!(flash.stats().opens, 1);
    }
}
