//! Boot-time counter routine
//!
//! Runs the whole open, report, advance, close sequence once and reports
//! progress as line-oriented text on any [`core::fmt::Write`] sink (a UART,
//! an RTT channel, a `String` in tests). Failures are reported on the same
//! sink and returned; nothing is retried.

use core::fmt::Write;

use crate::error::StoreResult;
use crate::medium::StorageMedium;
use crate::record::CounterRecord;
use crate::region::StorageRegion;
use crate::staging::StagingBuffer;
use crate::store::CounterStore;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Outcome of a successful [`run_boot_cycle`]
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// Region the counter lives in
    pub region: StorageRegion,
    /// Value found at boot
    pub previous: CounterRecord,
    /// Value persisted for the next boot
    pub current: CounterRecord,
}

/// Opens the store, reports and advances the counter, then closes the store
///
/// Writes `Region @ 0x<base>`, then `Counter=<value found at boot>` before
/// anything is erased, then `Persisted=<new value>` once the update has been
/// programmed. On failure writes `error: <reason>` in place of the remaining
/// lines and returns the error. Write errors on `out` are ignored; the text
/// channel is diagnostic only.
///
/// # Example
/// ```rust
/// use flashtally::boot::run_boot_cycle;
/// use flashtally::prelude::*;
///
/// let mut flash = RamMedium::<4096>::provisioned(0, 1024);
/// let region = StorageRegion::new(0, 2048, 1024)?;
/// let mut staging = StagingBuffer::<2048>::new();
/// let mut console = String::new();
///
/// let report = run_boot_cycle(&mut flash, region, &mut staging, &mut console)?;
/// assert_eq!(report.current.value(), 1);
/// assert_eq!(console, "Region @ 0x00000000\nCounter=0\nPersisted=1\n");
/// # Ok::<(), flashtally::error::StoreError>(())
/// ```
pub fn run_boot_cycle<const SIZE: usize, M, W>(
    medium: M,
    region: StorageRegion,
    staging: &mut StagingBuffer<SIZE>,
    out: &mut W,
) -> StoreResult<BootReport>
where
    M: StorageMedium,
    W: Write,
{
    let mut store = match CounterStore::initialize(medium, region, staging) {
        Ok(store) => store,
        Err(err) => {
            let _ = writeln!(out, "error: {}", err);
            return Err(err);
        }
    };

    let _ = writeln!(out, "Region @ 0x{:08x}", region.base_address());

    let result = store.read_counter().and_then(|previous| {
        let _ = writeln!(out, "Counter={}", previous);
        store
            .advance_and_persist()
            .map(|current| BootReport {
                region,
                previous,
                current,
            })
    });
    store.close();

    match result {
        Ok(report) => {
            let _ = writeln!(out, "Persisted={}", report.current);
            Ok(report)
        }
        Err(err) => {
            let _ = writeln!(out, "error: {}", err);
            Err(err)
        }
    }
}

/// Opens the store, reports the counter without advancing it, then closes it
///
/// Writes `Counter=<value>` to `out`, or `error: <reason>` on failure.
pub fn report_counter<const SIZE: usize, M, W>(
    medium: M,
    region: StorageRegion,
    staging: &mut StagingBuffer<SIZE>,
    out: &mut W,
) -> StoreResult<CounterRecord>
where
    M: StorageMedium,
    W: Write,
{
    let result = CounterStore::initialize(medium, region, staging).and_then(|mut store| {
        let record = store.read_counter();
        store.close();
        record
    });

    match result {
        Ok(record) => {
            let _ = writeln!(out, "Counter={}", record);
            Ok(record)
        }
        Err(err) => {
            let _ = writeln!(out, "error: {}", err);
            Err(err)
        }
    }
}
