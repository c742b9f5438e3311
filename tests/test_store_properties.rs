//! Property-based tests for the counter store
//!
//! This module tests the properties every boot cycle must satisfy:
//! - Monotonicity: each successful advance moves the counter by exactly one
//! - Preservation: bytes outside the counter field are written back verbatim
//! - Idempotent reads: reading any number of times changes nothing
//! - Failure isolation: refused or failed reads never modify the region

#![allow(unused_mut)]
#![allow(special_module_name)]

use flashtally::prelude::*;
use proptest::prelude::*;

use lib::*;

proptest! {
    #![proptest_config(store_config())]

    /// Each advance persists exactly previous + 1
    #[test]
    fn advance_increments_by_one(value in advanceable_value_strategy()) {
        let mut flash = seeded_flash(value, &[]);

        let record = boot_once(&mut flash).unwrap();

        prop_assert_eq!(record.value(), value + 1);
        prop_assert_eq!(stored_value(&flash), value + 1);
    }

    /// Region bytes other than the counter field are preserved
    #[test]
    fn advance_preserves_payload(
        value in advanceable_value_strategy(),
        payload in payload_strategy(),
    ) {
        let mut flash = seeded_flash(value, &payload);

        boot_once(&mut flash).unwrap();

        prop_assert_eq!(flash.slice(SMALL_BASE + 4, payload.len()).unwrap(), &payload[..]);
    }

    /// Reading is side-effect free however often it happens
    #[test]
    fn reads_are_idempotent(
        value in any::<u32>(),
        payload in payload_strategy(),
        reads in 1usize..8,
    ) {
        let mut flash = seeded_flash(value, &payload);
        let before = *flash.cells();

        let mut staging = StagingBuffer::<SMALL_REGION>::new();
        let mut store = CounterStore::initialize(&mut flash, small_region(), &mut staging).unwrap();
        for _ in 0..reads {
            prop_assert_eq!(store.read_counter().unwrap().value(), value);
        }
        store.close();

        prop_assert_eq!(flash.cells(), &before);
    }

    /// The counter only ever moves forward across consecutive boots
    #[test]
    fn consecutive_boots_are_monotonic(start in 0u32..1_000_000, boots in boot_count_strategy()) {
        let mut flash = seeded_flash(start, &[]);
        let mut last = start;

        for _ in 0..boots {
            let record = boot_once(&mut flash).unwrap();
            prop_assert_eq!(record.value(), last + 1);
            last = record.value();
        }

        prop_assert_eq!(stored_value(&flash), start + boots);
    }

    /// A failed read never reaches the erase step
    #[test]
    fn read_failure_leaves_region_intact(
        value in advanceable_value_strategy(),
        payload in payload_strategy(),
    ) {
        let mut flash = seeded_flash(value, &payload);
        let before = *flash.cells();
        flash.fail_next_read();

        prop_assert_eq!(boot_once(&mut flash), Err(StoreError::ReadError(MediumError::Fault)));
        prop_assert_eq!(flash.cells(), &before);
        prop_assert_eq!(flash.stats().erases, 0);
    }
}

proptest! {
    #![proptest_config(cycle_config())]

    /// The boot routine reports the value found before erasing, then leaves value + 1 behind
    #[test]
    fn boot_cycle_reports_each_previous_value(start in 0u32..1000, boots in boot_count_strategy()) {
        let mut flash = seeded_flash(start, &[]);
        let mut staging = StagingBuffer::<SMALL_REGION>::new();
        let mut console = String::new();

        for _ in 0..boots {
            run_boot_cycle(&mut flash, small_region(), &mut staging, &mut console).unwrap();
        }

        let reported: Vec<u32> = console
            .lines()
            .filter_map(|line| line.strip_prefix("Counter="))
            .map(|value| value.parse().unwrap())
            .collect();
        let expected: Vec<u32> = (start..start + boots).collect();
        prop_assert_eq!(reported, expected);
        prop_assert_eq!(console.lines().filter(|line| line.starts_with("Persisted=")).count(), boots as usize);
        prop_assert_eq!(stored_value(&flash), start + boots);
    }
}
