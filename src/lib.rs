#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

//! **Single-slot boot counter for erase-before-write flash**
//!
//! flashtally keeps one monotonically increasing counter in a region of
//! non-volatile storage that the firmware image reserves for itself. The
//! region is zero-filled when the image is built, so the counter starts at
//! 0 without any provisioning step, and each boot advances it by one.
//!
//! ## Features
//!
//! - **Build-time reservation** - [`reserve_region!`] emits a zeroed, block-aligned static
//! - **Whole-region updates** - read into a staging buffer, erase, program back
//! - **Pluggable storage** - any driver implementing [`medium::StorageMedium`]
//! - **Simulated flash** - [`medium::RamMedium`] with NOR semantics and fault injection
//! - **No Dynamic Allocation** - the caller owns the staging buffer, sized by const generics
//!
//! ## Update Cycle
//!
//! ```text
//! open ──> read region into staging ──> erase region ──> decode snapshot, +1 ──> program staging ──> close
//! ```
//!
//! Every byte outside the counter field is written back unchanged. The
//! update is not power-fail safe: a reset between the erase and the end of
//! programming loses the previous value.
//!
//! ### Optional Features
//! - `serde` - Serde serialization of geometry and records (no_std compatible)
//! - `defmt` - Logging through `defmt` and `defmt::Format` on public types
//!
//! ## Quick Start
//!
//! ```rust
//! use flashtally::prelude::*;
//!
//! // 64 KiB region of 4 KiB erase blocks, zeroed like a fresh image
//! let mut flash = RamMedium::<65536>::provisioned(0, 4096);
//! let region = DefaultConfig::region_at(0)?;
//!
//! // Firmware keeps this in a `static`; it is as large as the region
//! let mut staging = StagingBuffer::<65536>::new();
//!
//! let mut store = CounterStore::initialize(&mut flash, region, &mut staging)?;
//! assert_eq!(store.read_counter()?.value(), 0);
//! assert_eq!(store.advance_and_persist()?.value(), 1);
//! store.close();
//!
//! assert!(!flash.is_open());
//! # Ok::<(), StoreError>(())
//! ```
//!
//! ## Custom Geometry
//!
//! ```rust
//! use flashtally::prelude::*;
//!
//! define_store_config! {
//!     name: BootSectorConfig,
//!     region_size: 16384,
//!     erase_block_size: 4096,
//! }
//!
//! assert_eq!(BootSectorConfig::block_count(), 4);
//! assert!(BootSectorConfig::validate().is_ok());
//! ```

#![no_std]
#![deny(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::assertions_on_constants)]
#![allow(clippy::const_is_empty)]
#![cfg_attr(test, allow(unused_mut))]

// Must come first so the logging macros are visible to every module
mod fmt;

// Core infrastructure modules
pub mod config;
pub mod error;
pub mod record;
pub mod region;

// Storage access
pub mod medium;
pub mod staging;
pub mod store;

// Boot routine
pub mod boot;

// Configuration presets
pub mod configs;

/// Prelude module of flashtally
///
/// Convenient re-exports for common flashtally types and traits
pub mod prelude {

    // Re-export region configuration
    pub use crate::config::{DefaultConfig, StoreConfig, define_store_config};

    // Re-export configuration presets
    pub use crate::configs::*;

    // Re-export error types
    pub use crate::error::{MediumError, OpenFailure, RegionError, StoreError, StoreResult};

    // Re-export storage types
    pub use crate::medium::{MediumStats, RamMedium, StorageMedium};
    pub use crate::record::CounterRecord;
    pub use crate::staging::StagingBuffer;
    pub use crate::region::{StorageRegion, ZeroedRegion, reserve_region};
    pub use crate::store::{CounterStore, StoreState};

    // Re-export boot routine
    pub use crate::boot::{BootReport, report_counter, run_boot_cycle};
}
