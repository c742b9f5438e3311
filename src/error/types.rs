//! Core error types for flashtally
//!
//! This module defines the main error types returned by
//! [`CounterStore`](crate::store::CounterStore) operations.

use core::fmt;

use crate::error::{MediumError, RegionError};
use crate::store::StoreState;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Why a store could not be opened against its region
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailure {
    /// The region geometry is invalid for the medium
    Geometry(RegionError),
    /// The region size does not match the staging buffer size the store was built with
    StagingMismatch {
        /// Staging buffer size in bytes
        expected: usize,
        /// Region size in bytes
        actual: usize,
    },
    /// The medium driver refused to open the region
    Medium(MediumError),
}

impl fmt::Display for OpenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "bad geometry: {}", err),
            Self::StagingMismatch { expected, actual } => write!(
                f,
                "region is {} bytes but staging buffer is {} bytes",
                actual, expected
            ),
            Self::Medium(err) => write!(f, "medium: {}", err),
        }
    }
}

impl From<RegionError> for OpenFailure {
    fn from(error: RegionError) -> Self {
        Self::Geometry(error)
    }
}

impl From<MediumError> for OpenFailure {
    fn from(error: MediumError) -> Self {
        Self::Medium(error)
    }
}

/// Main error type for counter store operations
///
/// Every variant is terminal for the boot cycle that produced it. None of the
/// store operations retry: an erase has usually already happened by the time
/// a later step fails.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The region cannot be opened (bad geometry, size mismatch, driver refusal)
    StorageUnavailable(OpenFailure),
    /// Reading the region into the staging buffer failed
    ReadError(MediumError),
    /// Erasing the region failed; its contents are now medium-defined
    EraseError(MediumError),
    /// Programming failed after a successful erase; the region may hold partial data
    ProgramError(MediumError),
    /// The stored value is already at its maximum and cannot advance
    CounterOverflow,
    /// The operation is not allowed in the store's current state
    InvalidState(StoreState),
}

impl StoreError {
    /// Returns true if the region is untouched and a later boot may succeed
    pub const fn is_recoverable(&self) -> bool {
        match self {
            // Region was never modified
            Self::StorageUnavailable(_) | Self::ReadError(_) | Self::CounterOverflow => true,

            // Refused call; a faulted store stays faulted until the next boot
            Self::InvalidState(state) => !matches!(state, StoreState::Faulted),

            // Region was erased and possibly partially programmed
            Self::EraseError(_) | Self::ProgramError(_) => false,
        }
    }

    /// Returns true if the region may no longer hold the previous counter value
    pub const fn leaves_region_inconsistent(&self) -> bool {
        matches!(self, Self::EraseError(_) | Self::ProgramError(_))
    }

    /// Returns the underlying medium error, if any
    pub const fn medium_error(&self) -> Option<MediumError> {
        match self {
            Self::StorageUnavailable(OpenFailure::Medium(err))
            | Self::ReadError(err)
            | Self::EraseError(err)
            | Self::ProgramError(err) => Some(*err),
            _ => None,
        }
    }

    /// Returns the error category as a string
    pub const fn category(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "Open",
            Self::ReadError(_) => "Read",
            Self::EraseError(_) | Self::ProgramError(_) => "Update",
            Self::CounterOverflow => "Record",
            Self::InvalidState(_) => "Lifecycle",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageUnavailable(cause) => write!(f, "storage unavailable ({})", cause),
            Self::ReadError(err) => write!(f, "read failed ({})", err),
            Self::EraseError(err) => write!(f, "erase failed ({})", err),
            Self::ProgramError(err) => write!(f, "program failed ({})", err),
            Self::CounterOverflow => f.write_str("counter at maximum value"),
            Self::InvalidState(state) => write!(f, "store is {}", state.name()),
        }
    }
}

impl From<OpenFailure> for StoreError {
    fn from(failure: OpenFailure) -> Self {
        Self::StorageUnavailable(failure)
    }
}

impl From<RegionError> for StoreError {
    fn from(error: RegionError) -> Self {
        Self::StorageUnavailable(OpenFailure::Geometry(error))
    }
}

/// Result type for counter store operations
pub type StoreResult<T> = Result<T, StoreError>;
