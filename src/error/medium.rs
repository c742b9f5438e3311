//! Storage medium error types
//!
//! This module defines the faults a block-erasable storage driver can report
//! back to the store.

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Errors reported by a [`StorageMedium`](crate::medium::StorageMedium) driver
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumError {
    /// The medium has not been opened, or has already been closed
    NotOpen,
    /// The requested range lies outside the opened region or the device
    OutOfBounds,
    /// An erase or open request was not aligned to the erase block size
    Misaligned,
    /// A program request touched bytes that were not in the erased state
    NotErased,
    /// The device reported a hardware fault while executing the request
    Fault,
}

impl MediumError {
    /// Returns true if the request was rejected before the device was touched
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::NotOpen | Self::OutOfBounds | Self::Misaligned | Self::NotErased => true,
            Self::Fault => false,
        }
    }

    /// Returns true if this fault indicates a hardware problem
    pub const fn is_hardware_fault(&self) -> bool {
        matches!(self, Self::Fault)
    }

    /// Returns the error category
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NotOpen => "Lifecycle",
            Self::OutOfBounds | Self::Misaligned => "Geometry",
            Self::NotErased => "Protocol",
            Self::Fault => "Hardware",
        }
    }
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotOpen => "medium not open",
            Self::OutOfBounds => "range out of bounds",
            Self::Misaligned => "range not aligned to erase block",
            Self::NotErased => "program target not erased",
            Self::Fault => "device fault",
        };
        f.write_str(text)
    }
}
