//! Store lifecycle states

#[cfg(feature = "defmt")]
use defmt::Format;

/// Lifecycle state of an open [`CounterStore`](crate::store::CounterStore)
///
/// "Unopened" and "closed" have no variant: no store value exists before
/// `initialize` succeeds or after `close` consumes it.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreState {
    /// Bound to its region and idle
    Opened,
    /// Copying the region into a staging buffer
    Reading,
    /// Between the first erase and the end of programming
    ///
    /// A reset here loses the previous value. Nothing recovers from it.
    Updating,
    /// An erase or program failed; the region contents are unknown
    Faulted,
}

impl StoreState {
    /// Returns true if read and update operations are allowed
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Opened)
    }

    /// Returns true if a reset in this state may corrupt the region
    pub const fn is_hazardous(&self) -> bool {
        matches!(self, Self::Updating)
    }

    /// Returns the state name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Reading => "reading",
            Self::Updating => "updating",
            Self::Faulted => "faulted",
        }
    }
}
