//! Boot counter record
//!
//! A single little-endian `u32` stored at offset 0 of the region.

#[cfg(feature = "defmt")]
use defmt::Format;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Byte offset of the counter inside the region
pub const RECORD_OFFSET: usize = 0;

/// Encoded width of the counter in bytes
pub const RECORD_WIDTH: usize = core::mem::size_of::<u32>();

/// Byte value conventionally read back from erased NOR flash
pub const ERASED_BYTE: u8 = 0xFF;

/// Persistent boot counter
///
/// The value starts at 0 because the region is zeroed when the image is
/// built, and only ever moves forward by exactly one per completed update.
///
/// # Memory Usage
/// - Fixed size: 4 bytes in RAM, [`RECORD_WIDTH`] bytes on the medium
///
/// # Example
/// ```rust
/// use flashtally::record::CounterRecord;
///
/// let record = CounterRecord::decode(&[0, 0, 0, 0]);
/// assert!(record.is_initial());
///
/// let next = record.next().unwrap();
/// assert_eq!(next.value(), 1);
/// assert_eq!(next.encode(), [1, 0, 0, 0]);
/// ```
#[cfg_attr(feature = "defmt", derive(Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CounterRecord {
    value: u32,
}

impl CounterRecord {
    /// Creates a record holding `value`
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    /// The record a freshly provisioned region decodes to
    pub const fn initial() -> Self {
        Self { value: 0 }
    }

    /// Returns the counter value
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Returns true if no update has ever completed
    pub const fn is_initial(&self) -> bool {
        self.value == 0
    }

    /// Returns true if the encoded bytes are all [`ERASED_BYTE`]
    ///
    /// A region that was erased but never reprogrammed (power lost between
    /// the two steps) decodes to this value.
    pub const fn looks_erased(&self) -> bool {
        self.value == u32::from_le_bytes([ERASED_BYTE; RECORD_WIDTH])
    }

    /// Returns the record advanced by exactly one, or `None` at `u32::MAX`
    pub const fn next(&self) -> Option<Self> {
        match self.value.checked_add(1) {
            Some(value) => Some(Self { value }),
            None => None,
        }
    }

    /// Returns the record one step back, or `None` for the initial record
    pub const fn predecessor(&self) -> Option<Self> {
        match self.value.checked_sub(1) {
            Some(value) => Some(Self { value }),
            None => None,
        }
    }

    /// Decodes a record from its on-medium bytes
    pub const fn decode(field: &[u8; RECORD_WIDTH]) -> Self {
        Self {
            value: u32::from_le_bytes(*field),
        }
    }

    /// Encodes the record to its on-medium bytes
    pub const fn encode(&self) -> [u8; RECORD_WIDTH] {
        self.value.to_le_bytes()
    }
}

impl From<u32> for CounterRecord {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<CounterRecord> for u32 {
    fn from(record: CounterRecord) -> Self {
        record.value
    }
}

impl core::fmt::Display for CounterRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_record() {
        let record = CounterRecord::initial();
        assert_eq!(record.value(), 0);
        assert!(record.is_initial());
        assert!(!record.looks_erased());
        assert_eq!(record, CounterRecord::default());
    }

    #[test]
    fn test_zeroed_bytes_decode_to_initial() {
        assert_eq!(CounterRecord::decode(&[0; RECORD_WIDTH]), CounterRecord::initial());
    }

    #[test]
    fn test_little_endian_layout() {
        let record = CounterRecord::new(0x0403_0201);
        assert_eq!(record.encode(), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(CounterRecord::decode(&[0x01, 0x02, 0x03, 0x04]), record);
    }

    #[test]
    fn test_next_increments_by_one() {
        let record = CounterRecord::new(41);
        assert_eq!(record.next(), Some(CounterRecord::new(42)));
    }

    #[test]
    fn test_next_rejects_overflow() {
        assert_eq!(CounterRecord::new(u32::MAX).next(), None);
    }

    #[test]
    fn test_predecessor() {
        assert_eq!(CounterRecord::new(7).predecessor(), Some(CounterRecord::new(6)));
        assert_eq!(CounterRecord::initial().predecessor(), None);
    }

    #[test]
    fn test_erased_pattern() {
        let record = CounterRecord::decode(&[ERASED_BYTE; RECORD_WIDTH]);
        assert!(record.looks_erased());
        assert_eq!(record.value(), u32::MAX);
        assert!(record.next().is_none());
    }

    #[test]
    fn test_conversions() {
        let record: CounterRecord = 9u32.into();
        assert_eq!(record.value(), 9);
        let raw: u32 = record.into();
        assert_eq!(raw, 9);
    }
}
