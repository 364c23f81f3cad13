//! States processing reason identifier slots.

use zerocopy::FromBytes;

/// Number of bytes in a reason identifier slot.
pub const SLOT_SIZE: usize = 32;

/// Number of vendor-defined bytes trailing each slot.
pub const EXTRA_DATA_SIZE: usize = 16;

/// The cause of a telemetry-triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReasonIdRecord {
    /// Event cause. Never zero, which marks the end of the logged events.
    pub identifier: u32,
    pub generation_number: u32,
    pub timestamp: u64,
    #[cfg_attr(feature = "serde", serde(serialize_with = "hex::serialize"))]
    pub extra_data: [u8; EXTRA_DATA_SIZE],
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawSlot {
    identifier: [u8; 4],
    generation_number: [u8; 4],
    timestamp: [u8; 8],
    extra_data: [u8; EXTRA_DATA_SIZE],
}

/// State token to decode a reason identifier slot.
#[derive(Debug)]
pub struct ReasonSlot;

impl ReasonSlot {
    /// Transition to another state by decoding a reason identifier slot.
    ///
    /// Returns the record held by the slot and a successor state token, or
    /// nothing if the slot holds the sentinel and no further events are
    /// logged.
    pub fn advance(self, r: [u8; SLOT_SIZE]) -> Option<(ReasonIdRecord, ReasonSlot)> {
        let RawSlot {
            identifier,
            generation_number,
            timestamp,
            extra_data,
        } = zerocopy::transmute!(r);

        let identifier = u32::from_le_bytes(identifier);

        if identifier == 0 {
            return None;
        }

        let record = ReasonIdRecord {
            identifier,
            generation_number: u32::from_le_bytes(generation_number),
            timestamp: u64::from_le_bytes(timestamp),
            extra_data,
        };

        Some((record, self))
    }
}
