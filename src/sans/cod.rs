//! States processing class of data (COD) records.
//!
//! A COD record is a four byte header holding a class tag, an attribute byte
//! and the payload size, followed by exactly that many payload bytes. Known
//! classes are decoded into typed payloads; any other class is preserved
//! opaquely, so that new classes can be skipped by size alone. A record of
//! size zero ends the area.

use core::fmt;

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use zerocopy::{FromBytes, TryFromBytes};

/// Number of bytes in a COD record header.
pub const RECORD_HEADER_SIZE: usize = 4;

/// A class of data with a known payload layout.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum CodClass {
    Lifetime = 0x01,
    Temperature = 0x02,
    MediaWear = 0x03,
    ErrorCounters = 0x04,
    Identity = 0x05,
}

impl CodClass {
    /// Look up the class for a tag, if it is known.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let class: Result<Self, _> = zerocopy::try_transmute!(tag);
        class.ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lifetime => "lifetime",
            Self::Temperature => "temperature",
            Self::MediaWear => "media_wear",
            Self::ErrorCounters => "error_counters",
            Self::Identity => "identity",
        }
    }

    /// Minimum number of payload bytes the class layout occupies.
    pub fn layout_size(self) -> usize {
        match self {
            Self::Lifetime => size_of::<RawLifetime>(),
            Self::Temperature => size_of::<RawTemperature>(),
            Self::MediaWear => size_of::<RawMediaWear>(),
            Self::ErrorCounters => size_of::<RawErrorCounters>(),
            Self::Identity => 0,
        }
    }
}

impl fmt::Display for CodClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Power-on lifetime counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lifetime {
    pub power_on_hours: u32,
    pub power_cycles: u32,
    pub unsafe_shutdowns: u32,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawLifetime {
    power_on_hours: [u8; 4],
    power_cycles: [u8; 4],
    unsafe_shutdowns: [u8; 4],
}

/// Composite temperatures, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Temperature {
    pub current: i16,
    pub maximum: i16,
    pub minimum: i16,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawTemperature {
    current: [u8; 2],
    maximum: [u8; 2],
    minimum: [u8; 2],
}

/// Media endurance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MediaWear {
    /// Estimate of endurance used, which may exceed 100.
    pub percentage_used: u8,
    pub program_fails: u32,
    pub erase_fails: u32,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawMediaWear {
    percentage_used: u8,
    _reserved: u8,
    program_fails: [u8; 4],
    erase_fails: [u8; 4],
}

/// Error counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorCounters {
    pub media_errors: u64,
    pub crc_errors: u32,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawErrorCounters {
    media_errors: [u8; 8],
    crc_errors: [u8; 4],
}

/// The payload of a COD record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodPayload<'a> {
    Lifetime(Lifetime),
    Temperature(Temperature),
    MediaWear(MediaWear),
    ErrorCounters(ErrorCounters),
    /// Padded ASCII identity text.
    Identity(&'a [u8]),
    /// A known class whose payload is too short for its layout.
    Short(CodClass, &'a [u8]),
    /// A class without a known layout.
    Unknown(&'a [u8]),
}

/// A decoded COD record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodRecord<'a> {
    pub tag: u8,
    pub revision: u8,
    pub critical: bool,
    /// Number of payload bytes, excluding the record header.
    pub size: u16,
    pub payload: CodPayload<'a>,
}

impl CodRecord<'_> {
    /// The class of this record, if it is known.
    pub fn class(&self) -> Option<CodClass> {
        CodClass::from_tag(self.tag)
    }
}

/// State token to decode a COD record header.
#[derive(Debug)]
pub struct CodHeader;

/// State token marking the end of the COD records in an area.
#[derive(Debug)]
pub struct Terminator;

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawRecordHeader {
    tag: u8,
    attributes: u8,
    size: [u8; 2],
}

impl CodHeader {
    /// Transition to another state by decoding a COD record header.
    ///
    /// Returns a successor state token to decode the payload, or the
    /// terminator for a record of size zero.
    pub fn advance(self, r: [u8; RECORD_HEADER_SIZE]) -> Either<CodBody, Terminator> {
        let RawRecordHeader {
            tag,
            attributes,
            size,
        } = zerocopy::transmute!(r);

        bitfield! {
            struct Attributes(u8) {
                [0..4] revision: u8,
                [7] is_critical,
            }
        }

        let attributes = Attributes(attributes);
        let size = u16::from_le_bytes(size);

        if size != 0 {
            Left(CodBody {
                tag,
                revision: attributes.revision(),
                critical: attributes.is_critical(),
                size,
            })
        } else {
            Right(Terminator)
        }
    }
}

/// State token to decode a COD record payload.
#[derive(Debug)]
pub struct CodBody {
    tag: u8,
    revision: u8,
    critical: bool,
    size: u16,
}

impl CodBody {
    /// Number of payload bytes to supply to [`advance`](CodBody::advance).
    pub fn size(&self) -> usize {
        self.size.into()
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Transition to another state by decoding a COD record payload.
    ///
    /// **This method expects exactly [`size`](CodBody::size) bytes.** Only as
    /// many bytes as the class layout needs are interpreted; the rest are
    /// skipped.
    ///
    /// Returns the record, and a successor state token.
    pub fn advance(self, r: &[u8]) -> (CodRecord<'_>, CodHeader) {
        let payload = match CodClass::from_tag(self.tag) {
            Some(class) => decode_known(class, r).unwrap_or(CodPayload::Short(class, r)),
            None => CodPayload::Unknown(r),
        };

        let record = CodRecord {
            tag: self.tag,
            revision: self.revision,
            critical: self.critical,
            size: self.size,
            payload,
        };

        (record, CodHeader)
    }
}

fn decode_known(class: CodClass, r: &[u8]) -> Option<CodPayload<'_>> {
    fn read<T: FromBytes>(r: &[u8]) -> Option<T> {
        T::read_from_prefix(r).ok().map(|(t, _)| t)
    }

    Some(match class {
        CodClass::Lifetime => {
            let RawLifetime {
                power_on_hours,
                power_cycles,
                unsafe_shutdowns,
            } = read(r)?;

            CodPayload::Lifetime(Lifetime {
                power_on_hours: u32::from_le_bytes(power_on_hours),
                power_cycles: u32::from_le_bytes(power_cycles),
                unsafe_shutdowns: u32::from_le_bytes(unsafe_shutdowns),
            })
        }
        CodClass::Temperature => {
            let RawTemperature {
                current,
                maximum,
                minimum,
            } = read(r)?;

            CodPayload::Temperature(Temperature {
                current: i16::from_le_bytes(current),
                maximum: i16::from_le_bytes(maximum),
                minimum: i16::from_le_bytes(minimum),
            })
        }
        CodClass::MediaWear => {
            let RawMediaWear {
                percentage_used,
                program_fails,
                erase_fails,
                ..
            } = read(r)?;

            CodPayload::MediaWear(MediaWear {
                percentage_used,
                program_fails: u32::from_le_bytes(program_fails),
                erase_fails: u32::from_le_bytes(erase_fails),
            })
        }
        CodClass::ErrorCounters => {
            let RawErrorCounters {
                media_errors,
                crc_errors,
            } = read(r)?;

            CodPayload::ErrorCounters(ErrorCounters {
                media_errors: u64::from_le_bytes(media_errors),
                crc_errors: u32::from_le_bytes(crc_errors),
            })
        }
        CodClass::Identity => CodPayload::Identity(r),
    })
}
