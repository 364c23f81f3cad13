//! States processing the telemetry log header.

use tartan_bitfield::bitfield;
use thiserror::Error;
use zerocopy::FromBytes;

use super::{area::AreaTable, cursor::TruncatedRead, text};

/// Number of bytes in the telemetry log header.
pub const HEADER_SIZE: usize = 512;

/// Number of bytes in the vendor reason identifier embedded in the header.
pub const REASON_IDENTIFIER_SIZE: usize = 128;

/// An error in the telemetry log header.
///
/// Any of these leaves no data area safely locatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The buffer is too short to hold the header.
    #[error("Header is truncated: {0}")]
    Truncated(#[from] TruncatedRead),
    /// A data area ends before the area preceding it.
    #[error("Data area {area} ends at block {last_block}, before the preceding area's block {previous}.")]
    NonMonotonicArea {
        area: u8,
        last_block: u32,
        previous: u32,
    },
    /// The requested number of data areas is outside `1..=4`.
    #[error("Requested {0} data areas; valid counts are 1 to 4.")]
    InvalidAreaCount(u8),
}

/// The initiator of a telemetry log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum LogIdentifier {
    /// Telemetry Host-Initiated log page (`0x07`).
    HostInitiated,
    /// Telemetry Controller-Initiated log page (`0x08`).
    ControllerInitiated,
    /// Any other log page identifier.
    Other(u8),
}

impl From<u8> for LogIdentifier {
    fn from(r: u8) -> Self {
        match r {
            0x07 => Self::HostInitiated,
            0x08 => Self::ControllerInitiated,
            _ => Self::Other(r),
        }
    }
}

/// Summary of the telemetry log header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeaderInfo {
    pub log_identifier: LogIdentifier,
    #[cfg_attr(feature = "serde", serde(serialize_with = "hex::serialize"))]
    pub ieee_oui: [u8; 3],
    /// Generation number of the host-initiated data.
    pub host_generation: u8,
    /// Whether the controller holds controller-initiated data not yet read.
    pub controller_available: bool,
    /// Generation number of the controller-initiated data.
    pub controller_generation: u8,
    pub reason_identifier: HeaderReasonIdentifier,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawHeader {
    log_identifier: u8,
    _reserved1: [u8; 4],
    ieee_oui: [u8; 3],
    last_block_1: [u8; 2],
    last_block_2: [u8; 2],
    last_block_3: [u8; 2],
    _reserved14: [u8; 2],
    last_block_4: [u8; 4],
    _reserved20: [u8; 361],
    host_generation: u8,
    controller_available: u8,
    controller_generation: u8,
    reason_identifier: [u8; REASON_IDENTIFIER_SIZE],
}

/// State token to decode a telemetry log header.
#[derive(Debug)]
pub struct TelemetryHeader;

impl TelemetryHeader {
    /// Transition to another state by decoding a telemetry log header.
    ///
    /// Returns a summary of the header, and a successor state token holding
    /// the data area table.
    pub fn advance(r: [u8; HEADER_SIZE]) -> (HeaderInfo, AreaTable) {
        let RawHeader {
            log_identifier,
            ieee_oui,
            last_block_1,
            last_block_2,
            last_block_3,
            last_block_4,
            host_generation,
            controller_available,
            controller_generation,
            reason_identifier,
            ..
        } = zerocopy::transmute!(r);

        bitfield! {
            struct ControllerAvailable(u8) {
                [0] is_available,
            }
        }

        let info = HeaderInfo {
            log_identifier: log_identifier.into(),
            ieee_oui,
            host_generation,
            controller_available: ControllerAvailable(controller_available).is_available(),
            controller_generation,
            reason_identifier: HeaderReasonIdentifier::from_bytes(reason_identifier),
        };

        let table = AreaTable {
            last_blocks: [
                u16::from_le_bytes(last_block_1).into(),
                u16::from_le_bytes(last_block_2).into(),
                u16::from_le_bytes(last_block_3).into(),
                u32::from_le_bytes(last_block_4),
            ],
        };

        (info, table)
    }
}

/// The vendor reason identifier embedded in the header.
///
/// Describes the event that caused the log to be captured, and the drive that
/// captured it. Text fields are fixed-width and padded; use the accessors to
/// read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeaderReasonIdentifier {
    pub version_major: u16,
    pub version_minor: u16,
    pub reason_code: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::avec::document::text"))]
    drive_status: [u8; 20],
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::avec::document::text"))]
    firmware_version: [u8; 12],
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::avec::document::text"))]
    bootloader_version: [u8; 12],
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::avec::document::text"))]
    serial_number: [u8; 20],
    /// Fields added in version 1.1.
    #[cfg_attr(
        feature = "serde",
        serde(flatten, skip_serializing_if = "Option::is_none")
    )]
    pub extension: Option<ReasonIdentifierExtension>,
}

/// Reason identifier fields present from version 1.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReasonIdentifierExtension {
    /// Log offset of the vendor data map.
    pub oem_data_map_offset: u64,
    pub telemetry_major: u8,
    pub telemetry_minor: u8,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawReasonIdentifier {
    version_major: [u8; 2],
    version_minor: [u8; 2],
    reason_code: [u8; 4],
    drive_status: [u8; 20],
    firmware_version: [u8; 12],
    bootloader_version: [u8; 12],
    serial_number: [u8; 20],
    // Reserved before version 1.1.
    oem_data_map_offset: [u8; 8],
    telemetry_major: u8,
    telemetry_minor: u8,
    _reserved: [u8; 46],
}

impl HeaderReasonIdentifier {
    fn from_bytes(r: [u8; REASON_IDENTIFIER_SIZE]) -> Self {
        let RawReasonIdentifier {
            version_major,
            version_minor,
            reason_code,
            drive_status,
            firmware_version,
            bootloader_version,
            serial_number,
            oem_data_map_offset,
            telemetry_major,
            telemetry_minor,
            ..
        } = zerocopy::transmute!(r);

        let version_major = u16::from_le_bytes(version_major);
        let version_minor = u16::from_le_bytes(version_minor);

        let extension = (version_major == 1 && version_minor >= 1).then(|| {
            ReasonIdentifierExtension {
                oem_data_map_offset: u64::from_le_bytes(oem_data_map_offset),
                telemetry_major,
                telemetry_minor,
            }
        });

        Self {
            version_major,
            version_minor,
            reason_code: u32::from_le_bytes(reason_code),
            drive_status,
            firmware_version,
            bootloader_version,
            serial_number,
            extension,
        }
    }

    pub fn drive_status(&self) -> Option<&str> {
        text(&self.drive_status)
    }

    pub fn firmware_version(&self) -> Option<&str> {
        text(&self.firmware_version)
    }

    pub fn bootloader_version(&self) -> Option<&str> {
        text(&self.bootloader_version)
    }

    pub fn serial_number(&self) -> Option<&str> {
        text(&self.serial_number)
    }
}
