//! Slice-based decoder implementation.

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::sans::{
    Decoder,
    area::{AreaMap, DataAreaBoundary},
    cod::{CodHeader, CodPayload, RECORD_HEADER_SIZE},
    cursor::Cursor,
    header::{HEADER_SIZE, HeaderError},
    reason::{ReasonSlot, SLOT_SIZE},
};

use super::{Diagnostic, DiagnosticKind, FromTelemetry, Layout, LayoutError};

/// Errors preventing a telemetry log from being decoded at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The header is missing or inconsistent, so no area can be located.
    #[error("Invalid telemetry header: {0}")]
    InvalidHeader(#[from] HeaderError),
    /// The supplied layout is inconsistent.
    #[error("Invalid layout: {0}")]
    InvalidLayout(#[from] LayoutError),
}

/// Decode a telemetry log from a slice, publishing to a receiver.
///
/// `requested` is the number of data areas asked of the device, from 1 to 4.
/// The length of the slice is the authoritative log size, whatever the header
/// declares.
///
/// This method is also re-exported as `nvme_telemetry::avec::decode_slice`.
pub fn decode(
    r: &[u8],
    requested: u8,
    layout: &Layout,
    o: &mut impl FromTelemetry,
) -> Result<(), Error> {
    layout.validate()?;

    let cursor = Cursor::new(r);
    let header = cursor
        .read_array::<HEADER_SIZE>(0)
        .map_err(HeaderError::from)?;

    let (info, table) = Decoder::advance(header);
    o.add_header(&info);

    let log_size = r.len() as u64;
    let last_blocks = table.last_blocks();
    let areas = table.resolve(requested, layout.block_size.into(), log_size)?;

    debug!(requested, log_size, ?last_blocks, "resolved data areas");

    for &boundary in areas.boundaries() {
        o.add_area(boundary);

        if areas.is_truncated(boundary.area) {
            let declared = areas.declared(boundary.area).unwrap_or(boundary);
            let kind = DiagnosticKind::TruncatedArea {
                area: boundary.area,
                declared: declared.len(),
                returned: boundary.len(),
            };
            report(o, boundary.end, kind);
        }
    }

    if let Some(boundary) = designated(&areas, layout.reason_id_area, o) {
        decode_reason_ids(window(&cursor, &boundary), boundary.area, o);
    }

    if let Some(boundary) = designated(&areas, layout.cod_area, o) {
        decode_cod(window(&cursor, &boundary), boundary.area, o);
    }

    Ok(())
}

/// Locate a designated data area, reporting it if absent.
fn designated(
    areas: &AreaMap,
    area: u8,
    o: &mut impl FromTelemetry,
) -> Option<DataAreaBoundary> {
    let boundary = areas.get(area)?;

    if !boundary.is_absent() {
        Some(boundary)
    } else {
        // A truncated area has already been reported.
        if !areas.is_truncated(area) {
            report(o, boundary.start, DiagnosticKind::AreaAbsent { area });
        }
        None
    }
}

/// Decode reason identifier slots until the sentinel or the end of the area.
fn decode_reason_ids(mut cursor: Cursor<'_>, area: u8, o: &mut impl FromTelemetry) {
    let mut slot = ReasonSlot;
    let mut count = 0;

    while cursor.remaining() != 0 {
        let bytes = match cursor.take::<SLOT_SIZE>() {
            Ok(bytes) => bytes,
            Err(err) => {
                let kind = DiagnosticKind::TruncatedRead {
                    area,
                    width: err.width,
                    available: err.available,
                };
                report(o, err.offset as u64, kind);
                break;
            }
        };

        let Some((record, successor)) = slot.advance(bytes) else {
            trace!(offset = cursor.position() - SLOT_SIZE, "reached reason identifier sentinel");
            break;
        };

        trace!(identifier = record.identifier, "decoded reason identifier");
        o.add_reason_id(record);
        count += 1;

        slot = successor;
    }

    debug!(area, count, "decoded reason identifiers");
}

/// Decode COD records until a terminator or the end of the area.
///
/// The cursor advances by exactly the declared size of every record, known
/// class or not.
fn decode_cod(mut cursor: Cursor<'_>, area: u8, o: &mut impl FromTelemetry) {
    let mut header = CodHeader;
    let mut count = 0;

    while cursor.remaining() >= RECORD_HEADER_SIZE {
        let offset = cursor.position();

        let Ok(bytes) = cursor.take::<RECORD_HEADER_SIZE>() else {
            break;
        };

        let body = match header.advance(bytes) {
            Left(body) => body,
            Right(_) => {
                trace!(offset, "reached COD terminator");
                break;
            }
        };

        let tag = body.tag();
        let payload = match cursor.take_bytes(body.size()) {
            Ok(payload) => payload,
            Err(err) => {
                let kind = DiagnosticKind::TruncatedRead {
                    area,
                    width: err.width,
                    available: err.available,
                };
                report(o, offset as u64, kind);
                break;
            }
        };

        let (record, successor) = body.advance(payload);

        match record.payload {
            CodPayload::Short(class, _) => {
                let kind = DiagnosticKind::ShortPayload {
                    class,
                    size: record.size,
                    expected: class.layout_size(),
                };
                report(o, offset as u64, kind);
            }
            CodPayload::Unknown(_) => {
                trace!(offset, tag, size = record.size, "preserving COD record of unknown class");
            }
            _ => trace!(offset, tag, size = record.size, "decoded COD record"),
        }

        o.add_cod(offset as u64, record);
        count += 1;

        header = successor;
    }

    debug!(area, count, "decoded COD records");
}

/// Narrow a cursor to the bytes of a data area.
fn window<'a>(cursor: &Cursor<'a>, boundary: &DataAreaBoundary) -> Cursor<'a> {
    let start = usize::try_from(boundary.start).unwrap_or(usize::MAX);
    let end = usize::try_from(boundary.end).unwrap_or(usize::MAX);

    cursor.window(start, end)
}

fn report(o: &mut impl FromTelemetry, offset: u64, kind: DiagnosticKind) {
    warn!(offset, kind = kind.name(), "{}", kind);
    o.add_diagnostic(Diagnostic { offset, kind });
}
