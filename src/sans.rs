//! Allocation-free building blocks for implementing decoders.
//!
//! This module is intended for applications that need fine control over how
//! a telemetry log is walked, or that cannot allocate. See [`crate::avec`] for
//! implementations covering common decoding patterns.
//!
//! # Architecture
//!
//! All buffer access goes through a [`cursor::Cursor`], which checks every
//! offset and width taken from the log before reading and reports a
//! [`cursor::TruncatedRead`] instead of reading out of bounds.
//!
//! Record layouts are represented by zero-size state tokens. Once enough
//! bytes are ready, transition to another state by calling the token's
//! `advance` method. This will return a successor state token, along with any
//! extracted data. The tokens never read from the buffer themselves: they are
//! handed exactly the bytes their layout describes, so the caller decides how
//! bytes are taken and where decoding of an area ends.
//!
//! Only the entry states, [`Decoder`] for the header, [`reason::ReasonSlot`]
//! for the reason identifier area and [`cod::CodHeader`] for the class of data
//! area, can be constructed.
//!
//! The following are not represented in the state tokens and must be
//! carefully written:
//!
//! - Resolving the data area table with [`area::AreaTable::resolve`] against
//! the number of bytes actually returned by the device.
//!
//! - Ending decoding of an area once its boundary is reached.
//!
//! - Taking exactly [`cod::CodBody::size`] payload bytes for every COD record,
//! whether or not its class is recognised.
//!
//! Implementers are recommended to begin by studying and modifying the
//! decoder in [`crate::avec::slice`].

pub mod area;
pub mod cod;
pub mod cursor;
pub mod header;
pub mod reason;

/// Entrypoint to the header state token.
pub type Decoder = header::TelemetryHeader;

/// Strip the NUL and space padding from a fixed-width text field.
pub(crate) fn trim_padding(r: &[u8]) -> &[u8] {
    let end = r
        .iter()
        .rposition(|b| *b != 0 && *b != b' ')
        .map_or(0, |i| i + 1);

    &r[..end]
}

/// Interpret a fixed-width text field, if it is non-empty UTF-8.
pub(crate) fn text(r: &[u8]) -> Option<&str> {
    let r = trim_padding(r);

    if !r.is_empty() {
        core::str::from_utf8(r).ok()
    } else {
        None
    }
}
