//! Retrieval of telemetry logs from a device.
//!
//! _Requires Cargo feature `std`._

use std::vec::Vec;

use thiserror::Error;
use tracing::debug;

use crate::sans::area::check_area_count;

use super::{Error, Layout, TelemetryDocument, document};

extern crate std;

/// Number of data areas requested when none is specified.
pub const DEFAULT_DATA_AREA: u8 = 3;

/// How the device produces the returned log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Capture a new host-initiated log.
    #[default]
    HostNew,
    /// Return the existing host-initiated log unchanged.
    HostExisting,
    /// Return the log captured by the controller.
    Controller,
}

/// A telemetry log returned by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    pub log: Vec<u8>,
    /// Number of valid bytes in `log`, as reported by the transport.
    pub log_size: u64,
}

impl Telemetry {
    /// The valid bytes of the log.
    pub fn bytes(&self) -> &[u8] {
        let len = usize::try_from(self.log_size).unwrap_or(usize::MAX);
        &self.log[..len.min(self.log.len())]
    }
}

/// A transport able to retrieve telemetry logs.
pub trait TelemetrySource {
    type Error;

    /// Retrieve a log holding data areas `1..=data_area`.
    fn fetch_telemetry(
        &mut self,
        mode: GenerationMode,
        data_area: u8,
    ) -> Result<Telemetry, Self::Error>;
}

/// Errors occurring while retrieving and decoding a log.
#[derive(Debug, Error)]
pub enum SourceError<E> {
    /// The transport failed to retrieve the log.
    #[error("Failed to acquire telemetry log: {0}")]
    Fetch(E),
    /// The retrieved log could not be decoded.
    #[error(transparent)]
    Decode(#[from] Error),
}

/// Retrieve a telemetry log from a source and decode it into a document.
///
/// This method is also re-exported as `nvme_telemetry::avec::decode_source`.
///
/// _Requires Cargo feature `std`._
pub fn decode<S: TelemetrySource>(
    source: &mut S,
    mode: GenerationMode,
    data_area: u8,
    layout: &Layout,
) -> Result<TelemetryDocument, SourceError<S::Error>> {
    let data_area = check_area_count(data_area).map_err(Error::from)?;
    layout.validate().map_err(Error::from)?;

    let telemetry = source
        .fetch_telemetry(mode, data_area)
        .map_err(SourceError::Fetch)?;

    debug!(?mode, data_area, log_size = telemetry.log_size, "fetched telemetry log");

    Ok(document::decode(telemetry.bytes(), data_area, layout)?)
}
