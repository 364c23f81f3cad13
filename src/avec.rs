//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode a telemetry log held in a slice,
//! publishing to the [`FromTelemetry`] trait. [`TelemetryDocument`] implements
//! this trait by collecting everything into an owned document, which is what
//! [`decode_document`] returns.
//!
//! The positions of the reason identifier and class of data areas, and the
//! block size, are vendor conventions captured by [`Layout`].

pub mod diagnostic;
pub mod document;
pub mod slice;
#[cfg(feature = "std")]
pub mod source;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use document::{CodEntry, CodValue, TelemetryDocument, decode as decode_document};
pub use slice::{Error, decode as decode_slice};
#[cfg(feature = "std")]
pub use source::decode as decode_source;

use crate::sans::{
    area::{DataAreaBoundary, MAX_AREAS},
    cod::CodRecord,
    header::{HEADER_SIZE, HeaderInfo},
    reason::ReasonIdRecord,
};

/// Receive the contents of a telemetry log.
///
/// Methods are called in log order: the header, then every data area
/// boundary, then the reason identifier records, then the COD records.
/// Diagnostics arrive whenever they are raised.
///
/// The default implementation of each method ignores received values.
#[allow(unused_variables)]
pub trait FromTelemetry {
    /// Add the header summary.
    fn add_header(&mut self, header: &HeaderInfo) {}
    /// Add the boundary of a data area, including absent areas.
    fn add_area(&mut self, boundary: DataAreaBoundary) {}
    /// Add a reason identifier record.
    fn add_reason_id(&mut self, record: ReasonIdRecord) {}
    /// Add a COD record found at an absolute offset.
    ///
    /// The record borrows its payload from the log, and must be copied out to
    /// be retained.
    fn add_cod(&mut self, offset: u64, record: CodRecord<'_>) {}
    /// Add a non-fatal problem found while decoding.
    fn add_diagnostic(&mut self, diagnostic: Diagnostic) {}
}

/// Vendor layout conventions of a telemetry log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Layout {
    /// Bytes per telemetry block. Block 0 holds the header.
    pub block_size: u32,
    /// Data area holding reason identifier slots.
    pub reason_id_area: u8,
    /// Data area holding COD records.
    pub cod_area: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            block_size: 512,
            reason_id_area: 1,
            cod_area: 2,
        }
    }
}

/// An inconsistent [`Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The block size cannot hold the header.
    #[error("Block size {0} is smaller than the header.")]
    BlockSize(u32),
    /// A designated data area is outside `1..=4`.
    #[error("Data area {0} does not exist.")]
    Area(u8),
    /// Reason identifiers and COD records are assigned the same area.
    #[error("Data area {0} is designated for both reason identifiers and COD records.")]
    SharedArea(u8),
}

impl Layout {
    /// Check the layout for consistency.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if (self.block_size as usize) < HEADER_SIZE {
            Err(LayoutError::BlockSize(self.block_size))?;
        }

        for area in [self.reason_id_area, self.cod_area] {
            if !(1..=MAX_AREAS).contains(&area) {
                Err(LayoutError::Area(area))?;
            }
        }

        if self.reason_id_area == self.cod_area {
            Err(LayoutError::SharedArea(self.cod_area))?;
        }

        Ok(())
    }
}
