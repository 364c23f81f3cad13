//! An owned, structured telemetry document.

use alloc::{string::String, vec::Vec};

use crate::sans::{
    area::DataAreaBoundary,
    cod::{CodPayload, CodRecord, ErrorCounters, Lifetime, MediaWear, Temperature},
    header::HeaderInfo,
    reason::ReasonIdRecord,
    trim_padding,
};

use super::{Diagnostic, Error, FromTelemetry, Layout, slice};

/// Everything decoded from a telemetry log.
///
/// Sections hold records in log order. A section that could not be fully
/// decoded keeps the records read before the problem, and the problem is
/// listed in `diagnostics`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TelemetryDocument {
    pub header: Option<HeaderInfo>,
    pub areas: Vec<DataAreaBoundary>,
    pub reason_identifiers: Vec<ReasonIdRecord>,
    pub class_of_data: Vec<CodEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// An owned COD record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodEntry {
    /// Absolute offset of the record header.
    pub offset: u64,
    pub revision: u8,
    pub critical: bool,
    pub size: u16,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub value: CodValue,
}

/// The typed contents of a COD record, named by class.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "class", rename_all = "snake_case")
)]
pub enum CodValue {
    Lifetime(Lifetime),
    Temperature(Temperature),
    MediaWear(MediaWear),
    ErrorCounters(ErrorCounters),
    /// Padding is trimmed and bytes that are not UTF-8 are replaced.
    Identity { text: String },
    /// An unknown class, or a known class too short for its layout.
    Raw {
        tag: u8,
        #[cfg_attr(feature = "serde", serde(serialize_with = "hex::serialize"))]
        payload: Vec<u8>,
    },
}

impl CodEntry {
    pub fn new(offset: u64, record: CodRecord<'_>) -> Self {
        let value = match record.payload {
            CodPayload::Lifetime(v) => CodValue::Lifetime(v),
            CodPayload::Temperature(v) => CodValue::Temperature(v),
            CodPayload::MediaWear(v) => CodValue::MediaWear(v),
            CodPayload::ErrorCounters(v) => CodValue::ErrorCounters(v),
            CodPayload::Identity(r) => CodValue::Identity {
                text: String::from_utf8_lossy(trim_padding(r)).into_owned(),
            },
            CodPayload::Short(_, r) | CodPayload::Unknown(r) => CodValue::Raw {
                tag: record.tag,
                payload: r.to_vec(),
            },
        };

        Self {
            offset,
            revision: record.revision,
            critical: record.critical,
            size: record.size,
            value,
        }
    }
}

impl FromTelemetry for TelemetryDocument {
    fn add_header(&mut self, header: &HeaderInfo) {
        self.header = Some(*header);
    }

    fn add_area(&mut self, boundary: DataAreaBoundary) {
        self.areas.push(boundary);
    }

    fn add_reason_id(&mut self, record: ReasonIdRecord) {
        self.reason_identifiers.push(record);
    }

    fn add_cod(&mut self, offset: u64, record: CodRecord<'_>) {
        self.class_of_data.push(CodEntry::new(offset, record));
    }

    fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Decode a telemetry log from a slice into a document.
///
/// This method is also re-exported as `nvme_telemetry::avec::decode_document`.
pub fn decode(r: &[u8], requested: u8, layout: &Layout) -> Result<TelemetryDocument, Error> {
    let mut document = TelemetryDocument::default();
    slice::decode(r, requested, layout, &mut document)?;
    Ok(document)
}

/// Serialize a padded text field, or nothing if it is empty or not UTF-8.
#[cfg(feature = "serde")]
pub(crate) fn text<S: serde::Serializer>(r: &impl AsRef<[u8]>, s: S) -> Result<S::Ok, S::Error> {
    match crate::sans::text(r.as_ref()) {
        Some(t) => s.serialize_some(t),
        None => s.serialize_none(),
    }
}
