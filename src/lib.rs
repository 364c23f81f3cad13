#![no_std]

//! A bounds-checked decoder for vendor NVMe telemetry logs.
//!
//! A telemetry log is a header block followed by up to four data areas. The
//! header's data area table locates each area, a designated area holds a run
//! of fixed-size reason identifier slots, and another holds variable-length,
//! class-tagged "class of data" (COD) records.
//!
//! Most users should begin with [`avec::decode_document`], which decodes a
//! buffer already retrieved from a device into a [`avec::TelemetryDocument`].
//! Damage to a data area is reported through diagnostics on the document;
//! only an unreadable or inconsistent header fails the decode. Applications
//! needing finer control can drive the building blocks in the [`sans`]
//! module directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `serde`: serialize documents and (de)serialize layouts (default).
//! - `std`: enable the telemetry source interface (default).

extern crate alloc;

pub mod avec;
pub mod sans;
