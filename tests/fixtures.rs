use std::path::Path;

use csv::ReaderBuilder;
use nvme_telemetry::{
    avec::{Diagnostic, FromTelemetry, Layout},
    sans::{
        area::DataAreaBoundary,
        cod::{CodPayload, CodRecord},
        header::{HeaderInfo, LogIdentifier},
        reason::ReasonIdRecord,
    },
};

#[test]
fn decode_slice_host_initiated() {
    const PATH: &str = "fixtures/host-initiated.bin";
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    nvme_telemetry::avec::decode_slice(&data, 3, &Layout::default(), &mut validator).unwrap();
    validator.finish();
}

#[test]
fn decode_slice_controller_truncated() {
    const PATH: &str = "fixtures/controller-truncated.bin";
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);
    nvme_telemetry::avec::decode_slice(&data, 2, &Layout::default(), &mut validator).unwrap();
    validator.finish();
}

#[test]
fn header_host_initiated() {
    let data = std::fs::read("fixtures/host-initiated.bin").unwrap();
    let document = nvme_telemetry::avec::decode_document(&data, 3, &Layout::default()).unwrap();
    let header = document.header.unwrap();

    assert_eq!(header.log_identifier, LogIdentifier::HostInitiated);
    assert_eq!(header.ieee_oui, [0x5c, 0xd2, 0xe4]);
    assert_eq!(header.host_generation, 3);
    assert!(header.controller_available);
    assert_eq!(header.controller_generation, 2);

    let reason = header.reason_identifier;
    assert_eq!((reason.version_major, reason.version_minor), (1, 1));
    assert_eq!(reason.reason_code, 0x0001_0002);
    assert_eq!(reason.drive_status(), Some("Healthy"));
    assert_eq!(reason.firmware_version(), Some("7CV10100"));
    assert_eq!(reason.bootloader_version(), Some("7B10"));
    assert_eq!(reason.serial_number(), Some("PHAB123400AB3P8EGN"));

    let extension = reason.extension.unwrap();
    assert_eq!(extension.oem_data_map_offset, 0x1000);
    assert_eq!((extension.telemetry_major, extension.telemetry_minor), (2, 3));
}

#[test]
fn header_controller_initiated() {
    let data = std::fs::read("fixtures/controller-truncated.bin").unwrap();
    let document = nvme_telemetry::avec::decode_document(&data, 2, &Layout::default()).unwrap();
    let header = document.header.unwrap();

    assert_eq!(header.log_identifier, LogIdentifier::ControllerInitiated);
    assert!(!header.controller_available);
    assert_eq!(header.controller_generation, 7);

    let reason = header.reason_identifier;
    assert_eq!((reason.version_major, reason.version_minor), (1, 0));
    assert_eq!(reason.drive_status(), Some("Assert"));
    assert_eq!(reason.extension, None);
}

/// Checks each received item against the next row of a fixture's CSV file.
struct Validator(Vec<Vec<String>>);

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self(expected)
    }

    fn next(&mut self, kind: &str, fields: &[String]) {
        assert!(!self.0.is_empty(), "unexpected {kind}: {fields:?}");
        let row = self.0.remove(0);
        assert_eq!(row[0], kind);
        assert_eq!(&row[1..], fields);
    }

    fn finish(self) {
        assert!(self.0.is_empty(), "missing rows: {:?}", self.0);
    }
}

impl FromTelemetry for Validator {
    fn add_header(&mut self, header: &HeaderInfo) {
        assert_ne!(header.log_identifier, LogIdentifier::Other(0));
    }

    fn add_area(&mut self, boundary: DataAreaBoundary) {
        self.next(
            "area",
            &[
                boundary.area.to_string(),
                boundary.start.to_string(),
                boundary.end.to_string(),
            ],
        );
    }

    fn add_reason_id(&mut self, record: ReasonIdRecord) {
        self.next(
            "reason",
            &[
                record.identifier.to_string(),
                record.generation_number.to_string(),
                record.timestamp.to_string(),
                hex::encode(record.extra_data),
            ],
        );
    }

    fn add_cod(&mut self, offset: u64, record: CodRecord<'_>) {
        let name = match record.payload {
            CodPayload::Short(..) | CodPayload::Unknown(_) => "raw",
            _ => record.class().unwrap().name(),
        };

        self.next(
            "cod",
            &[
                offset.to_string(),
                record.tag.to_string(),
                record.size.to_string(),
                name.to_string(),
            ],
        );
    }

    fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.next(
            "diagnostic",
            &[diagnostic.offset.to_string(), diagnostic.kind.name().to_string()],
        );
    }
}
