#![cfg(feature = "serde")]

use nvme_telemetry::avec::{Layout, decode_document};
use serde_json::{Value, json};

fn host_initiated() -> Value {
    let data = std::fs::read("fixtures/host-initiated.bin").unwrap();
    let document = decode_document(&data, 3, &Layout::default()).unwrap();
    serde_json::to_value(&document).unwrap()
}

#[test]
fn serializes_sections() {
    let value = host_initiated();

    assert_eq!(value["reason_identifiers"].as_array().unwrap().len(), 5);
    assert_eq!(value["class_of_data"].as_array().unwrap().len(), 8);
    assert_eq!(value["areas"].as_array().unwrap().len(), 4);

    assert_eq!(
        value["reason_identifiers"][0],
        json!({
            "identifier": 4097,
            "generation_number": 1,
            "timestamp": 1_700_000_000_000u64,
            "extra_data": "000102030405060708090a0b0c0d0e0f",
        })
    );
    assert_eq!(
        value["areas"][1],
        json!({ "area": 2, "start": 1536, "end": 2560 })
    );
}

#[test]
fn serializes_cod_records_by_class() {
    let value = host_initiated();
    let records = &value["class_of_data"];

    assert_eq!(
        records[0],
        json!({
            "offset": 1536,
            "revision": 1,
            "critical": false,
            "size": 12,
            "class": "lifetime",
            "power_on_hours": 12345,
            "power_cycles": 678,
            "unsafe_shutdowns": 9,
        })
    );
    assert_eq!(
        records[2],
        json!({
            "offset": 1562,
            "revision": 3,
            "critical": true,
            "size": 7,
            "class": "raw",
            "tag": 144,
            "payload": "deadbeef010203",
        })
    );
    assert_eq!(records[1]["minimum"], -5);
    assert_eq!(records[5]["class"], "identity");
    assert_eq!(records[5]["text"], "SSDPF2KX038T1");
}

#[test]
fn serializes_header() {
    let value = host_initiated();
    let header = &value["header"];

    assert_eq!(header["log_identifier"], "host_initiated");
    assert_eq!(header["ieee_oui"], "5cd2e4");
    assert_eq!(header["controller_available"], true);

    let reason = &header["reason_identifier"];
    assert_eq!(reason["reason_code"], 0x0001_0002);
    assert_eq!(reason["drive_status"], "Healthy");
    assert_eq!(reason["serial_number"], "PHAB123400AB3P8EGN");
    assert_eq!(reason["oem_data_map_offset"], 0x1000);
    assert_eq!(reason["telemetry_minor"], 3);
}

#[test]
fn serializes_diagnostics() {
    let value = host_initiated();
    let diagnostics = value["diagnostics"].as_array().unwrap();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["offset"], 1643);
    assert_eq!(diagnostics[0]["kind"], "short_payload");
    assert_eq!(
        diagnostics[0]["message"],
        "COD record of class `lifetime` holds 4 bytes, fewer than the 12 its layout requires."
    );
}

#[test]
fn omits_extension_before_version_1_1() {
    let data = std::fs::read("fixtures/controller-truncated.bin").unwrap();
    let document = decode_document(&data, 2, &Layout::default()).unwrap();
    let value = serde_json::to_value(&document).unwrap();
    let reason = &value["header"]["reason_identifier"];

    assert_eq!(reason["version_minor"], 0);
    assert!(reason.get("oem_data_map_offset").is_none());
    assert_eq!(value["header"]["log_identifier"], "controller_initiated");
}

#[test]
fn layout_deserializes_with_defaults() {
    let layout: Layout = serde_json::from_str(r#"{ "cod_area": 3 }"#).unwrap();

    assert_eq!(
        layout,
        Layout {
            cod_area: 3,
            ..Layout::default()
        }
    );
}
