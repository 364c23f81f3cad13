#![allow(dead_code)]

//! Synthetic telemetry logs.

pub const BLOCK: usize = 512;

/// A zeroed host-initiated log sized to hold every declared block.
pub fn log(last_blocks: [u32; 4]) -> Vec<u8> {
    let blocks = *last_blocks.iter().max().unwrap() as usize + 1;
    let mut log = vec![0; blocks * BLOCK];

    log[0] = 0x07;
    log[8..10].copy_from_slice(&(last_blocks[0] as u16).to_le_bytes());
    log[10..12].copy_from_slice(&(last_blocks[1] as u16).to_le_bytes());
    log[12..14].copy_from_slice(&(last_blocks[2] as u16).to_le_bytes());
    log[16..20].copy_from_slice(&last_blocks[3].to_le_bytes());

    log
}

/// Offset of the first byte of a data area, with the default block size.
pub fn area_start(last_blocks: [u32; 4], area: usize) -> usize {
    let previous = if area == 1 { 0 } else { last_blocks[area - 2] };
    (previous as usize + 1) * BLOCK
}

pub fn put(log: &mut [u8], offset: usize, bytes: &[u8]) -> usize {
    log[offset..offset + bytes.len()].copy_from_slice(bytes);
    offset + bytes.len()
}

pub fn slot(identifier: u32, generation: u32, timestamp: u64) -> Vec<u8> {
    let mut r = Vec::with_capacity(32);
    r.extend_from_slice(&identifier.to_le_bytes());
    r.extend_from_slice(&generation.to_le_bytes());
    r.extend_from_slice(&timestamp.to_le_bytes());
    r.extend_from_slice(&[identifier as u8; 16]);
    r
}

pub fn cod(tag: u8, attributes: u8, payload: &[u8]) -> Vec<u8> {
    let mut r = vec![tag, attributes];
    r.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    r.extend_from_slice(payload);
    r
}

pub fn temperature(current: i16, maximum: i16, minimum: i16) -> Vec<u8> {
    [current, maximum, minimum]
        .iter()
        .flat_map(|t| t.to_le_bytes())
        .collect()
}
