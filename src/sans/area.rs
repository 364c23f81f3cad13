//! Data area boundaries.

use super::header::HeaderError;

/// Maximum number of data areas in a telemetry log.
pub const MAX_AREAS: u8 = 4;

/// The byte range of a data area within the log.
///
/// An area whose start and end coincide is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataAreaBoundary {
    /// Data area number, from 1 to 4.
    pub area: u8,
    /// Absolute offset of the first byte.
    pub start: u64,
    /// Absolute offset one past the last byte.
    pub end: u64,
}

impl DataAreaBoundary {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_absent(&self) -> bool {
        self.start == self.end
    }
}

/// Check a requested number of data areas.
pub fn check_area_count(requested: u8) -> Result<u8, HeaderError> {
    if (1..=MAX_AREAS).contains(&requested) {
        Ok(requested)
    } else {
        Err(HeaderError::InvalidAreaCount(requested))
    }
}

/// State token holding the data area table of a header.
#[derive(Debug)]
pub struct AreaTable {
    pub(super) last_blocks: [u32; MAX_AREAS as usize],
}

impl AreaTable {
    /// The last block of each data area, as declared by the header.
    ///
    /// Only as many entries as were requested from the device are meaningful.
    pub fn last_blocks(&self) -> [u32; MAX_AREAS as usize] {
        self.last_blocks
    }

    /// Transition to the final state by resolving the table into byte ranges.
    ///
    /// Block 0 holds the header, so the area ending at block `L` and following
    /// an area ending at block `P` spans `(P + 1) * block_size` up to
    /// `(L + 1) * block_size`. Areas past `requested` are absent. Boundaries
    /// are clamped to `log_size`, the number of bytes actually returned.
    pub fn resolve(
        self,
        requested: u8,
        block_size: u64,
        log_size: u64,
    ) -> Result<AreaMap, HeaderError> {
        let requested = check_area_count(requested)?;

        let mut map = AreaMap {
            boundaries: Default::default(),
            declared: Default::default(),
        };

        let mut previous = 0;

        for (i, &last_block) in self.last_blocks.iter().enumerate() {
            let area = i as u8 + 1;

            let last_block = if area <= requested {
                last_block
            } else {
                previous
            };

            if last_block < previous {
                Err(HeaderError::NonMonotonicArea {
                    area,
                    last_block,
                    previous,
                })?;
            }

            let start = (u64::from(previous) + 1) * block_size;
            let end = (u64::from(last_block) + 1) * block_size;

            map.declared[i] = DataAreaBoundary { area, start, end };
            map.boundaries[i] = DataAreaBoundary {
                area,
                start: start.min(log_size),
                end: end.min(log_size),
            };

            previous = last_block;
        }

        Ok(map)
    }
}

/// Byte ranges of the data areas of a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaMap {
    boundaries: [DataAreaBoundary; MAX_AREAS as usize],
    declared: [DataAreaBoundary; MAX_AREAS as usize],
}

impl AreaMap {
    /// Boundaries of all four data areas, in order.
    pub fn boundaries(&self) -> &[DataAreaBoundary] {
        &self.boundaries
    }

    /// Boundary of a data area, if the area number is valid.
    pub fn get(&self, area: u8) -> Option<DataAreaBoundary> {
        self.boundaries.get(usize::from(area).checked_sub(1)?).copied()
    }

    /// Boundary of a data area as declared by the header, before clamping.
    pub fn declared(&self, area: u8) -> Option<DataAreaBoundary> {
        self.declared.get(usize::from(area).checked_sub(1)?).copied()
    }

    /// Whether the header declares more of a data area than was returned.
    pub fn is_truncated(&self, area: u8) -> bool {
        match (self.get(area), self.declared(area)) {
            (Some(boundary), Some(declared)) => {
                !declared.is_absent() && declared.end > boundary.end
            }
            _ => false,
        }
    }
}
