//! Non-fatal problems found while decoding.

use alloc::string::String;

use thiserror::Error;

use crate::sans::cod::CodClass;

/// A problem confined to one data area, found at an absolute log offset.
///
/// Records decoded before the problem are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub offset: u64,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        alloc::format!("{}", self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    /// A record extends past the readable bytes of its area.
    #[error("Record in data area {area} needs {width} bytes but only {available} remain.")]
    TruncatedRead {
        area: u8,
        width: usize,
        available: usize,
    },
    /// The header declares more of an area than the device returned.
    #[error("Data area {area} declares {declared} bytes but only {returned} were returned.")]
    TruncatedArea {
        area: u8,
        declared: u64,
        returned: u64,
    },
    /// A designated area is empty or was not requested.
    #[error("Data area {area} is absent.")]
    AreaAbsent { area: u8 },
    /// A known class with a payload too short for its layout, kept opaquely.
    #[error("COD record of class `{class}` holds {size} bytes, fewer than the {expected} its layout requires.")]
    ShortPayload {
        class: CodClass,
        size: u16,
        expected: usize,
    },
}

impl DiagnosticKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TruncatedRead { .. } => "truncated_read",
            Self::TruncatedArea { .. } => "truncated_area",
            Self::AreaAbsent { .. } => "area_absent",
            Self::ShortPayload { .. } => "short_payload",
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Diagnostic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Diagnostic", 3)?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("kind", self.kind.name())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}
