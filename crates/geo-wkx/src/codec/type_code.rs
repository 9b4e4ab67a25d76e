//! Extended (ISO) WKB type codes.
//!
//! The code folds dimensionality into the geometry type:
//!
//! ```text
//! code = dimension * 1000 + base
//! dimension: 0 = XY, 1 = XYZ, 2 = XYM, 3 = XYZM
//! ```

use crate::error::GeometryIoError;
use crate::model::GeometryKind;

/// Exclusive upper bound of valid type codes.
pub const TYPE_CODE_LIMIT: u32 = 4000;

/// Multiplier of the dimension part of a type code.
const DIMENSION_FACTOR: u32 = 1000;

/// A decoded WKB type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WkbTypeCode {
    kind: GeometryKind,
    has_z: bool,
    has_m: bool,
}

impl WkbTypeCode {
    pub fn new(kind: GeometryKind, has_z: bool, has_m: bool) -> Self {
        Self { kind, has_z, has_m }
    }

    /// Decodes a raw type code.
    ///
    /// Codes at or above 4000 and codes whose base is not a supported kind
    /// both fail with `UnsupportedWkbType`.
    pub fn decode(code: u32) -> Result<Self, GeometryIoError> {
        if code >= TYPE_CODE_LIMIT {
            return Err(GeometryIoError::UnsupportedWkbType { code });
        }
        let base = code % DIMENSION_FACTOR;
        let dimension = code / DIMENSION_FACTOR;
        let kind = GeometryKind::from_code(base).ok_or(GeometryIoError::UnsupportedWkbType { code })?;
        Ok(Self {
            kind,
            has_z: dimension == 1 || dimension == 3,
            has_m: dimension == 2 || dimension == 3,
        })
    }

    /// Encodes back to the raw type code.
    pub fn encode(self) -> u32 {
        self.dimension() * DIMENSION_FACTOR + self.kind.code()
    }

    /// The dimension part: 0 = XY, 1 = XYZ, 2 = XYM, 3 = XYZM.
    pub fn dimension(self) -> u32 {
        self.has_z as u32 + 2 * self.has_m as u32
    }

    pub fn kind(self) -> GeometryKind {
        self.kind
    }

    pub fn has_z(self) -> bool {
        self.has_z
    }

    pub fn has_m(self) -> bool {
        self.has_m
    }
}
