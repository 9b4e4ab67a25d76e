//! Error types for WKB/WKT reading, writing and geometry construction.

use std::fmt;

use thiserror::Error;

use crate::model::{CoordinateSystem, GeometryKind};

/// Error classes, one per family of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: The platform cannot run WKB I/O
    UnsupportedPlatform,
    /// E002: Malformed binary stream
    MalformedBinary,
    /// E003: Malformed text stream
    MalformedText,
    /// E004: Rejected by geometry construction
    InvalidGeometry,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedPlatform => "E001",
            ErrorCode::MalformedBinary => "E002",
            ErrorCode::MalformedText => "E003",
            ErrorCode::InvalidGeometry => "E004",
        }
    }
}

/// Serialization format, used to tag format-agnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Wkb,
    Wkt,
}

impl Format {
    fn malformed(self) -> ErrorCode {
        match self {
            Format::Wkb => ErrorCode::MalformedBinary,
            Format::Wkt => ErrorCode::MalformedText,
        }
    }

    fn error_code(self) -> &'static str {
        self.malformed().code()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Wkb => f.write_str("WKB"),
            Format::Wkt => f.write_str("WKT"),
        }
    }
}

/// What a WKT reader found where it wanted something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encountered {
    /// The literal text of the offending token.
    Token(String),
    EndOfStream,
}

impl fmt::Display for Encountered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encountered::Token(text) => write!(f, "'{}'", text),
            Encountered::EndOfStream => f.write_str("end of stream"),
        }
    }
}

/// Error raised while reading or writing WKB/WKT.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryIoError {
    // === E001: Platform ===
    #[error("[E001] unsupported platform: {reason}")]
    UnsupportedPlatform { reason: &'static str },

    // === E002: Binary ===
    #[error("[E002] unexpected end of stream while reading {context}: {needed} bytes needed, {remaining} remaining")]
    UnexpectedEndOfStream {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("[E002] invalid byte order marker: {value} (expected 0 or 1)")]
    InvalidByteOrder { value: u8 },

    #[error("[E002] unsupported WKB type: {code}")]
    UnsupportedWkbType { code: u32 },

    // === E003: Text ===
    #[error("[E003] expected {expected} but encountered {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: Encountered,
    },

    // === E002/E003: Shared ===
    #[error("[{}] unexpected data at end of {format} stream (position {position})", .format.error_code())]
    TrailingData { format: Format, position: usize },

    #[error("[{}] {format} geometry nesting exceeds maximum depth {max}", .format.error_code())]
    NestingTooDeep { format: Format, max: usize },

    // === E004: Construction ===
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl GeometryIoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GeometryIoError::UnsupportedPlatform { .. } => ErrorCode::UnsupportedPlatform,
            GeometryIoError::UnexpectedEndOfStream { .. }
            | GeometryIoError::InvalidByteOrder { .. }
            | GeometryIoError::UnsupportedWkbType { .. } => ErrorCode::MalformedBinary,
            GeometryIoError::UnexpectedToken { .. } => ErrorCode::MalformedText,
            GeometryIoError::TrailingData { format, .. }
            | GeometryIoError::NestingTooDeep { format, .. } => format.malformed(),
            GeometryIoError::Geometry(_) => ErrorCode::InvalidGeometry,
        }
    }

    pub(crate) fn unexpected_token(expected: &'static str, found: &str) -> Self {
        GeometryIoError::UnexpectedToken {
            expected,
            found: Encountered::Token(found.to_string()),
        }
    }
}

/// Error raised by the geometry construction interface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("[E004] invalid {kind}: {reason}")]
    InvalidGeometry {
        kind: GeometryKind,
        reason: &'static str,
    },

    #[error("[E004] {kind} is {expected} but contains a {found} geometry")]
    CoordinateSystemMismatch {
        kind: GeometryKind,
        expected: CoordinateSystem,
        found: CoordinateSystem,
    },

    #[error("[E004] expected {expected} but found {found}")]
    UnexpectedGeometryKind {
        expected: &'static str,
        found: GeometryKind,
    },
}
