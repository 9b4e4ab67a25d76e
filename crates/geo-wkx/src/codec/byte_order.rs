//! Byte order markers and machine byte order detection.

use lazy_static::lazy_static;

use crate::error::GeometryIoError;

/// Byte order of multi-byte values in a WKB stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ByteOrder {
    BigEndian = 0,
    LittleEndian = 1,
}

impl ByteOrder {
    /// Creates a ByteOrder from its WKB marker byte.
    pub fn from_u8(v: u8) -> Option<ByteOrder> {
        match v {
            0 => Some(ByteOrder::BigEndian),
            1 => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }

    /// Returns the WKB marker byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Pattern packed natively to observe the machine's integer layout.
const PACKED_ABCD: u32 = 0x6162_6364;

lazy_static! {
    static ref MACHINE_BYTE_ORDER: Result<ByteOrder, GeometryIoError> = detect_byte_order();
}

/// Returns the byte order of the running machine.
///
/// Detection runs once per process; every later call returns the same value.
/// Fails with `UnsupportedPlatform` when `f64` is not an 8-byte type or the
/// integer layout is neither big nor little endian.
pub fn machine_byte_order() -> Result<ByteOrder, GeometryIoError> {
    MACHINE_BYTE_ORDER.clone()
}

fn detect_byte_order() -> Result<ByteOrder, GeometryIoError> {
    check_double_width(std::mem::size_of::<f64>())?;
    classify_packed(PACKED_ABCD.to_ne_bytes())
}

fn check_double_width(width: usize) -> Result<(), GeometryIoError> {
    if width != 8 {
        return Err(GeometryIoError::UnsupportedPlatform {
            reason: "the double type is not 64 bit",
        });
    }
    Ok(())
}

fn classify_packed(packed: [u8; 4]) -> Result<ByteOrder, GeometryIoError> {
    match &packed {
        b"abcd" => Ok(ByteOrder::BigEndian),
        b"dcba" => Ok(ByteOrder::LittleEndian),
        _ => Err(GeometryIoError::UnsupportedPlatform {
            reason: "the machine byte order cannot be determined",
        }),
    }
}
