//! Primitive encoding/decoding for the WKB binary format.
//!
//! Every multi-byte read and write takes an explicit byte order, since a
//! single WKB stream may switch order at each nested geometry header.

use crate::codec::byte_order::ByteOrder;
use crate::error::GeometryIoError;

// =============================================================================
// DECODING
// =============================================================================

/// Forward-only cursor over a WKB byte buffer.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct WkbCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WkbCursor<'a> {
    /// Creates a new cursor from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly N bytes.
    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], GeometryIoError> {
        if self.remaining_len() < N {
            return Err(GeometryIoError::UnexpectedEndOfStream {
                context,
                needed: N,
                remaining: self.remaining_len(),
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, GeometryIoError> {
        let [byte] = self.read_array::<1>(context)?;
        Ok(byte)
    }

    /// Reads a 4-byte unsigned integer.
    #[inline]
    pub fn read_u32(&mut self, order: ByteOrder, context: &'static str) -> Result<u32, GeometryIoError> {
        let bytes = self.read_array::<4>(context)?;
        Ok(match order {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        })
    }

    /// Reads an 8-byte IEEE 754 double. NaN is allowed; it marks empty points.
    #[inline]
    pub fn read_f64(&mut self, order: ByteOrder, context: &'static str) -> Result<f64, GeometryIoError> {
        let bytes = self.read_array::<8>(context)?;
        Ok(match order {
            ByteOrder::BigEndian => f64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => f64::from_le_bytes(bytes),
        })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for WKB output in one byte order.
#[derive(Debug, Clone)]
pub struct WkbBuffer {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl WkbBuffer {
    /// Creates a new buffer writing in the given byte order.
    pub fn new(order: ByteOrder) -> Self {
        Self { buf: Vec::new(), order }
    }

    /// Creates a new buffer with capacity.
    pub fn with_capacity(order: ByteOrder, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            order,
        }
    }

    /// Returns the byte order this buffer writes in.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes a 4-byte unsigned integer.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.buf.extend_from_slice(&bytes);
    }

    /// Writes an 8-byte IEEE 754 double.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.buf.extend_from_slice(&bytes);
    }
}
