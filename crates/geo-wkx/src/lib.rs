//! geo-wkx: Well-Known Binary and Well-Known Text geometry I/O.
//!
//! This crate reads OGC geometries from WKB and WKT, writes them back, and
//! wraps serialized geometries in lazy proxies that parse on first use.
//!
//! # Overview
//!
//! - **WKB**: both byte orders, mixed per nested geometry, ISO extended type
//!   codes (`1001` is Point Z, `3003` is Polygon ZM)
//! - **WKT**: case-insensitive keywords, `Z`/`M`/`ZM` suffixes, `EMPTY`,
//!   curves, surfaces and collections
//! - **Proxies**: hold raw WKB/WKT plus an SRID and build the geometry at most
//!   once, even under concurrent access
//!
//! # Quick Start
//!
//! ```rust
//! use geo_wkx::{read_wkt, read_wkb, write_wkb, GeometryKind, GeometryProxy, GeometryView};
//!
//! let point = read_wkt("POINT Z (1 2 3)", 4326).unwrap();
//! assert_eq!(point.kind(), GeometryKind::Point);
//! assert_eq!(point.srid(), 4326);
//!
//! let wkb = write_wkb(&point).unwrap();
//! assert_eq!(read_wkb(&wkb, 4326).unwrap(), point);
//!
//! let proxy = GeometryProxy::from_binary(GeometryKind::Point, wkb, 4326);
//! assert_eq!(proxy.as_text().unwrap(), "POINT Z (1 2 3)");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Geometry kinds, coordinate systems, geometry values, factories
//! - [`codec`]: WKB and WKT readers and writers
//! - [`proxy`]: Lazily materialized geometries
//! - [`error`]: Error types
//! - [`limits`]: Security limits for reading
//!
//! # Security
//!
//! The readers are designed to safely handle untrusted input:
//! - Every read is bounds checked; short input fails, never panics
//! - Declared counts never drive allocation beyond the remaining input
//! - Nesting depth is limited

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod proxy;

// Re-export commonly used types at crate root
pub use codec::{
    ByteOrder, WkbOptions, WkbWriter, WktOptions, WktWriter, machine_byte_order, read_wkb,
    read_wkb_with, read_wkt, read_wkt_with, write_wkb, write_wkt,
};
pub use error::{Encountered, ErrorCode, Format, GeometryError, GeometryIoError};
pub use model::{
    CoordinateSystem, Geometry, GeometryCollection, GeometryFactory, GeometryKind, GeometryView,
    LineString, Parts, Point, Polygon, StandardFactory,
};
pub use proxy::{GeometryProxy, RawPayload};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
