//! Geometry kinds and their wire identifiers.
//!
//! Every kind has exactly one entry in [`KIND_TABLE`], which carries its WKB
//! base code, WKT keyword and serialized layout. Readers and writers look
//! kinds up through the table rather than matching on codes themselves.

use std::fmt;

/// The closed set of concrete geometry kinds this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GeometryKind {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    PolyhedralSurface = 15,
    Tin = 16,
    Triangle = 17,
}

/// How a kind's payload is laid out in WKB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A single coordinate tuple.
    Coordinates,
    /// A count followed by bare coordinate tuples.
    Points,
    /// A count of rings, each a count followed by bare coordinate tuples.
    Rings,
    /// A count followed by complete nested geometries, each with a header.
    Geometries,
}

/// One row of the kind dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct KindEntry {
    pub kind: GeometryKind,
    pub keyword: &'static str,
    pub name: &'static str,
    pub layout: Layout,
}

/// Dispatch table for all supported kinds, keyed by WKB base code and WKT keyword.
pub const KIND_TABLE: &[KindEntry] = &[
    KindEntry { kind: GeometryKind::Point, keyword: "POINT", name: "Point", layout: Layout::Coordinates },
    KindEntry { kind: GeometryKind::LineString, keyword: "LINESTRING", name: "LineString", layout: Layout::Points },
    KindEntry { kind: GeometryKind::Polygon, keyword: "POLYGON", name: "Polygon", layout: Layout::Rings },
    KindEntry { kind: GeometryKind::MultiPoint, keyword: "MULTIPOINT", name: "MultiPoint", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::MultiLineString, keyword: "MULTILINESTRING", name: "MultiLineString", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::MultiPolygon, keyword: "MULTIPOLYGON", name: "MultiPolygon", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::GeometryCollection, keyword: "GEOMETRYCOLLECTION", name: "GeometryCollection", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::CircularString, keyword: "CIRCULARSTRING", name: "CircularString", layout: Layout::Points },
    KindEntry { kind: GeometryKind::CompoundCurve, keyword: "COMPOUNDCURVE", name: "CompoundCurve", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::CurvePolygon, keyword: "CURVEPOLYGON", name: "CurvePolygon", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::PolyhedralSurface, keyword: "POLYHEDRALSURFACE", name: "PolyhedralSurface", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::Tin, keyword: "TIN", name: "TIN", layout: Layout::Geometries },
    KindEntry { kind: GeometryKind::Triangle, keyword: "TRIANGLE", name: "Triangle", layout: Layout::Rings },
];

impl GeometryKind {
    /// Looks up a kind by its WKB base code (the type code modulo 1000).
    pub fn from_code(code: u32) -> Option<GeometryKind> {
        KIND_TABLE
            .iter()
            .find(|entry| entry.kind.code() == code)
            .map(|entry| entry.kind)
    }

    /// Looks up a kind by its WKT keyword, ignoring ASCII case.
    pub fn from_keyword(word: &str) -> Option<GeometryKind> {
        KIND_TABLE
            .iter()
            .find(|entry| entry.keyword.eq_ignore_ascii_case(word))
            .map(|entry| entry.kind)
    }

    /// Returns the WKB base code.
    pub fn code(self) -> u32 {
        self as u32
    }

    fn entry(self) -> &'static KindEntry {
        // Every variant has a table row; the fallback is never reached.
        KIND_TABLE
            .iter()
            .find(|entry| entry.kind == self)
            .unwrap_or(&KIND_TABLE[0])
    }

    /// Returns the upper-case WKT keyword.
    pub fn keyword(self) -> &'static str {
        self.entry().keyword
    }

    /// Returns the display name.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Returns the WKB payload layout.
    pub fn layout(self) -> Layout {
        self.entry().layout
    }

    /// Returns true for the one-dimensional kinds.
    pub fn is_curve(self) -> bool {
        matches!(
            self,
            GeometryKind::LineString | GeometryKind::CircularString | GeometryKind::CompoundCurve
        )
    }

    /// Returns the kind every element must have, for homogeneous collections.
    pub fn element_kind(self) -> Option<GeometryKind> {
        match self {
            GeometryKind::MultiPoint => Some(GeometryKind::Point),
            GeometryKind::MultiLineString => Some(GeometryKind::LineString),
            GeometryKind::MultiPolygon | GeometryKind::PolyhedralSurface => {
                Some(GeometryKind::Polygon)
            }
            GeometryKind::Tin => Some(GeometryKind::Triangle),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
