//! WKT encoding/decoding.
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! geometry  := KIND [Z | M | ZM] (EMPTY | body)
//! point     := '(' x y [z] [m] ')'
//! points    := '(' coords {',' coords} ')'
//! polygon   := '(' points {',' points} ')'
//! multi     := '(' body {',' body} ')'
//! ```
//!
//! Compound curves and curve polygons mix untagged `points` lists with
//! tagged curves; geometry collections hold tagged geometries only.

use tracing::trace;

use crate::codec::byte_order::machine_byte_order;
use crate::codec::tokenizer::TokenStream;
use crate::error::{Format, GeometryIoError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{CoordinateSystem, Geometry, GeometryFactory, GeometryKind, Parts, Point, StandardFactory};

const EMPTY: &str = "EMPTY";

// =============================================================================
// DECODING
// =============================================================================

/// Reads a geometry from WKT, tagging it and all of its parts with `srid`.
///
/// The whole input must be consumed.
pub fn read_wkt(wkt: &str, srid: u32) -> Result<Geometry, GeometryIoError> {
    read_wkt_with(wkt, srid, &StandardFactory)
}

/// Reads a geometry from WKT, building it through the given factory.
pub fn read_wkt_with<F: GeometryFactory + ?Sized>(
    wkt: &str,
    srid: u32,
    factory: &F,
) -> Result<Geometry, GeometryIoError> {
    machine_byte_order()?;
    trace!(len = wkt.len(), srid, "reading WKT");

    let mut stream = TokenStream::new(wkt);
    let geometry = WktReader { factory, srid }.read_tagged(&mut stream, 0)?;

    if !stream.is_at_end() {
        return Err(GeometryIoError::TrailingData {
            format: Format::Wkt,
            position: stream.position(),
        });
    }
    Ok(geometry)
}

struct WktReader<'f, F: ?Sized> {
    factory: &'f F,
    srid: u32,
}

impl<F: GeometryFactory + ?Sized> WktReader<'_, F> {
    /// Reads `KIND [suffix] (EMPTY | body)`.
    fn read_tagged(&self, stream: &mut TokenStream<'_>, depth: usize) -> Result<Geometry, GeometryIoError> {
        let word = stream.next_word()?;
        let kind = GeometryKind::from_keyword(word)
            .ok_or_else(|| GeometryIoError::unexpected_token("geometry type", word))?;
        let cs = self.read_dimension(stream);
        self.read_body(stream, kind, cs, depth)
    }

    /// Consumes an optional `Z`, `M` or `ZM` word.
    fn read_dimension(&self, stream: &mut TokenStream<'_>) -> CoordinateSystem {
        let (has_z, has_m) = match stream.peek_word() {
            Some(w) if w.eq_ignore_ascii_case("Z") => (true, false),
            Some(w) if w.eq_ignore_ascii_case("M") => (false, true),
            Some(w) if w.eq_ignore_ascii_case("ZM") => (true, true),
            _ => return CoordinateSystem::xy(self.srid),
        };
        stream.skip_word();
        CoordinateSystem::new(has_z, has_m, self.srid)
    }

    /// Reads `EMPTY` or the parenthesized body of `kind`.
    fn read_body(
        &self,
        stream: &mut TokenStream<'_>,
        kind: GeometryKind,
        cs: CoordinateSystem,
        depth: usize,
    ) -> Result<Geometry, GeometryIoError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(GeometryIoError::NestingTooDeep {
                format: Format::Wkt,
                max: MAX_NESTING_DEPTH,
            });
        }

        if stream.peek_word().is_some_and(|w| w.eq_ignore_ascii_case(EMPTY)) {
            stream.skip_word();
            let parts = match kind {
                GeometryKind::Point => Parts::Coordinates(Vec::new()),
                _ => Parts::Children(Vec::new()),
            };
            return Ok(self.factory.build(kind, cs, parts)?);
        }

        let parts = match kind {
            GeometryKind::Point => {
                stream.expect_opener()?;
                let ordinates = read_coordinates(stream, cs)?;
                stream.expect_closer()?;
                Parts::Coordinates(ordinates)
            }
            GeometryKind::LineString | GeometryKind::CircularString => {
                Parts::Children(read_list(stream, |s| self.read_point(s, cs))?)
            }
            GeometryKind::Polygon | GeometryKind::Triangle => Parts::Children(read_list(stream, |s| {
                self.read_body(s, GeometryKind::LineString, cs, depth + 1)
            })?),
            GeometryKind::CompoundCurve | GeometryKind::CurvePolygon => {
                Parts::Children(read_list(stream, |s| self.read_curve(s, cs, depth + 1))?)
            }
            GeometryKind::MultiPoint => Parts::Children(read_list(stream, |s| {
                if s.peek_is_opener() || s.peek_word().is_some_and(|w| w.eq_ignore_ascii_case(EMPTY)) {
                    self.read_body(s, GeometryKind::Point, cs, depth + 1)
                } else {
                    self.read_point(s, cs)
                }
            })?),
            GeometryKind::MultiLineString => {
                Parts::Children(self.read_members(stream, GeometryKind::LineString, cs, depth)?)
            }
            GeometryKind::MultiPolygon | GeometryKind::PolyhedralSurface => {
                Parts::Children(self.read_members(stream, GeometryKind::Polygon, cs, depth)?)
            }
            GeometryKind::Tin => Parts::Children(self.read_members(stream, GeometryKind::Triangle, cs, depth)?),
            GeometryKind::GeometryCollection => {
                Parts::Children(read_list(stream, |s| self.read_tagged(s, depth + 1))?)
            }
        };

        Ok(self.factory.build(kind, cs, parts)?)
    }

    /// Reads a list of untagged `element` bodies.
    fn read_members(
        &self,
        stream: &mut TokenStream<'_>,
        element: GeometryKind,
        cs: CoordinateSystem,
        depth: usize,
    ) -> Result<Vec<Geometry>, GeometryIoError> {
        read_list(stream, |s| self.read_body(s, element, cs, depth + 1))
    }

    /// Reads an untagged `(points)` line string or a tagged curve.
    fn read_curve(
        &self,
        stream: &mut TokenStream<'_>,
        cs: CoordinateSystem,
        depth: usize,
    ) -> Result<Geometry, GeometryIoError> {
        if stream.peek_is_opener_or_word()? {
            self.read_body(stream, GeometryKind::LineString, cs, depth)
        } else {
            self.read_tagged(stream, depth)
        }
    }

    /// Reads bare coordinates into a point.
    fn read_point(&self, stream: &mut TokenStream<'_>, cs: CoordinateSystem) -> Result<Geometry, GeometryIoError> {
        let ordinates = read_coordinates(stream, cs)?;
        Ok(self.factory.build(GeometryKind::Point, cs, Parts::Coordinates(ordinates))?)
    }
}

fn read_coordinates(stream: &mut TokenStream<'_>, cs: CoordinateSystem) -> Result<Vec<f64>, GeometryIoError> {
    (0..cs.coordinate_dimension()).map(|_| stream.next_number()).collect()
}

/// Reads `'(' item {',' item} ')'`.
fn read_list<'a, T>(
    stream: &mut TokenStream<'a>,
    mut read_item: impl FnMut(&mut TokenStream<'a>) -> Result<T, GeometryIoError>,
) -> Result<Vec<T>, GeometryIoError> {
    stream.expect_opener()?;
    let mut items = Vec::new();
    loop {
        items.push(read_item(stream)?);
        if stream.next_closer_or_comma()? {
            return Ok(items);
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for writing WKT.
#[derive(Debug, Clone, Copy)]
pub struct WktOptions {
    /// Puts a space before opening parentheses and after commas.
    pub pretty_print: bool,
}

impl Default for WktOptions {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

impl WktOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the most compact output.
    pub fn compact() -> Self {
        Self { pretty_print: false }
    }
}

/// Writes geometries as WKT.
#[derive(Debug, Clone, Copy, Default)]
pub struct WktWriter {
    options: WktOptions,
}

impl WktWriter {
    pub fn new(options: WktOptions) -> Self {
        Self { options }
    }

    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::with_capacity(64);
        self.write_tagged(&mut out, geometry);
        out
    }

    fn write_tagged(&self, out: &mut String, geometry: &Geometry) {
        out.push_str(geometry.kind().keyword());
        if let Some(suffix) = geometry.coordinate_system().dimension_suffix() {
            out.push(' ');
            out.push_str(suffix);
        }
        if self.options.pretty_print || geometry.is_empty() {
            out.push(' ');
        }
        self.write_body(out, geometry);
    }

    fn write_body(&self, out: &mut String, geometry: &Geometry) {
        if geometry.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        match geometry {
            Geometry::Point(point) => {
                out.push('(');
                write_coordinates(out, point);
                out.push(')');
            }
            Geometry::LineString(points) | Geometry::CircularString(points) => {
                self.write_list(out, points.points(), |out, point| write_coordinates(out, point));
            }
            Geometry::Polygon(polygon) | Geometry::Triangle(polygon) => {
                self.write_list(out, polygon.rings(), |out, ring| self.write_body(out, ring));
            }
            Geometry::CurvePolygon(polygon) => {
                self.write_list(out, polygon.rings(), |out, ring| self.write_curve(out, ring));
            }
            Geometry::CompoundCurve(curves) => {
                self.write_list(out, curves.geometries(), |out, curve| self.write_curve(out, curve));
            }
            Geometry::MultiPoint(points) => {
                self.write_list(out, points.geometries(), |out, point| self.write_body(out, point));
            }
            Geometry::MultiLineString(c)
            | Geometry::MultiPolygon(c)
            | Geometry::PolyhedralSurface(c)
            | Geometry::Tin(c) => {
                self.write_list(out, c.geometries(), |out, member| self.write_body(out, member));
            }
            Geometry::GeometryCollection(c) => {
                self.write_list(out, c.geometries(), |out, member| self.write_tagged(out, member));
            }
        }
    }

    /// Line strings are written untagged, other curves with their keyword.
    fn write_curve(&self, out: &mut String, curve: &Geometry) {
        match curve {
            Geometry::LineString(_) => self.write_body(out, curve),
            _ => self.write_tagged(out, curve),
        }
    }

    fn write_list<T>(&self, out: &mut String, items: &[T], mut write_item: impl FnMut(&mut String, &T)) {
        out.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(if self.options.pretty_print { ", " } else { "," });
            }
            write_item(out, item);
        }
        out.push(')');
    }
}

/// Encodes a geometry as pretty-printed WKT.
pub fn write_wkt(geometry: &Geometry) -> String {
    WktWriter::default().write(geometry)
}

fn write_coordinates(out: &mut String, point: &Point) {
    use std::fmt::Write;

    for (i, ordinate) in point.ordinates().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", ordinate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Encountered, GeometryError};
    use crate::model::{GeometryCollection, LineString};
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Counts every construction call.
    #[derive(Default)]
    struct CountingFactory {
        calls: Cell<usize>,
    }

    impl GeometryFactory for CountingFactory {
        fn build(
            &self,
            kind: GeometryKind,
            cs: CoordinateSystem,
            parts: Parts,
        ) -> Result<Geometry, GeometryError> {
            self.calls.set(self.calls.get() + 1);
            StandardFactory.build(kind, cs, parts)
        }
    }

    #[test]
    fn test_read_point() {
        assert_eq!(read_wkt("POINT (1 2)", 0).unwrap(), Geometry::Point(Point::xy(1.0, 2.0)));
        assert_eq!(
            read_wkt("point z(1 2 3)", 0).unwrap(),
            Geometry::Point(Point::xyz(1.0, 2.0, 3.0))
        );
        assert_eq!(
            read_wkt("POINT ZM (1 2 3 4)", 0).unwrap(),
            Geometry::Point(Point::xyzm(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn test_missing_opener_names_token() {
        assert_eq!(
            read_wkt("POINT 1 2)", 0),
            Err(GeometryIoError::UnexpectedToken {
                expected: "'('",
                found: Encountered::Token("1".into()),
            })
        );
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(
            read_wkt("CIRCLE (1 2)", 0),
            Err(GeometryIoError::UnexpectedToken {
                expected: "geometry type",
                found: Encountered::Token("CIRCLE".into()),
            })
        );
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(
            read_wkt("POINT (1", 0),
            Err(GeometryIoError::UnexpectedToken {
                expected: "number",
                found: Encountered::EndOfStream,
            })
        );
    }

    #[test]
    fn test_too_many_ordinates() {
        assert_eq!(
            read_wkt("POINT (1 2 3)", 0),
            Err(GeometryIoError::UnexpectedToken {
                expected: "')'",
                found: Encountered::Token("3".into()),
            })
        );
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            read_wkt("POINT (1 2) x", 0),
            Err(GeometryIoError::TrailingData { format: Format::Wkt, position: 12 })
        );
    }

    #[test]
    fn test_empty_geometries() {
        let point = read_wkt("POINT M EMPTY", 0).unwrap();
        assert_eq!(point, Geometry::Point(Point::empty(CoordinateSystem::xym(0))));

        for wkt in ["LINESTRING EMPTY", "polygon empty", "GEOMETRYCOLLECTION Z EMPTY", "TIN EMPTY"] {
            let geometry = read_wkt(wkt, 0).unwrap();
            assert!(geometry.is_empty(), "{}", wkt);
        }
    }

    #[test]
    fn test_multipoint_forms() {
        let bare = read_wkt("MULTIPOINT (1 2, 3 4)", 0).unwrap();
        let wrapped = read_wkt("MULTIPOINT ((1 2), (3 4))", 0).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.count(), 2);

        let with_empty = read_wkt("MULTIPOINT (EMPTY, (1 2))", 0).unwrap();
        let points = with_empty.as_collection().unwrap();
        assert!(points.geometry(0).unwrap().is_empty());
    }

    #[test]
    fn test_multipoint_empty_member_uses_factory() {
        let factory = CountingFactory::default();
        let geometry = read_wkt_with("MULTIPOINT (EMPTY, (1 2))", 4326, &factory).unwrap();
        // Two points plus the multipoint itself.
        assert_eq!(factory.calls.get(), 3);

        let empty = geometry.as_collection().unwrap().geometry(0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.srid(), 4326);
    }

    #[test]
    fn test_overflowing_ordinate_rejected() {
        let result = read_wkt("POINT (1e999 2)", 0);
        assert!(matches!(
            result,
            Err(GeometryIoError::Geometry(GeometryError::InvalidGeometry {
                kind: GeometryKind::Point,
                ..
            }))
        ));
    }

    #[test]
    fn test_srid_propagation() {
        let geometry = read_wkt("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)), EMPTY)", 4326).unwrap();
        assert_eq!(geometry.srid(), 4326);
        let first = geometry.as_collection().unwrap().geometry(0).unwrap();
        assert_eq!(first.srid(), 4326);
        assert_eq!(first.as_polygon().unwrap().exterior_ring().unwrap().srid(), 4326);
    }

    #[test]
    fn test_curves() {
        let wkt = "COMPOUNDCURVE ((0 0, 1 1), CIRCULARSTRING (1 1, 2 2, 3 1))";
        let geometry = read_wkt(wkt, 0).unwrap();
        assert_eq!(geometry.kind(), GeometryKind::CompoundCurve);
        let curves = geometry.as_collection().unwrap();
        assert_eq!(curves.geometry(0).unwrap().kind(), GeometryKind::LineString);
        assert_eq!(curves.geometry(1).unwrap().kind(), GeometryKind::CircularString);
        assert_eq!(write_wkt(&geometry), wkt);

        let wkt = "CURVEPOLYGON (CIRCULARSTRING (0 0, 2 0, 2 2, 0 2, 0 0), (1 1, 1.5 1, 1 1.5, 1 1))";
        let geometry = read_wkt(wkt, 0).unwrap();
        assert_eq!(geometry.count(), 2);
        assert_eq!(write_wkt(&geometry), wkt);
    }

    #[test]
    fn test_curve_element_must_be_opener_or_word() {
        assert_eq!(
            read_wkt("COMPOUNDCURVE (1 2)", 0),
            Err(GeometryIoError::UnexpectedToken {
                expected: "'(' or word",
                found: Encountered::Token("1".into()),
            })
        );
    }

    #[test]
    fn test_geometry_collection() {
        let geometry = read_wkt("GEOMETRYCOLLECTION (POINT (1 2), LINESTRING EMPTY, TRIANGLE ((0 0, 1 0, 0 1, 0 0)))", 0)
            .unwrap();
        let members = geometry.as_collection().unwrap();
        assert_eq!(members.num_geometries(), 3);
        assert_eq!(members.geometry(2).unwrap().kind(), GeometryKind::Triangle);
    }

    #[test]
    fn test_member_dimension_mismatch() {
        let result = read_wkt("GEOMETRYCOLLECTION Z (POINT (1 2))", 0);
        assert!(matches!(
            result,
            Err(GeometryIoError::Geometry(GeometryError::CoordinateSystemMismatch { .. }))
        ));
    }

    #[test]
    fn test_construction_errors_surface() {
        let result = read_wkt("LINESTRING (1 2)", 0);
        assert!(matches!(
            result,
            Err(GeometryIoError::Geometry(GeometryError::InvalidGeometry {
                kind: GeometryKind::LineString,
                ..
            }))
        ));

        let result = read_wkt("CIRCULARSTRING (0 0, 1 1)", 0);
        assert!(matches!(result, Err(GeometryIoError::Geometry(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH + 2;
        let wkt = format!("{}POINT (1 2){}", "GEOMETRYCOLLECTION (".repeat(depth), ")".repeat(depth));
        assert_eq!(
            read_wkt(&wkt, 0),
            Err(GeometryIoError::NestingTooDeep { format: Format::Wkt, max: MAX_NESTING_DEPTH })
        );
    }

    #[test]
    fn test_writer_pretty_and_compact() {
        let point = Geometry::Point(Point::xyz(1.0, 2.0, 3.0));
        assert_eq!(write_wkt(&point), "POINT Z (1 2 3)");
        assert_eq!(WktWriter::new(WktOptions::compact()).write(&point), "POINT Z(1 2 3)");

        let line = Geometry::LineString(
            LineString::new(CoordinateSystem::xy(0), vec![Point::xy(0.5, -1.0), Point::xy(1e-3, 2.0)]).unwrap(),
        );
        assert_eq!(write_wkt(&line), "LINESTRING (0.5 -1, 0.001 2)");
        assert_eq!(WktWriter::new(WktOptions::compact()).write(&line), "LINESTRING(0.5 -1,0.001 2)");

        let empty = Geometry::Point(Point::empty(CoordinateSystem::xyzm(0)));
        assert_eq!(WktWriter::new(WktOptions::compact()).write(&empty), "POINT ZM EMPTY");
    }

    #[test]
    fn test_writer_collection_members_are_tagged() {
        let cs = CoordinateSystem::xym(0);
        let collection = Geometry::GeometryCollection(
            GeometryCollection::new(
                GeometryKind::GeometryCollection,
                cs,
                vec![Geometry::Point(Point::xym(1.0, 2.0, 3.0)), Geometry::Point(Point::empty(cs))],
            )
            .unwrap(),
        );
        let wkt = write_wkt(&collection);
        assert_eq!(wkt, "GEOMETRYCOLLECTION M (POINT M (1 2 3), POINT M EMPTY)");
        assert_eq!(read_wkt(&wkt, 0).unwrap(), collection);
    }

    fn arb_cs() -> impl Strategy<Value = CoordinateSystem> {
        (any::<bool>(), any::<bool>(), 0u32..10_000)
            .prop_map(|(z, m, srid)| CoordinateSystem::new(z, m, srid))
    }

    fn arb_point(cs: CoordinateSystem) -> impl Strategy<Value = Point> {
        prop::collection::vec(-1.0e9f64..1.0e9, cs.coordinate_dimension())
            .prop_map(move |ordinates| Point::new(cs, &ordinates).unwrap())
    }

    proptest! {
        #[test]
        fn prop_point_roundtrip(point in arb_cs().prop_flat_map(arb_point), pretty in any::<bool>()) {
            let geometry = Geometry::Point(point);
            let wkt = WktWriter::new(WktOptions { pretty_print: pretty }).write(&geometry);
            prop_assert_eq!(read_wkt(&wkt, geometry.srid()).unwrap(), geometry);
        }

        #[test]
        fn prop_line_string_roundtrip(
            geometry in arb_cs().prop_flat_map(|cs| {
                prop::collection::vec(arb_point(cs), 2..20)
                    .prop_map(move |points| Geometry::LineString(LineString::new(cs, points).unwrap()))
            })
        ) {
            let wkt = write_wkt(&geometry);
            prop_assert_eq!(read_wkt(&wkt, geometry.srid()).unwrap(), geometry);
        }
    }
}
