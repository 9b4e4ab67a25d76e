//! WKB encoding/decoding.
//!
//! Implements the OGC Well-Known Binary format with ISO extended type codes
//! (`dimension * 1000 + base`). Layout per geometry:
//!
//! ```text
//! byte order (1 byte: 0 big, 1 little)
//! type code  (u32)
//! payload    (coordinates | count + coordinates | count + rings | count + geometries)
//! ```

use tracing::trace;

use crate::codec::byte_order::{ByteOrder, machine_byte_order};
use crate::codec::primitives::{WkbBuffer, WkbCursor};
use crate::codec::type_code::WkbTypeCode;
use crate::error::{Format, GeometryIoError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{
    CoordinateSystem, Geometry, GeometryFactory, GeometryKind, Layout, LineString, Parts, Point,
    StandardFactory,
};

// =============================================================================
// DECODING
// =============================================================================

/// Reads a geometry from WKB.
///
/// `srid` is assigned to the geometry and all of its parts, since plain WKB
/// carries no SRID. The whole buffer must be consumed.
pub fn read_wkb(wkb: &[u8], srid: u32) -> Result<Geometry, GeometryIoError> {
    read_wkb_with(wkb, srid, &StandardFactory)
}

/// Reads a geometry from WKB, building it through the given factory.
pub fn read_wkb_with<F: GeometryFactory + ?Sized>(
    wkb: &[u8],
    srid: u32,
    factory: &F,
) -> Result<Geometry, GeometryIoError> {
    machine_byte_order()?;
    trace!(len = wkb.len(), srid, "reading WKB");

    let mut cursor = WkbCursor::new(wkb);
    let geometry = WkbReader { factory, srid }.read_geometry(&mut cursor, 0)?;

    if !cursor.is_at_end() {
        return Err(GeometryIoError::TrailingData {
            format: Format::Wkb,
            position: cursor.position(),
        });
    }
    Ok(geometry)
}

struct WkbReader<'f, F: ?Sized> {
    factory: &'f F,
    srid: u32,
}

impl<F: GeometryFactory + ?Sized> WkbReader<'_, F> {
    /// Reads one complete geometry: header, then payload.
    ///
    /// Nested geometries carry their own header, so byte order and
    /// dimensionality are never inherited from the parent.
    fn read_geometry(&self, cursor: &mut WkbCursor<'_>, depth: usize) -> Result<Geometry, GeometryIoError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(GeometryIoError::NestingTooDeep {
                format: Format::Wkb,
                max: MAX_NESTING_DEPTH,
            });
        }

        let order = read_byte_order(cursor)?;
        let type_code = WkbTypeCode::decode(cursor.read_u32(order, "geometry type")?)?;
        let kind = type_code.kind();
        let cs = CoordinateSystem::new(type_code.has_z(), type_code.has_m(), self.srid);

        let parts = match kind.layout() {
            Layout::Coordinates => Parts::Coordinates(read_coordinates(cursor, order, cs)?),
            Layout::Points => Parts::Children(self.read_points(cursor, order, cs)?),
            Layout::Rings => {
                let count = read_count(cursor, order, "ring count")?;
                let mut rings = Vec::with_capacity(count.min(cursor.remaining_len() / 4));
                for _ in 0..count {
                    let points = self.read_points(cursor, order, cs)?;
                    rings.push(self.factory.build(GeometryKind::LineString, cs, Parts::Children(points))?);
                }
                Parts::Children(rings)
            }
            Layout::Geometries => {
                let count = read_count(cursor, order, "geometry count")?;
                // Smallest nested geometry: marker + type code + count.
                let mut geometries = Vec::with_capacity(count.min(cursor.remaining_len() / 9));
                for _ in 0..count {
                    geometries.push(self.read_geometry(cursor, depth + 1)?);
                }
                Parts::Children(geometries)
            }
        };

        Ok(self.factory.build(kind, cs, parts)?)
    }

    /// Reads a point count followed by bare coordinate tuples.
    fn read_points(
        &self,
        cursor: &mut WkbCursor<'_>,
        order: ByteOrder,
        cs: CoordinateSystem,
    ) -> Result<Vec<Geometry>, GeometryIoError> {
        let count = read_count(cursor, order, "point count")?;
        let tuple_len = 8 * cs.coordinate_dimension();
        let mut points = Vec::with_capacity(count.min(cursor.remaining_len() / tuple_len));
        for _ in 0..count {
            let ordinates = read_coordinates(cursor, order, cs)?;
            points.push(self.factory.build(GeometryKind::Point, cs, Parts::Coordinates(ordinates))?);
        }
        Ok(points)
    }
}

fn read_byte_order(cursor: &mut WkbCursor<'_>) -> Result<ByteOrder, GeometryIoError> {
    let value = cursor.read_byte("byte order")?;
    ByteOrder::from_u8(value).ok_or(GeometryIoError::InvalidByteOrder { value })
}

fn read_count(cursor: &mut WkbCursor<'_>, order: ByteOrder, context: &'static str) -> Result<usize, GeometryIoError> {
    Ok(cursor.read_u32(order, context)? as usize)
}

/// Reads X, Y, [Z], [M]. A tuple of NaNs is the empty point and yields no ordinates.
fn read_coordinates(
    cursor: &mut WkbCursor<'_>,
    order: ByteOrder,
    cs: CoordinateSystem,
) -> Result<Vec<f64>, GeometryIoError> {
    let dimension = cs.coordinate_dimension();
    let mut ordinates = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        ordinates.push(cursor.read_f64(order, "coordinate")?);
    }
    if ordinates.iter().all(|v| v.is_nan()) {
        ordinates.clear();
    }
    Ok(ordinates)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for writing WKB.
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbOptions {
    /// Byte order of the output, or `None` for the machine byte order.
    pub byte_order: Option<ByteOrder>,
}

impl WkbOptions {
    /// Creates default options (machine byte order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options writing in a fixed byte order.
    pub fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self { byte_order: Some(byte_order) }
    }
}

/// Writes geometries as WKB with extended type codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WkbWriter {
    options: WkbOptions,
}

impl WkbWriter {
    pub fn new(options: WkbOptions) -> Self {
        Self { options }
    }

    /// Encodes a geometry.
    pub fn write(&self, geometry: &Geometry) -> Result<Vec<u8>, GeometryIoError> {
        let machine = machine_byte_order()?;
        let order = self.options.byte_order.unwrap_or(machine);
        let mut buffer = WkbBuffer::with_capacity(order, 64);
        write_geometry(&mut buffer, geometry);
        Ok(buffer.into_bytes())
    }
}

/// Encodes a geometry as WKB in the machine byte order.
pub fn write_wkb(geometry: &Geometry) -> Result<Vec<u8>, GeometryIoError> {
    WkbWriter::default().write(geometry)
}

fn write_geometry(buffer: &mut WkbBuffer, geometry: &Geometry) {
    let cs = geometry.coordinate_system();
    buffer.write_byte(buffer.order().to_u8());
    buffer.write_u32(WkbTypeCode::new(geometry.kind(), cs.has_z(), cs.has_m()).encode());

    match geometry {
        Geometry::Point(point) => write_coordinates(buffer, point),
        Geometry::LineString(points) | Geometry::CircularString(points) => write_points(buffer, points),
        Geometry::Polygon(polygon) | Geometry::Triangle(polygon) => {
            buffer.write_u32(polygon.rings().len() as u32);
            for ring in polygon.rings().iter().filter_map(Geometry::as_line_string) {
                write_points(buffer, ring);
            }
        }
        Geometry::CurvePolygon(polygon) => write_geometries(buffer, polygon.rings()),
        Geometry::CompoundCurve(c)
        | Geometry::MultiPoint(c)
        | Geometry::MultiLineString(c)
        | Geometry::MultiPolygon(c)
        | Geometry::GeometryCollection(c)
        | Geometry::PolyhedralSurface(c)
        | Geometry::Tin(c) => write_geometries(buffer, c.geometries()),
    }
}

fn write_geometries(buffer: &mut WkbBuffer, geometries: &[Geometry]) {
    buffer.write_u32(geometries.len() as u32);
    for geometry in geometries {
        write_geometry(buffer, geometry);
    }
}

fn write_points(buffer: &mut WkbBuffer, points: &LineString) {
    buffer.write_u32(points.num_points() as u32);
    for point in points.points() {
        write_coordinates(buffer, point);
    }
}

/// Writes X, Y, [Z], [M]; the empty point is written as NaNs.
fn write_coordinates(buffer: &mut WkbBuffer, point: &Point) {
    if point.is_empty() {
        for _ in 0..point.coordinate_system().coordinate_dimension() {
            buffer.write_f64(f64::NAN);
        }
    } else {
        for &ordinate in point.ordinates() {
            buffer.write_f64(ordinate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::model::GeometryCollection;
    use proptest::prelude::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn le_point(x: f64, y: f64) -> Vec<u8> {
        let mut buffer = WkbBuffer::new(ByteOrder::LittleEndian);
        buffer.write_byte(1);
        buffer.write_u32(1);
        buffer.write_f64(x);
        buffer.write_f64(y);
        buffer.into_bytes()
    }

    #[test]
    fn test_read_point_little_endian() {
        let wkb = hex("0101000000000000000000F03F0000000000000040");
        let geometry = read_wkb(&wkb, 0).unwrap();
        assert_eq!(geometry, Geometry::Point(Point::xy(1.0, 2.0)));
    }

    #[test]
    fn test_read_point_z_big_endian() {
        let wkb = hex("00000003E93FF000000000000040000000000000004008000000000000");
        let geometry = read_wkb(&wkb, 0).unwrap();
        assert_eq!(geometry, Geometry::Point(Point::xyz(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_srid_propagates_to_children() {
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&4u32.to_le_bytes());
        wkb.extend_from_slice(&2u32.to_le_bytes());
        wkb.extend(le_point(1.0, 2.0));
        wkb.extend(le_point(3.0, 4.0));

        let geometry = read_wkb(&wkb, 4326).unwrap();
        assert_eq!(geometry.kind(), GeometryKind::MultiPoint);
        assert_eq!(geometry.srid(), 4326);
        for member in geometry.as_collection().unwrap().geometries() {
            assert_eq!(member.srid(), 4326);
        }
    }

    #[test]
    fn test_children_declare_own_byte_order() {
        // Big-endian multipoint holding a little-endian point.
        let mut wkb = vec![0u8];
        wkb.extend_from_slice(&4u32.to_be_bytes());
        wkb.extend_from_slice(&1u32.to_be_bytes());
        wkb.extend(le_point(5.0, 6.0));

        let geometry = read_wkb(&wkb, 0).unwrap();
        let point = geometry.as_collection().unwrap().geometry(0).unwrap().as_point().unwrap();
        assert_eq!(point.ordinates(), &[5.0, 6.0]);
    }

    #[test]
    fn test_children_declare_own_dimensions() {
        // An XY collection holding an XYZ point: the child is read as XYZ and
        // the construction interface rejects the mix.
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&7u32.to_le_bytes());
        wkb.extend_from_slice(&1u32.to_le_bytes());
        let child = write_wkb_le(&Geometry::Point(Point::xyz(1.0, 2.0, 3.0)));
        wkb.extend(child);

        let result = read_wkb(&wkb, 0);
        assert!(matches!(
            result,
            Err(GeometryIoError::Geometry(GeometryError::CoordinateSystemMismatch { .. }))
        ));
    }

    #[test]
    fn test_trailing_data() {
        let mut wkb = le_point(1.0, 2.0);
        wkb.push(0);
        let result = read_wkb(&wkb, 0);
        assert_eq!(
            result,
            Err(GeometryIoError::TrailingData { format: Format::Wkb, position: 21 })
        );
    }

    #[test]
    fn test_unsupported_type_codes() {
        for code in [4000u32, u32::MAX, 999, 0] {
            let mut wkb = vec![1u8];
            wkb.extend_from_slice(&code.to_le_bytes());
            wkb.extend_from_slice(&[0u8; 16]);
            assert_eq!(read_wkb(&wkb, 0), Err(GeometryIoError::UnsupportedWkbType { code }));
        }
    }

    #[test]
    fn test_invalid_byte_order() {
        let mut wkb = le_point(1.0, 2.0);
        wkb[0] = 2;
        assert_eq!(read_wkb(&wkb, 0), Err(GeometryIoError::InvalidByteOrder { value: 2 }));
    }

    #[test]
    fn test_truncated_stream() {
        let wkb = le_point(1.0, 2.0);
        let result = read_wkb(&wkb[..15], 0);
        assert!(matches!(result, Err(GeometryIoError::UnexpectedEndOfStream { .. })));

        assert!(matches!(read_wkb(&[], 0), Err(GeometryIoError::UnexpectedEndOfStream { .. })));
    }

    #[test]
    fn test_huge_count_fails_without_allocating() {
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&2u32.to_le_bytes());
        wkb.extend_from_slice(&u32::MAX.to_le_bytes());
        let result = read_wkb(&wkb, 0);
        assert!(matches!(result, Err(GeometryIoError::UnexpectedEndOfStream { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let mut wkb = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            wkb.push(1u8);
            wkb.extend_from_slice(&7u32.to_le_bytes());
            wkb.extend_from_slice(&1u32.to_le_bytes());
        }
        let result = read_wkb(&wkb, 0);
        assert_eq!(
            result,
            Err(GeometryIoError::NestingTooDeep { format: Format::Wkb, max: MAX_NESTING_DEPTH })
        );
    }

    #[test]
    fn test_construction_errors_surface_unchanged() {
        // A line string with a single point.
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&2u32.to_le_bytes());
        wkb.extend_from_slice(&1u32.to_le_bytes());
        wkb.extend_from_slice(&1.0f64.to_le_bytes());
        wkb.extend_from_slice(&2.0f64.to_le_bytes());

        let result = read_wkb(&wkb, 0);
        assert!(matches!(
            result,
            Err(GeometryIoError::Geometry(GeometryError::InvalidGeometry {
                kind: GeometryKind::LineString,
                ..
            }))
        ));
    }

    #[test]
    fn test_empty_point_roundtrip() {
        let empty = Geometry::Point(Point::empty(CoordinateSystem::xyz(0)));
        let wkb = write_wkb(&empty).unwrap();
        assert_eq!(wkb.len(), 1 + 4 + 3 * 8);
        assert_eq!(read_wkb(&wkb, 0).unwrap(), empty);
    }

    #[test]
    fn test_polygon_rings_are_bare() {
        let cs = CoordinateSystem::xy(0);
        let ring = LineString::new(
            cs,
            vec![Point::xy(0.0, 0.0), Point::xy(1.0, 0.0), Point::xy(1.0, 1.0), Point::xy(0.0, 0.0)],
        )
        .unwrap();
        let polygon = Geometry::Polygon(crate::model::Polygon::new(cs, vec![ring]).unwrap());

        let wkb = write_wkb_le(&polygon);
        // header + ring count + point count + 4 points
        assert_eq!(wkb.len(), 1 + 4 + 4 + 4 + 4 * 16);
        assert_eq!(read_wkb(&wkb, 0).unwrap(), polygon);
    }

    #[test]
    fn test_writer_byte_order() {
        let point = Geometry::Point(Point::xym(1.0, 2.0, 3.0));
        let be = WkbWriter::new(WkbOptions::with_byte_order(ByteOrder::BigEndian))
            .write(&point)
            .unwrap();
        assert_eq!(be[0], 0);
        assert_eq!(&be[1..5], &2001u32.to_be_bytes());
        assert_eq!(read_wkb(&be, 0).unwrap(), point);
    }

    #[test]
    fn test_nested_collection_roundtrip() {
        let cs = CoordinateSystem::xyzm(0);
        let point = Geometry::Point(Point::xyzm(1.0, 2.0, 3.0, 4.0));
        let multi = Geometry::MultiPoint(
            GeometryCollection::new(GeometryKind::MultiPoint, cs, vec![point.clone()]).unwrap(),
        );
        let collection = Geometry::GeometryCollection(
            GeometryCollection::new(GeometryKind::GeometryCollection, cs, vec![point, multi]).unwrap(),
        );

        let wkb = write_wkb(&collection).unwrap();
        assert_eq!(read_wkb(&wkb, 0).unwrap(), collection);
    }

    #[test]
    fn test_empty_point_inside_line_string_rejected() {
        // LINESTRING ((NaN NaN), (1 1)): the first tuple reads as the empty point.
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&2u32.to_le_bytes());
        wkb.extend_from_slice(&2u32.to_le_bytes());
        for v in [f64::NAN, f64::NAN, 1.0, 1.0] {
            wkb.extend_from_slice(&v.to_le_bytes());
        }

        assert!(matches!(
            read_wkb(&wkb, 0),
            Err(GeometryIoError::Geometry(GeometryError::InvalidGeometry {
                kind: GeometryKind::LineString,
                ..
            }))
        ));
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let mut wkb = vec![1u8];
        wkb.extend_from_slice(&1u32.to_le_bytes());
        wkb.extend_from_slice(&f64::INFINITY.to_le_bytes());
        wkb.extend_from_slice(&f64::NAN.to_le_bytes());

        assert!(matches!(
            read_wkb(&wkb, 0),
            Err(GeometryIoError::Geometry(GeometryError::InvalidGeometry {
                kind: GeometryKind::Point,
                ..
            }))
        ));
    }

    #[test]
    fn test_roundtrip_curves_surfaces_and_multis() {
        let fixtures = [
            "CIRCULARSTRING (0 0, 1 1, 2 0, 3 -1, 4 0)",
            "COMPOUNDCURVE Z ((0 0 1, 1 1 1), CIRCULARSTRING Z (1 1 1, 2 2 1, 3 1 1))",
            "CURVEPOLYGON (CIRCULARSTRING (0 0, 2 0, 2 2, 0 2, 0 0), (1 1, 1.5 1, 1 1.5, 1 1))",
            "MULTILINESTRING M ((0 0 1, 1 1 2), EMPTY, (2 2 3, 3 3 4, 4 4 5))",
            "MULTIPOLYGON (((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2, 1 1)), ((5 5, 6 5, 6 6, 5 5)))",
            "POLYHEDRALSURFACE Z (((0 0 0, 1 0 0, 0 1 0, 0 0 0)), ((0 0 0, 0 1 0, 0 0 1, 0 0 0)))",
            "TIN ZM (((0 0 0 1, 1 0 0 2, 0 1 0 3, 0 0 0 1)), ((1 0 0 2, 1 1 0 4, 0 1 0 3, 1 0 0 2)))",
            "TRIANGLE ((0 0, 1 0, 0 1, 0 0))",
        ];

        for wkt in fixtures {
            let geometry = crate::codec::wkt::read_wkt(wkt, 3857).unwrap();
            for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
                let wkb = WkbWriter::new(WkbOptions::with_byte_order(order)).write(&geometry).unwrap();
                assert_eq!(wkb[0], order as u8, "{}", wkt);
                assert_eq!(read_wkb(&wkb, 3857).unwrap(), geometry, "{} {:?}", wkt, order);
            }
        }
    }

    #[test]
    fn test_compound_curve_members_have_headers() {
        let geometry = crate::codec::wkt::read_wkt("COMPOUNDCURVE ((0 0, 1 1), CIRCULARSTRING (1 1, 2 2, 3 1))", 0)
            .unwrap();
        let wkb = write_wkb_le(&geometry);
        // header + count, then each member: header + point count + points
        assert_eq!(wkb.len(), 9 + (9 + 2 * 16) + (9 + 3 * 16));
        assert_eq!(&wkb[9..14], &[1, 2, 0, 0, 0]);
        assert_eq!(&wkb[50..55], &[1, 8, 0, 0, 0]);
    }

    fn write_wkb_le(geometry: &Geometry) -> Vec<u8> {
        WkbWriter::new(WkbOptions::with_byte_order(ByteOrder::LittleEndian))
            .write(geometry)
            .unwrap()
    }

    fn arb_cs() -> impl Strategy<Value = CoordinateSystem> {
        (any::<bool>(), any::<bool>(), 0u32..10_000)
            .prop_map(|(z, m, srid)| CoordinateSystem::new(z, m, srid))
    }

    fn arb_point(cs: CoordinateSystem) -> impl Strategy<Value = Point> {
        prop::collection::vec(-1.0e9f64..1.0e9, cs.coordinate_dimension())
            .prop_map(move |ordinates| Point::new(cs, &ordinates).unwrap())
    }

    fn arb_line_string() -> impl Strategy<Value = Geometry> {
        arb_cs().prop_flat_map(|cs| {
            prop::collection::vec(arb_point(cs), 2..20)
                .prop_map(move |points| Geometry::LineString(LineString::new(cs, points).unwrap()))
        })
    }

    proptest! {
        #[test]
        fn prop_point_roundtrip(point in arb_cs().prop_flat_map(arb_point), big in any::<bool>()) {
            let order = if big { ByteOrder::BigEndian } else { ByteOrder::LittleEndian };
            let geometry = Geometry::Point(point);
            let wkb = WkbWriter::new(WkbOptions::with_byte_order(order)).write(&geometry).unwrap();
            prop_assert_eq!(read_wkb(&wkb, geometry.srid()).unwrap(), geometry);
        }

        #[test]
        fn prop_line_string_roundtrip(geometry in arb_line_string()) {
            let wkb = write_wkb(&geometry).unwrap();
            prop_assert_eq!(read_wkb(&wkb, geometry.srid()).unwrap(), geometry);
        }
    }
}
