//! Geometry values.
//!
//! Four structs carry all thirteen kinds: [`Point`], [`LineString`] (line and
//! circular strings), [`Polygon`] (polygons, triangles and curve polygons) and
//! [`GeometryCollection`] (compound curves and every multi-kind). The
//! [`Geometry`] enum tags which kind a struct stands for.
//!
//! Constructors enforce the structural rules of each kind: element kinds,
//! point counts and a single coordinate system throughout. They do not check
//! geometric validity such as ring closure or self-intersection.

use crate::error::GeometryError;
use crate::model::{CoordinateSystem, GeometryKind};

/// A single position, or the empty point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    cs: CoordinateSystem,
    /// X, Y, then Z and/or M as declared by `cs`; unused slots are zero.
    coords: Option<[f64; 4]>,
}

impl Point {
    /// Creates a point from ordinates in X, Y, [Z], [M] order.
    ///
    /// An empty slice creates the empty point. Ordinates must be finite.
    pub fn new(cs: CoordinateSystem, ordinates: &[f64]) -> Result<Self, GeometryError> {
        if ordinates.is_empty() {
            return Ok(Self::empty(cs));
        }
        if ordinates.len() != cs.coordinate_dimension() {
            return Err(GeometryError::InvalidGeometry {
                kind: GeometryKind::Point,
                reason: "ordinate count does not match the coordinate dimension",
            });
        }
        if !ordinates.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::InvalidGeometry {
                kind: GeometryKind::Point,
                reason: "ordinates must be finite",
            });
        }
        let mut coords = [0.0; 4];
        coords[..ordinates.len()].copy_from_slice(ordinates);
        Ok(Self { cs, coords: Some(coords) })
    }

    pub fn empty(cs: CoordinateSystem) -> Self {
        Self { cs, coords: None }
    }

    /// Ordinates are taken as given; [`Point::new`] validates them.
    pub fn xy(x: f64, y: f64) -> Self {
        Self { cs: CoordinateSystem::xy(0), coords: Some([x, y, 0.0, 0.0]) }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { cs: CoordinateSystem::xyz(0), coords: Some([x, y, z, 0.0]) }
    }

    pub fn xym(x: f64, y: f64, m: f64) -> Self {
        Self { cs: CoordinateSystem::xym(0), coords: Some([x, y, m, 0.0]) }
    }

    pub fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self { cs: CoordinateSystem::xyzm(0), coords: Some([x, y, z, m]) }
    }

    /// Returns this point tagged with another SRID.
    pub fn with_srid(self, srid: u32) -> Self {
        Self { cs: self.cs.with_srid(srid), ..self }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.cs
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_none()
    }

    /// Returns the ordinates in X, Y, [Z], [M] order; empty for the empty point.
    pub fn ordinates(&self) -> &[f64] {
        match &self.coords {
            Some(coords) => &coords[..self.cs.coordinate_dimension()],
            None => &[],
        }
    }

    pub fn x(&self) -> Option<f64> {
        self.coords.map(|c| c[0])
    }

    pub fn y(&self) -> Option<f64> {
        self.coords.map(|c| c[1])
    }

    pub fn z(&self) -> Option<f64> {
        self.coords.filter(|_| self.cs.has_z()).map(|c| c[2])
    }

    pub fn m(&self) -> Option<f64> {
        let index = if self.cs.has_z() { 3 } else { 2 };
        self.coords.filter(|_| self.cs.has_m()).map(|c| c[index])
    }

    fn rewrite(&self, rewrite: &Rewrite) -> Point {
        let coords = self.coords.map(|mut c| {
            if rewrite.swap_xy {
                c.swap(0, 1);
            }
            c
        });
        Point { cs: rewrite.cs(self.cs), coords }
    }
}

/// A sequence of points: a line string, or a circular string when tagged so.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    cs: CoordinateSystem,
    points: Vec<Point>,
}

impl LineString {
    /// Creates a line string; it must be empty or have at least two points,
    /// none of them empty.
    pub fn new(cs: CoordinateSystem, points: Vec<Point>) -> Result<Self, GeometryError> {
        check_members(GeometryKind::LineString, cs, points.iter().map(Point::coordinate_system))?;
        check_no_empty_points(GeometryKind::LineString, &points)?;
        if points.len() == 1 {
            return Err(GeometryError::InvalidGeometry {
                kind: GeometryKind::LineString,
                reason: "a line string needs at least 2 points",
            });
        }
        Ok(Self { cs, points })
    }

    /// Creates a circular string; it must be empty or have an odd number of
    /// points, at least three.
    pub fn circular(cs: CoordinateSystem, points: Vec<Point>) -> Result<Self, GeometryError> {
        check_members(GeometryKind::CircularString, cs, points.iter().map(Point::coordinate_system))?;
        check_no_empty_points(GeometryKind::CircularString, &points)?;
        let count = points.len();
        if count != 0 && (count < 3 || count % 2 == 0) {
            return Err(GeometryError::InvalidGeometry {
                kind: GeometryKind::CircularString,
                reason: "a circular string needs an odd number of points, at least 3",
            });
        }
        Ok(Self { cs, points })
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.cs
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the point at a zero-based index.
    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if the first and last points coincide.
    pub fn is_closed(&self) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start.ordinates() == end.ordinates(),
            _ => false,
        }
    }

    fn rewrite(&self, rewrite: &Rewrite) -> LineString {
        LineString {
            cs: rewrite.cs(self.cs),
            points: self.points.iter().map(|p| p.rewrite(rewrite)).collect(),
        }
    }
}

/// A surface bounded by rings; the first ring is the exterior.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    cs: CoordinateSystem,
    rings: Vec<Geometry>,
}

impl Polygon {
    pub fn new(cs: CoordinateSystem, rings: Vec<LineString>) -> Result<Self, GeometryError> {
        check_members(GeometryKind::Polygon, cs, rings.iter().map(LineString::coordinate_system))?;
        Ok(Self {
            cs,
            rings: rings.into_iter().map(Geometry::LineString).collect(),
        })
    }

    /// Creates a triangle: at most one ring, of exactly four points.
    pub fn triangle(cs: CoordinateSystem, rings: Vec<LineString>) -> Result<Self, GeometryError> {
        check_members(GeometryKind::Triangle, cs, rings.iter().map(LineString::coordinate_system))?;
        if rings.len() > 1 {
            return Err(GeometryError::InvalidGeometry {
                kind: GeometryKind::Triangle,
                reason: "a triangle has a single exterior ring",
            });
        }
        if let Some(ring) = rings.first() {
            if ring.num_points() != 4 {
                return Err(GeometryError::InvalidGeometry {
                    kind: GeometryKind::Triangle,
                    reason: "a triangle ring needs exactly 4 points",
                });
            }
        }
        Ok(Self {
            cs,
            rings: rings.into_iter().map(Geometry::LineString).collect(),
        })
    }

    /// Creates a curve polygon, whose rings may be any curve kind.
    pub fn curve_polygon(cs: CoordinateSystem, rings: Vec<Geometry>) -> Result<Self, GeometryError> {
        for ring in &rings {
            if !ring.kind().is_curve() {
                return Err(GeometryError::UnexpectedGeometryKind {
                    expected: "a curve",
                    found: ring.kind(),
                });
            }
        }
        check_members(GeometryKind::CurvePolygon, cs, rings.iter().map(Geometry::coordinate_system))?;
        Ok(Self { cs, rings })
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.cs
    }

    pub fn rings(&self) -> &[Geometry] {
        &self.rings
    }

    pub fn exterior_ring(&self) -> Option<&Geometry> {
        self.rings.first()
    }

    pub fn interior_rings(&self) -> &[Geometry] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn num_interior_rings(&self) -> usize {
        self.interior_rings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    fn rewrite(&self, rewrite: &Rewrite) -> Polygon {
        Polygon {
            cs: rewrite.cs(self.cs),
            rings: self.rings.iter().map(|r| r.rewrite(rewrite)).collect(),
        }
    }
}

/// An ordered list of geometries: compound curves and all collection kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    cs: CoordinateSystem,
    geometries: Vec<Geometry>,
}

impl GeometryCollection {
    /// Creates a collection of the given kind.
    ///
    /// Homogeneous kinds (multi-point, TIN, ...) check every element's kind;
    /// `GeometryCollection` accepts anything.
    pub fn new(
        kind: GeometryKind,
        cs: CoordinateSystem,
        geometries: Vec<Geometry>,
    ) -> Result<Self, GeometryError> {
        if let Some(element) = kind.element_kind() {
            for geometry in &geometries {
                if geometry.kind() != element {
                    return Err(GeometryError::UnexpectedGeometryKind {
                        expected: element.name(),
                        found: geometry.kind(),
                    });
                }
            }
        }
        check_members(kind, cs, geometries.iter().map(Geometry::coordinate_system))?;
        Ok(Self { cs, geometries })
    }

    /// Creates a compound curve: non-empty line or circular strings, each
    /// starting where the previous one ends.
    pub fn compound_curve(cs: CoordinateSystem, curves: Vec<Geometry>) -> Result<Self, GeometryError> {
        let kind = GeometryKind::CompoundCurve;
        let mut previous: Option<&LineString> = None;
        for curve in &curves {
            let segment = match curve {
                Geometry::LineString(s) | Geometry::CircularString(s) => s,
                other => {
                    return Err(GeometryError::UnexpectedGeometryKind {
                        expected: "a LineString or CircularString",
                        found: other.kind(),
                    });
                }
            };
            if segment.is_empty() {
                return Err(GeometryError::InvalidGeometry {
                    kind,
                    reason: "a compound curve cannot contain empty curves",
                });
            }
            if let Some(previous) = previous {
                let end = previous.end_point().map(Point::ordinates);
                let start = segment.start_point().map(Point::ordinates);
                if end != start {
                    return Err(GeometryError::InvalidGeometry {
                        kind,
                        reason: "each curve must start where the previous one ends",
                    });
                }
            }
            previous = Some(segment);
        }
        check_members(kind, cs, curves.iter().map(Geometry::coordinate_system))?;
        Ok(Self { cs, geometries: curves })
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.cs
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn num_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Returns the geometry at a zero-based index.
    pub fn geometry(&self, index: usize) -> Option<&Geometry> {
        self.geometries.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    fn rewrite(&self, rewrite: &Rewrite) -> GeometryCollection {
        GeometryCollection {
            cs: rewrite.cs(self.cs),
            geometries: self.geometries.iter().map(|g| g.rewrite(rewrite)).collect(),
        }
    }
}

/// A fully constructed geometry of one of the supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    CircularString(LineString),
    CompoundCurve(GeometryCollection),
    Polygon(Polygon),
    Triangle(Polygon),
    CurvePolygon(Polygon),
    MultiPoint(GeometryCollection),
    MultiLineString(GeometryCollection),
    MultiPolygon(GeometryCollection),
    GeometryCollection(GeometryCollection),
    PolyhedralSurface(GeometryCollection),
    Tin(GeometryCollection),
}

impl Geometry {
    /// Returns the kind of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::CircularString(_) => GeometryKind::CircularString,
            Geometry::CompoundCurve(_) => GeometryKind::CompoundCurve,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::Triangle(_) => GeometryKind::Triangle,
            Geometry::CurvePolygon(_) => GeometryKind::CurvePolygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
            Geometry::PolyhedralSurface(_) => GeometryKind::PolyhedralSurface,
            Geometry::Tin(_) => GeometryKind::Tin,
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        match self {
            Geometry::Point(p) => p.coordinate_system(),
            Geometry::LineString(s) | Geometry::CircularString(s) => s.coordinate_system(),
            Geometry::Polygon(p) | Geometry::Triangle(p) | Geometry::CurvePolygon(p) => {
                p.coordinate_system()
            }
            Geometry::CompoundCurve(c)
            | Geometry::MultiPoint(c)
            | Geometry::MultiLineString(c)
            | Geometry::MultiPolygon(c)
            | Geometry::GeometryCollection(c)
            | Geometry::PolyhedralSurface(c)
            | Geometry::Tin(c) => c.coordinate_system(),
        }
    }

    pub fn srid(&self) -> u32 {
        self.coordinate_system().srid()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of direct parts: 1 for a non-empty point, otherwise the number
    /// of points, rings or member geometries.
    pub fn count(&self) -> usize {
        match self {
            Geometry::Point(p) => usize::from(!p.is_empty()),
            Geometry::LineString(s) | Geometry::CircularString(s) => s.num_points(),
            Geometry::Polygon(p) | Geometry::Triangle(p) | Geometry::CurvePolygon(p) => {
                p.rings().len()
            }
            Geometry::CompoundCurve(c)
            | Geometry::MultiPoint(c)
            | Geometry::MultiLineString(c)
            | Geometry::MultiPolygon(c)
            | Geometry::GeometryCollection(c)
            | Geometry::PolyhedralSurface(c)
            | Geometry::Tin(c) => c.num_geometries(),
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the point sequence of a line string or circular string.
    pub fn as_line_string(&self) -> Option<&LineString> {
        match self {
            Geometry::LineString(s) | Geometry::CircularString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the rings of a polygon, triangle or curve polygon.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) | Geometry::Triangle(p) | Geometry::CurvePolygon(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the members of a compound curve or any collection kind.
    pub fn as_collection(&self) -> Option<&GeometryCollection> {
        match self {
            Geometry::CompoundCurve(c)
            | Geometry::MultiPoint(c)
            | Geometry::MultiLineString(c)
            | Geometry::MultiPolygon(c)
            | Geometry::GeometryCollection(c)
            | Geometry::PolyhedralSurface(c)
            | Geometry::Tin(c) => Some(c),
            _ => None,
        }
    }

    /// Returns a copy with every coordinate system retagged to `srid`.
    pub(crate) fn retagged(&self, srid: u32) -> Geometry {
        self.rewrite(&Rewrite { srid: Some(srid), swap_xy: false })
    }

    /// Returns a copy with X and Y exchanged in every coordinate.
    pub(crate) fn swapped_xy(&self) -> Geometry {
        self.rewrite(&Rewrite { srid: None, swap_xy: true })
    }

    fn rewrite(&self, rewrite: &Rewrite) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::Point(p.rewrite(rewrite)),
            Geometry::LineString(s) => Geometry::LineString(s.rewrite(rewrite)),
            Geometry::CircularString(s) => Geometry::CircularString(s.rewrite(rewrite)),
            Geometry::CompoundCurve(c) => Geometry::CompoundCurve(c.rewrite(rewrite)),
            Geometry::Polygon(p) => Geometry::Polygon(p.rewrite(rewrite)),
            Geometry::Triangle(p) => Geometry::Triangle(p.rewrite(rewrite)),
            Geometry::CurvePolygon(p) => Geometry::CurvePolygon(p.rewrite(rewrite)),
            Geometry::MultiPoint(c) => Geometry::MultiPoint(c.rewrite(rewrite)),
            Geometry::MultiLineString(c) => Geometry::MultiLineString(c.rewrite(rewrite)),
            Geometry::MultiPolygon(c) => Geometry::MultiPolygon(c.rewrite(rewrite)),
            Geometry::GeometryCollection(c) => Geometry::GeometryCollection(c.rewrite(rewrite)),
            Geometry::PolyhedralSurface(c) => Geometry::PolyhedralSurface(c.rewrite(rewrite)),
            Geometry::Tin(c) => Geometry::Tin(c.rewrite(rewrite)),
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

/// A structural copy with adjusted coordinate systems and/or swapped axes.
struct Rewrite {
    srid: Option<u32>,
    swap_xy: bool,
}

impl Rewrite {
    fn cs(&self, cs: CoordinateSystem) -> CoordinateSystem {
        match self.srid {
            Some(srid) => cs.with_srid(srid),
            None => cs,
        }
    }
}

fn check_no_empty_points(kind: GeometryKind, points: &[Point]) -> Result<(), GeometryError> {
    if points.iter().any(Point::is_empty) {
        return Err(GeometryError::InvalidGeometry {
            kind,
            reason: "a curve cannot contain empty points",
        });
    }
    Ok(())
}

fn check_members(
    kind: GeometryKind,
    cs: CoordinateSystem,
    members: impl Iterator<Item = CoordinateSystem>,
) -> Result<(), GeometryError> {
    for found in members {
        if found != cs {
            return Err(GeometryError::CoordinateSystemMismatch { kind, expected: cs, found });
        }
    }
    Ok(())
}
