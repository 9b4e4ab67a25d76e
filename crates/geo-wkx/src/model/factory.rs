//! The construction interface used by the WKB and WKT readers.
//!
//! Readers never build geometry structs directly. They decode coordinates or
//! child geometries into [`Parts`] and hand them, with the kind and coordinate
//! system, to a [`GeometryFactory`]. Errors from the factory reach the caller
//! of the reader unchanged.

use crate::error::GeometryError;
use crate::model::{CoordinateSystem, Geometry, GeometryCollection, GeometryKind, LineString, Point, Polygon};

/// Decoded content of one geometry, before construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Parts {
    /// Ordinates of a point in X, Y, [Z], [M] order; empty for the empty point.
    Coordinates(Vec<f64>),
    /// Points, rings or member geometries, in stream order.
    Children(Vec<Geometry>),
}

/// Builds concrete geometries from decoded parts.
pub trait GeometryFactory {
    fn build(
        &self,
        kind: GeometryKind,
        cs: CoordinateSystem,
        parts: Parts,
    ) -> Result<Geometry, GeometryError>;
}

impl<F: GeometryFactory + ?Sized> GeometryFactory for &F {
    fn build(
        &self,
        kind: GeometryKind,
        cs: CoordinateSystem,
        parts: Parts,
    ) -> Result<Geometry, GeometryError> {
        (**self).build(kind, cs, parts)
    }
}

/// The factory used by [`read_wkb`](crate::read_wkb) and [`read_wkt`](crate::read_wkt).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFactory;

impl GeometryFactory for StandardFactory {
    fn build(
        &self,
        kind: GeometryKind,
        cs: CoordinateSystem,
        parts: Parts,
    ) -> Result<Geometry, GeometryError> {
        let children = match (kind, parts) {
            (GeometryKind::Point, Parts::Coordinates(ordinates)) => {
                return Ok(Geometry::Point(Point::new(cs, &ordinates)?));
            }
            (_, Parts::Coordinates(_)) => {
                return Err(GeometryError::InvalidGeometry {
                    kind,
                    reason: "only a point is built from coordinates",
                });
            }
            (_, Parts::Children(children)) => children,
        };

        let geometry = match kind {
            GeometryKind::Point => {
                return Err(GeometryError::InvalidGeometry {
                    kind,
                    reason: "a point is built from coordinates",
                });
            }
            GeometryKind::LineString => Geometry::LineString(LineString::new(cs, into_points(children)?)?),
            GeometryKind::CircularString => {
                Geometry::CircularString(LineString::circular(cs, into_points(children)?)?)
            }
            GeometryKind::Polygon => Geometry::Polygon(Polygon::new(cs, into_rings(children)?)?),
            GeometryKind::Triangle => Geometry::Triangle(Polygon::triangle(cs, into_rings(children)?)?),
            GeometryKind::CurvePolygon => Geometry::CurvePolygon(Polygon::curve_polygon(cs, children)?),
            GeometryKind::CompoundCurve => {
                Geometry::CompoundCurve(GeometryCollection::compound_curve(cs, children)?)
            }
            GeometryKind::MultiPoint => Geometry::MultiPoint(GeometryCollection::new(kind, cs, children)?),
            GeometryKind::MultiLineString => {
                Geometry::MultiLineString(GeometryCollection::new(kind, cs, children)?)
            }
            GeometryKind::MultiPolygon => Geometry::MultiPolygon(GeometryCollection::new(kind, cs, children)?),
            GeometryKind::GeometryCollection => {
                Geometry::GeometryCollection(GeometryCollection::new(kind, cs, children)?)
            }
            GeometryKind::PolyhedralSurface => {
                Geometry::PolyhedralSurface(GeometryCollection::new(kind, cs, children)?)
            }
            GeometryKind::Tin => Geometry::Tin(GeometryCollection::new(kind, cs, children)?),
        };
        Ok(geometry)
    }
}

fn into_points(children: Vec<Geometry>) -> Result<Vec<Point>, GeometryError> {
    children
        .into_iter()
        .map(|child| match child {
            Geometry::Point(p) => Ok(p),
            other => Err(GeometryError::UnexpectedGeometryKind {
                expected: "a Point",
                found: other.kind(),
            }),
        })
        .collect()
}

fn into_rings(children: Vec<Geometry>) -> Result<Vec<LineString>, GeometryError> {
    children
        .into_iter()
        .map(|child| match child {
            Geometry::LineString(ring) => Ok(ring),
            other => Err(GeometryError::UnexpectedGeometryKind {
                expected: "a LineString ring",
                found: other.kind(),
            }),
        })
        .collect()
}
