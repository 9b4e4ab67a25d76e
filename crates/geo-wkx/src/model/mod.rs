//! Geometry value types and the construction interface.
//!
//! This module contains the types the readers produce:
//! - Geometry kinds and the kind dispatch table
//! - Coordinate systems (dimensionality + SRID)
//! - Geometry values
//! - The factory trait readers build geometries through
//! - The capability trait shared with proxies

pub mod coordinate;
pub mod factory;
pub mod geometry;
pub mod kind;
pub mod view;

pub use coordinate::CoordinateSystem;
pub use factory::{GeometryFactory, Parts, StandardFactory};
pub use geometry::{Geometry, GeometryCollection, LineString, Point, Polygon};
pub use kind::{GeometryKind, KIND_TABLE, KindEntry, Layout};
pub use view::GeometryView;
