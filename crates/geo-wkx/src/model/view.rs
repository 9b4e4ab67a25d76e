//! The capability interface shared by geometries and geometry proxies.

use std::borrow::Cow;

use crate::codec::wkb::WkbWriter;
use crate::codec::wkt::WktWriter;
use crate::error::GeometryIoError;
use crate::model::{CoordinateSystem, Geometry, GeometryKind};

/// Read access to a geometry, whether already built or still serialized.
///
/// Accessors return `Result` because a [`GeometryProxy`](crate::GeometryProxy)
/// may have to parse its payload first; on a [`Geometry`] they never fail
/// except where serialization itself can.
pub trait GeometryView {
    /// The kind of geometry.
    fn kind(&self) -> GeometryKind;

    /// The spatial reference id.
    fn srid(&self) -> u32;

    fn coordinate_system(&self) -> Result<CoordinateSystem, GeometryIoError>;

    fn is_empty(&self) -> Result<bool, GeometryIoError>;

    /// Number of direct parts (points, rings or member geometries).
    fn count(&self) -> Result<usize, GeometryIoError>;

    /// The WKT form.
    fn as_text(&self) -> Result<Cow<'_, str>, GeometryIoError>;

    /// The WKB form, in machine byte order.
    fn as_binary(&self) -> Result<Cow<'_, [u8]>, GeometryIoError>;

    /// Returns a copy of the geometry tagged with another SRID.
    fn with_srid(&self, srid: u32) -> Result<Geometry, GeometryIoError>;

    /// Returns a copy of the geometry with X and Y exchanged.
    fn swap_xy(&self) -> Result<Geometry, GeometryIoError>;

    fn coordinate_dimension(&self) -> Result<usize, GeometryIoError> {
        Ok(self.coordinate_system()?.coordinate_dimension())
    }

    fn spatial_dimension(&self) -> Result<usize, GeometryIoError> {
        Ok(self.coordinate_system()?.spatial_dimension())
    }

    fn is_3d(&self) -> Result<bool, GeometryIoError> {
        Ok(self.coordinate_system()?.has_z())
    }

    fn is_measured(&self) -> Result<bool, GeometryIoError> {
        Ok(self.coordinate_system()?.has_m())
    }
}

impl GeometryView for Geometry {
    fn kind(&self) -> GeometryKind {
        Geometry::kind(self)
    }

    fn srid(&self) -> u32 {
        Geometry::srid(self)
    }

    fn coordinate_system(&self) -> Result<CoordinateSystem, GeometryIoError> {
        Ok(Geometry::coordinate_system(self))
    }

    fn is_empty(&self) -> Result<bool, GeometryIoError> {
        Ok(Geometry::is_empty(self))
    }

    fn count(&self) -> Result<usize, GeometryIoError> {
        Ok(Geometry::count(self))
    }

    fn as_text(&self) -> Result<Cow<'_, str>, GeometryIoError> {
        Ok(Cow::Owned(WktWriter::default().write(self)))
    }

    fn as_binary(&self) -> Result<Cow<'_, [u8]>, GeometryIoError> {
        Ok(Cow::Owned(WkbWriter::default().write(self)?))
    }

    fn with_srid(&self, srid: u32) -> Result<Geometry, GeometryIoError> {
        Ok(self.retagged(srid))
    }

    fn swap_xy(&self) -> Result<Geometry, GeometryIoError> {
        Ok(self.swapped_xy())
    }
}
