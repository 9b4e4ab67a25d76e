//! Lazily materialized geometries.
//!
//! A [`GeometryProxy`] holds the raw WKB or WKT of one geometry together with
//! its declared kind and SRID. The geometry is parsed on the first access that
//! needs its structure and kept from then on. Accesses answerable from the
//! stored data (kind, SRID, the payload in its own format) never parse.

use std::borrow::Cow;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::codec::wkb::read_wkb_with;
use crate::codec::wkt::read_wkt_with;
use crate::error::{Format, GeometryError, GeometryIoError};
use crate::model::{CoordinateSystem, Geometry, GeometryFactory, GeometryKind, GeometryView, StandardFactory};

/// Serialized geometry as handed to a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    Binary(Vec<u8>),
    Text(String),
}

impl RawPayload {
    pub fn format(&self) -> Format {
        match self {
            RawPayload::Binary(_) => Format::Wkb,
            RawPayload::Text(_) => Format::Wkt,
        }
    }
}

/// A geometry of a declared kind, parsed at most once on demand.
///
/// Loading is thread-safe. Once a load succeeds, every caller observes that
/// same geometry and the reader never runs again. A failed load is not
/// remembered: the failing caller gets the error, and each caller that was
/// blocked on it then runs the reader itself, so a bad payload may be parsed
/// once per waiting thread.
#[derive(Debug, Clone)]
pub struct GeometryProxy<F = StandardFactory> {
    kind: GeometryKind,
    payload: RawPayload,
    srid: u32,
    factory: F,
    geometry: OnceCell<Geometry>,
}

impl GeometryProxy {
    /// Creates a proxy over WKT.
    pub fn from_text(kind: GeometryKind, wkt: impl Into<String>, srid: u32) -> Self {
        Self::with_factory(kind, RawPayload::Text(wkt.into()), srid, StandardFactory)
    }

    /// Creates a proxy over WKB.
    pub fn from_binary(kind: GeometryKind, wkb: impl Into<Vec<u8>>, srid: u32) -> Self {
        Self::with_factory(kind, RawPayload::Binary(wkb.into()), srid, StandardFactory)
    }
}

impl<F: GeometryFactory> GeometryProxy<F> {
    /// Creates a proxy that builds its geometry through `factory`.
    pub fn with_factory(kind: GeometryKind, payload: RawPayload, srid: u32, factory: F) -> Self {
        Self {
            kind,
            payload,
            srid,
            factory,
            geometry: OnceCell::new(),
        }
    }

    pub fn payload(&self) -> &RawPayload {
        &self.payload
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns true once the geometry has been parsed. Never triggers loading.
    pub fn is_loaded(&self) -> bool {
        self.geometry.get().is_some()
    }

    /// Returns the geometry, parsing the payload on first call.
    pub fn geometry(&self) -> Result<&Geometry, GeometryIoError> {
        self.geometry.get_or_try_init(|| self.load())
    }

    /// Consumes the proxy and returns the geometry.
    pub fn into_geometry(mut self) -> Result<Geometry, GeometryIoError> {
        match self.geometry.take() {
            Some(geometry) => Ok(geometry),
            None => self.load(),
        }
    }

    fn load(&self) -> Result<Geometry, GeometryIoError> {
        debug!(
            kind = %self.kind,
            format = %self.payload.format(),
            srid = self.srid,
            "loading geometry proxy"
        );

        let geometry = match &self.payload {
            RawPayload::Binary(wkb) => read_wkb_with(wkb, self.srid, &self.factory)?,
            RawPayload::Text(wkt) => read_wkt_with(wkt, self.srid, &self.factory)?,
        };

        if geometry.kind() != self.kind {
            return Err(GeometryError::UnexpectedGeometryKind {
                expected: self.kind.name(),
                found: geometry.kind(),
            }
            .into());
        }
        Ok(geometry)
    }
}

impl<F: GeometryFactory> GeometryView for GeometryProxy<F> {
    fn kind(&self) -> GeometryKind {
        self.kind
    }

    fn srid(&self) -> u32 {
        self.srid
    }

    fn coordinate_system(&self) -> Result<CoordinateSystem, GeometryIoError> {
        Ok(self.geometry()?.coordinate_system())
    }

    fn is_empty(&self) -> Result<bool, GeometryIoError> {
        Ok(self.geometry()?.is_empty())
    }

    fn count(&self) -> Result<usize, GeometryIoError> {
        Ok(self.geometry()?.count())
    }

    fn as_text(&self) -> Result<Cow<'_, str>, GeometryIoError> {
        match &self.payload {
            RawPayload::Text(wkt) => Ok(Cow::Borrowed(wkt)),
            RawPayload::Binary(_) => self.geometry()?.as_text(),
        }
    }

    fn as_binary(&self) -> Result<Cow<'_, [u8]>, GeometryIoError> {
        match &self.payload {
            RawPayload::Binary(wkb) => Ok(Cow::Borrowed(wkb)),
            RawPayload::Text(_) => self.geometry()?.as_binary(),
        }
    }

    fn with_srid(&self, srid: u32) -> Result<Geometry, GeometryIoError> {
        self.geometry()?.with_srid(srid)
    }

    fn swap_xy(&self) -> Result<Geometry, GeometryIoError> {
        self.geometry()?.swap_xy()
    }
}
