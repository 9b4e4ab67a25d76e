//! Coordinate systems: dimensionality plus spatial reference id.

use std::fmt;

/// Dimensionality and SRID shared by a geometry and all of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoordinateSystem {
    has_z: bool,
    has_m: bool,
    srid: u32,
}

impl CoordinateSystem {
    pub fn new(has_z: bool, has_m: bool, srid: u32) -> Self {
        Self { has_z, has_m, srid }
    }

    pub fn xy(srid: u32) -> Self {
        Self::new(false, false, srid)
    }

    pub fn xyz(srid: u32) -> Self {
        Self::new(true, false, srid)
    }

    pub fn xym(srid: u32) -> Self {
        Self::new(false, true, srid)
    }

    pub fn xyzm(srid: u32) -> Self {
        Self::new(true, true, srid)
    }

    pub fn has_z(&self) -> bool {
        self.has_z
    }

    pub fn has_m(&self) -> bool {
        self.has_m
    }

    pub fn srid(&self) -> u32 {
        self.srid
    }

    /// Number of ordinates per coordinate tuple: 2, 3 or 4.
    pub fn coordinate_dimension(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }

    /// Number of spatial ordinates: 2 or 3. The measure is not spatial.
    pub fn spatial_dimension(&self) -> usize {
        2 + self.has_z as usize
    }

    /// Returns a copy carrying a different SRID.
    pub fn with_srid(self, srid: u32) -> Self {
        Self { srid, ..self }
    }

    /// The WKT dimension suffix (`Z`, `M`, `ZM`), or `None` for plain XY.
    pub fn dimension_suffix(&self) -> Option<&'static str> {
        match (self.has_z, self.has_m) {
            (false, false) => None,
            (true, false) => Some("Z"),
            (false, true) => Some("M"),
            (true, true) => Some("ZM"),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XY")?;
        if self.has_z {
            f.write_str("Z")?;
        }
        if self.has_m {
            f.write_str("M")?;
        }
        write!(f, " (SRID {})", self.srid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(CoordinateSystem::xy(0).coordinate_dimension(), 2);
        assert_eq!(CoordinateSystem::xyz(0).coordinate_dimension(), 3);
        assert_eq!(CoordinateSystem::xym(0).coordinate_dimension(), 3);
        assert_eq!(CoordinateSystem::xyzm(0).coordinate_dimension(), 4);

        assert_eq!(CoordinateSystem::xym(0).spatial_dimension(), 2);
        assert_eq!(CoordinateSystem::xyzm(0).spatial_dimension(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(CoordinateSystem::xyzm(4326).to_string(), "XYZM (SRID 4326)");
        assert_eq!(CoordinateSystem::xy(0).to_string(), "XY (SRID 0)");
    }
}
