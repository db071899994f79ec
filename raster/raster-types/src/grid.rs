//! Physical bounds, pixel grids and slice planes.

// Grid sizes are derived from rounded float extents and stay far below i64/usize limits.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{RasterError, RasterResult};

/// Physical extent of the print job in mm.
///
/// Unlike a general bounding box, the corners are taken as given: inverted or
/// flat bounds are a configuration error reported by [`SliceBounds::grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceBounds {
    /// Minimum corner (xmin, ymin, zmin).
    pub min: Point3<f64>,
    /// Maximum corner (xmax, ymax, zmax).
    pub max: Point3<f64>,
}

impl Default for SliceBounds {
    fn default() -> Self {
        Self {
            min: Point3::origin(),
            max: Point3::origin(),
        }
    }
}

impl SliceBounds {
    /// Create bounds from their corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create bounds from the six scalar limits.
    #[must_use]
    pub fn from_limits(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Self {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    /// Size along each axis (may be negative for inverted bounds).
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Derive the voxel grid for the given pixel pitch and slice thickness.
    ///
    /// Each axis gets `round(extent / step)` cells.
    ///
    /// # Errors
    ///
    /// - [`RasterError::InvalidPitch`] if a pitch is not positive and finite
    /// - [`RasterError::InvalidSliceThickness`] if the thickness is not positive and finite
    /// - [`RasterError::DegenerateBounds`] if any axis ends up with zero or fewer cells
    ///
    /// # Example
    ///
    /// ```
    /// use raster_types::{PixelPitch, SliceBounds};
    ///
    /// let bounds = SliceBounds::from_limits(0.0, 10.0, 0.0, 5.0, 0.0, 1.0);
    /// let grid = bounds.grid(PixelPitch::new(0.1, 0.1), 0.05).unwrap();
    /// assert_eq!((grid.nx, grid.ny, grid.nz), (100, 50, 20));
    ///
    /// let flat = SliceBounds::from_limits(3.0, 3.0, 0.0, 5.0, 0.0, 1.0);
    /// assert!(flat.grid(PixelPitch::new(0.1, 0.1), 0.05).is_err());
    /// ```
    pub fn grid(&self, pitch: PixelPitch, slice_thickness: f64) -> RasterResult<GridDims> {
        if !pitch.is_valid() {
            return Err(RasterError::InvalidPitch {
                x: pitch.x,
                y: pitch.y,
            });
        }
        if !(slice_thickness.is_finite() && slice_thickness > 0.0) {
            return Err(RasterError::InvalidSliceThickness(slice_thickness));
        }

        let size = self.size();
        let nx = cell_count(size.x, pitch.x);
        let ny = cell_count(size.y, pitch.y);
        let nz = cell_count(size.z, slice_thickness);

        if nx <= 0 || ny <= 0 || nz <= 0 {
            return Err(RasterError::DegenerateBounds { nx, ny, nz });
        }

        let axis =
            |n: i64| usize::try_from(n).map_err(|_| RasterError::DegenerateBounds { nx, ny, nz });
        Ok(GridDims {
            nx: axis(nx)?,
            ny: axis(ny)?,
            nz: axis(nz)?,
        })
    }
}

/// Cells along one axis; NaN extents collapse to zero.
fn cell_count(extent: f64, step: f64) -> i64 {
    (extent / step).round() as i64
}

/// In-plane pixel size in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelPitch {
    /// Pixel width along X.
    pub x: f64,
    /// Pixel height along Y.
    pub y: f64,
}

impl PixelPitch {
    /// Create a pitch from explicit sizes in mm.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a pitch from printer resolution in dots per inch.
    ///
    /// ```
    /// use raster_types::PixelPitch;
    ///
    /// let pitch = PixelPitch::from_dpi(600.0, 300.0);
    /// assert!((pitch.x - 25.4 / 600.0).abs() < 1e-15);
    /// ```
    #[must_use]
    pub fn from_dpi(dpi_x: f64, dpi_y: f64) -> Self {
        const MM_PER_INCH: f64 = 25.4;
        Self {
            x: MM_PER_INCH / dpi_x,
            y: MM_PER_INCH / dpi_y,
        }
    }

    /// Both sizes are positive and finite.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

/// Pixel and layer counts of the voxel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridDims {
    /// Pixels per row.
    pub nx: usize,
    /// Rows per slice.
    pub ny: usize,
    /// Number of layers.
    pub nz: usize,
}

impl GridDims {
    /// Pixels in one slice.
    #[must_use]
    pub const fn pixels_per_slice(&self) -> usize {
        self.nx * self.ny
    }
}

impl std::fmt::Display for GridDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} x {} x {}]", self.nx, self.ny, self.nz)
    }
}

/// The sampling plane of one layer.
///
/// `origin` is the center of pixel (0, 0); pixel `(ix, iy)` is centered at
/// `origin + ix * u + iy * v`. Row `iy = 0` lies at `ymin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePlane {
    /// Center of pixel (0, 0).
    pub origin: Point3<f64>,
    /// Step between adjacent pixels of a row.
    pub u: Vector3<f64>,
    /// Step between adjacent rows.
    pub v: Vector3<f64>,
    /// Pixels per row.
    pub nx: usize,
    /// Number of rows.
    pub ny: usize,
}

impl SlicePlane {
    /// Plane through the middle of layer `layer`.
    ///
    /// ```
    /// use raster_types::{PixelPitch, SliceBounds, SlicePlane};
    ///
    /// let bounds = SliceBounds::from_limits(0.0, 1.0, 0.0, 1.0, 2.0, 3.0);
    /// let pitch = PixelPitch::new(0.5, 0.25);
    /// let grid = bounds.grid(pitch, 0.1).unwrap();
    /// let plane = SlicePlane::for_layer(&bounds, pitch, 0.1, grid, 3);
    /// assert!((plane.origin.x - 0.25).abs() < 1e-12);
    /// assert!((plane.origin.y - 0.125).abs() < 1e-12);
    /// assert!((plane.origin.z - 2.35).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn for_layer(
        bounds: &SliceBounds,
        pitch: PixelPitch,
        slice_thickness: f64,
        grid: GridDims,
        layer: usize,
    ) -> Self {
        let z = slice_thickness.mul_add(layer as f64 + 0.5, bounds.min.z);
        Self {
            origin: Point3::new(
                pitch.x.mul_add(0.5, bounds.min.x),
                pitch.y.mul_add(0.5, bounds.min.y),
                z,
            ),
            u: Vector3::new(pitch.x, 0.0, 0.0),
            v: Vector3::new(0.0, pitch.y, 0.0),
            nx: grid.nx,
            ny: grid.ny,
        }
    }

    /// World position of the center of pixel `(ix, iy)`.
    #[must_use]
    pub fn pixel_center(&self, ix: usize, iy: usize) -> Point3<f64> {
        self.origin + self.u * ix as f64 + self.v * iy as f64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_rounding() {
        let bounds = SliceBounds::from_limits(0.0, 1.04, 0.0, 1.06, 0.0, 0.5);
        let grid = bounds.grid(PixelPitch::new(0.1, 0.1), 0.1).unwrap();
        assert_eq!(grid, GridDims { nx: 10, ny: 11, nz: 5 });
        assert_eq!(grid.pixels_per_slice(), 110);
        assert_eq!(grid.to_string(), "[10 x 11 x 5]");
    }

    #[test]
    fn test_degenerate_bounds() {
        let pitch = PixelPitch::new(0.1, 0.1);

        let flat_x = SliceBounds::from_limits(1.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert!(matches!(
            flat_x.grid(pitch, 0.1),
            Err(RasterError::DegenerateBounds { nx: 0, .. })
        ));

        let inverted_z = SliceBounds::from_limits(0.0, 1.0, 0.0, 1.0, 1.0, 0.0);
        assert!(matches!(
            inverted_z.grid(pitch, 0.1),
            Err(RasterError::DegenerateBounds { nz: -10, .. })
        ));

        // Thinner than half a pixel rounds to nothing.
        let sliver = SliceBounds::from_limits(0.0, 0.04, 0.0, 1.0, 0.0, 1.0);
        assert!(sliver.grid(pitch, 0.1).is_err());

        let nan = SliceBounds::from_limits(f64::NAN, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert!(nan.grid(pitch, 0.1).is_err());
    }

    #[test]
    fn test_invalid_steps() {
        let bounds = SliceBounds::from_limits(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert!(matches!(
            bounds.grid(PixelPitch::new(0.0, 0.1), 0.1),
            Err(RasterError::InvalidPitch { .. })
        ));
        assert!(matches!(
            bounds.grid(PixelPitch::new(0.1, 0.1), -0.1),
            Err(RasterError::InvalidSliceThickness(_))
        ));
    }

    #[test]
    fn test_plane_pixel_centers() {
        let bounds = SliceBounds::from_limits(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0);
        let pitch = PixelPitch::new(0.5, 0.5);
        let grid = bounds.grid(pitch, 0.25).unwrap();
        let plane = SlicePlane::for_layer(&bounds, pitch, 0.25, grid, 0);

        assert_eq!((plane.nx, plane.ny), (4, 4));
        let p = plane.pixel_center(3, 0);
        assert_relative_eq!(p.x, 0.75);
        assert_relative_eq!(p.y, -0.75);
        assert_relative_eq!(p.z, 0.125);

        let top = SlicePlane::for_layer(&bounds, pitch, 0.25, grid, grid.nz - 1);
        assert_relative_eq!(top.origin.z, 0.875);
    }
}
