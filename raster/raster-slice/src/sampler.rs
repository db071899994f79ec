//! Sampling interface between the writer and the model.

use nalgebra::Point3;
use raster_types::SlicePlane;

use crate::error::BoxError;

/// Fills a slice buffer with channel values for one layer.
///
/// `out` holds `plane.nx * plane.ny * channels` values laid out row by row
/// (`iy` outer, `ix` inner), `channels` values per pixel. Channel 0 is the
/// signed distance to the model surface (negative inside); channels `1..` are
/// the per-material densities of palette materials `1..`.
///
/// Samplers are shared between worker threads when layers run in parallel.
pub trait SliceSampler: Sync {
    /// Sample every pixel center of `plane` into `out`.
    ///
    /// # Errors
    ///
    /// Any error aborts the run and is reported with the layer index.
    fn sample_slice(
        &self,
        plane: &SlicePlane,
        channels: usize,
        out: &mut [f64],
    ) -> Result<(), BoxError>;
}

/// A model evaluated one point at a time.
pub trait ChannelModel: Sync {
    /// Write the channel values at `point` into `out`.
    fn sample(&self, point: &Point3<f64>, out: &mut [f64]);
}

impl<F> ChannelModel for F
where
    F: Fn(&Point3<f64>, &mut [f64]) + Sync,
{
    fn sample(&self, point: &Point3<f64>, out: &mut [f64]) {
        self(point, out);
    }
}

/// Adapts a [`ChannelModel`] into a [`SliceSampler`] by evaluating it at
/// every pixel center.
///
/// # Example
///
/// ```
/// use raster_slice::{PointSampler, SliceSampler};
/// use raster_types::{Point3, PixelPitch, SliceBounds, SlicePlane};
///
/// let sampler = PointSampler::new(|p: &Point3<f64>, out: &mut [f64]| {
///     out[0] = p.coords.norm() - 1.0;
///     out[1] = 0.5;
/// });
///
/// let bounds = SliceBounds::from_limits(-1.0, 1.0, -1.0, 1.0, 0.0, 0.1);
/// let pitch = PixelPitch::new(0.5, 0.5);
/// let grid = bounds.grid(pitch, 0.1).unwrap();
/// let plane = SlicePlane::for_layer(&bounds, pitch, 0.1, grid, 0);
///
/// let mut out = vec![0.0; grid.pixels_per_slice() * 2];
/// sampler.sample_slice(&plane, 2, &mut out).unwrap();
/// assert!(out[1] > 0.0 && out[1] < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct PointSampler<M> {
    model: M,
}

impl<M: ChannelModel> PointSampler<M> {
    /// Wrap a point model.
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self { model }
    }
}

impl<M: ChannelModel> SliceSampler for PointSampler<M> {
    fn sample_slice(
        &self,
        plane: &SlicePlane,
        channels: usize,
        out: &mut [f64],
    ) -> Result<(), BoxError> {
        let expected = plane.nx * plane.ny * channels;
        if out.len() != expected {
            return Err(format!(
                "slice buffer holds {} values, plane needs {expected}",
                out.len()
            )
            .into());
        }
        if channels == 0 {
            return Ok(());
        }

        for (index, voxel) in out.chunks_exact_mut(channels).enumerate() {
            let (ix, iy) = (index % plane.nx, index / plane.nx);
            self.model.sample(&plane.pixel_center(ix, iy), voxel);
        }
        Ok(())
    }
}
