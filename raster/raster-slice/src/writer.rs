//! Layer-by-layer slice writing.
//!
//! A run goes through three stages, each a type:
//!
//! 1. [`SliceWriter`]: parameters validated, palette resolved
//! 2. [`SlicePlan`]: grid and layer range derived from the bounds
//! 3. [`WriteSummary`]: layers sampled, dithered and handed to a sink

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use raster_dither::{DitherKernel, SliceStats, rasterize_slice};
use raster_types::{
    GridDims, MappingMode, OUTSIDE_ARGB, Palette, PixelPitch, Raster, RasterError, SliceBounds,
    SliceBuffer, SlicePlane,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{WriteError, WriteResult};
use crate::export::{LayerSink, PngDirectory};
use crate::params::WriterParams;
use crate::result::WriteSummary;
use crate::sampler::SliceSampler;

/// A validated slice-writing job.
///
/// # Example
///
/// ```
/// use raster_slice::{PixelPitch, SliceBounds, SliceWriter, WriterParams};
///
/// let params = WriterParams::default()
///     .with_bounds(SliceBounds::from_limits(0.0, 1.0, 0.0, 1.0, 0.0, 0.5))
///     .with_pitch(PixelPitch::new(0.1, 0.1))
///     .with_slice_thickness(0.1)
///     .with_materials(&["VeroPureWht", "VeroBlack"]);
///
/// let writer = SliceWriter::new(params).unwrap();
/// let plan = writer.plan().unwrap();
/// assert_eq!(plan.grid().nz, 5);
/// assert_eq!(plan.layers(), 0..5);
/// ```
#[derive(Debug, Clone)]
pub struct SliceWriter {
    params: WriterParams,
    palette: Palette,
}

impl SliceWriter {
    /// Validate `params` and resolve the material palette.
    ///
    /// Unknown material names are not an error: they are logged and printed
    /// with the error color.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Config`] if the slice thickness or pixel pitch is not
    ///   positive and finite, or the material list is empty
    pub fn new(params: WriterParams) -> WriteResult<Self> {
        let thickness = params.slice_thickness;
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(RasterError::InvalidSliceThickness(thickness).into());
        }
        if !params.pitch.is_valid() {
            return Err(RasterError::InvalidPitch {
                x: params.pitch.x,
                y: params.pitch.y,
            }
            .into());
        }
        let palette = Palette::from_names(&params.materials)?;

        Ok(Self { params, palette })
    }

    /// The parameters of this job.
    #[must_use]
    pub const fn params(&self) -> &WriterParams {
        &self.params
    }

    /// The resolved palette.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// PNG sink for the configured output folder and prefix.
    #[must_use]
    pub fn png_sink(&self) -> PngDirectory {
        PngDirectory::new(self.params.out_folder.clone(), self.params.out_prefix.clone())
    }

    /// Derive the voxel grid and the range of layers to write.
    ///
    /// A layer count reaching past the top of the grid is truncated.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Config`] with [`RasterError::DegenerateBounds`] if the
    ///   bounds give an empty grid
    /// - [`WriteError::Config`] with [`RasterError::BufferTooLarge`] if one
    ///   slice of the grid cannot be addressed
    /// - [`WriteError::LayerOutOfRange`] if the first layer is not in the grid
    pub fn plan(&self) -> WriteResult<SlicePlan<'_>> {
        let params = &self.params;
        let grid = params.bounds.grid(params.pitch, params.slice_thickness)?;
        SliceBuffer::checked_len(grid.nx, grid.ny, self.palette.material_count())?;

        let first = params.first_layer.unwrap_or(0);
        if first >= grid.nz {
            return Err(WriteError::LayerOutOfRange { first, nz: grid.nz });
        }
        let available = grid.nz - first;
        let count = match params.layer_count {
            Some(count) if count > available => {
                warn!(
                    first,
                    requested = count,
                    available,
                    "Layer count reaches past the grid, truncating"
                );
                available
            }
            Some(count) => count,
            None => available,
        };

        Ok(SlicePlan {
            config: RunConfig {
                palette: &self.palette,
                kernel: params.dithering,
                mapping: params.mapping,
                bounds: params.bounds,
                pitch: params.pitch,
                slice_thickness: params.slice_thickness,
                grid,
            },
            layers: first..first + count,
            parallel: params.parallel,
        })
    }
}

/// Immutable settings shared by every layer of a run.
#[derive(Debug, Clone, Copy)]
struct RunConfig<'a> {
    palette: &'a Palette,
    kernel: DitherKernel,
    mapping: MappingMode,
    bounds: SliceBounds,
    pitch: PixelPitch,
    slice_thickness: f64,
    grid: GridDims,
}

impl RunConfig<'_> {
    fn channels(&self) -> usize {
        self.palette.material_count()
    }

    fn plane(&self, layer: usize) -> SlicePlane {
        SlicePlane::for_layer(
            &self.bounds,
            self.pitch,
            self.slice_thickness,
            self.grid,
            layer,
        )
    }
}

/// Scratch buffers owned by one worker.
struct LayerContext {
    buffer: SliceBuffer,
    raster: Raster,
}

impl LayerContext {
    fn new(config: &RunConfig<'_>) -> Self {
        let GridDims { nx, ny, .. } = config.grid;
        Self {
            buffer: SliceBuffer::new(nx, ny, config.channels()),
            raster: Raster::new(nx, ny, OUTSIDE_ARGB),
        }
    }
}

/// Layers written by part of a run.
#[derive(Debug, Default)]
struct Tally {
    layers: usize,
    stats: SliceStats,
}

impl Tally {
    fn merge(mut self, other: Self) -> Self {
        self.layers += other.layers;
        self.stats.accumulate(&other.stats);
        self
    }
}

/// A job with its grid and layer range resolved.
#[derive(Debug, Clone)]
pub struct SlicePlan<'a> {
    config: RunConfig<'a>,
    layers: Range<usize>,
    parallel: bool,
}

impl SlicePlan<'_> {
    /// The voxel grid.
    #[must_use]
    pub const fn grid(&self) -> GridDims {
        self.config.grid
    }

    /// Layers this plan writes.
    #[must_use]
    pub fn layers(&self) -> Range<usize> {
        self.layers.clone()
    }

    /// The sampling plane of `layer`.
    #[must_use]
    pub fn plane(&self, layer: usize) -> SlicePlane {
        self.config.plane(layer)
    }

    /// Sample, dither and emit a single layer.
    ///
    /// The sink is prepared first, as for a full run.
    ///
    /// # Errors
    ///
    /// - [`WriteError::Sampling`] if the sampler fails
    /// - [`WriteError::Rasterize`] if the palette and buffer disagree
    /// - Any error returned by the sink
    pub fn write_layer<S, K>(&self, layer: usize, sampler: &S, sink: &K) -> WriteResult<SliceStats>
    where
        S: SliceSampler + ?Sized,
        K: LayerSink + ?Sized,
    {
        sink.prepare()?;
        let mut ctx = LayerContext::new(&self.config);
        self.run_layer(&mut ctx, layer, sampler, sink)
    }

    /// Write every layer of the plan.
    ///
    /// # Errors
    ///
    /// The first failing layer aborts the run; see [`SlicePlan::write_layer`].
    pub fn write<S, K>(&self, sampler: &S, sink: &K) -> WriteResult<WriteSummary>
    where
        S: SliceSampler + ?Sized,
        K: LayerSink + ?Sized,
    {
        self.write_cancellable(sampler, sink, &AtomicBool::new(false))
    }

    /// Write every layer of the plan, stopping once `cancel` is set.
    ///
    /// The flag is checked before each layer starts, so a layer already in
    /// progress is still completed and emitted. Layers not started are
    /// skipped and the summary is marked cancelled.
    ///
    /// # Errors
    ///
    /// The first failing layer aborts the run; see [`SlicePlan::write_layer`].
    pub fn write_cancellable<S, K>(
        &self,
        sampler: &S,
        sink: &K,
        cancel: &AtomicBool,
    ) -> WriteResult<WriteSummary>
    where
        S: SliceSampler + ?Sized,
        K: LayerSink + ?Sized,
    {
        let start = Instant::now();
        info!(
            grid = %self.config.grid,
            first_layer = self.layers.start,
            layers = self.layers.len(),
            materials = self.config.channels(),
            kernel = %self.config.kernel,
            mapping = %self.config.mapping,
            parallel = self.parallel,
            "Starting slice writing"
        );

        sink.prepare()?;

        let layer_step = |ctx: &mut LayerContext, layer: usize| -> WriteResult<Tally> {
            if cancel.load(Ordering::Relaxed) {
                return Ok(Tally::default());
            }
            let stats = self.run_layer(ctx, layer, sampler, sink)?;
            Ok(Tally { layers: 1, stats })
        };

        let tally = if self.parallel {
            self.layers
                .clone()
                .into_par_iter()
                .map_init(|| LayerContext::new(&self.config), layer_step)
                .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?
        } else {
            let mut ctx = LayerContext::new(&self.config);
            let mut total = Tally::default();
            for layer in self.layers.clone() {
                total = total.merge(layer_step(&mut ctx, layer)?);
            }
            total
        };

        let cancelled = tally.layers < self.layers.len();
        let summary = WriteSummary {
            grid: self.config.grid,
            layers: self.layers.clone(),
            layers_written: tally.layers,
            cancelled,
            stats: tally.stats,
            elapsed: start.elapsed(),
        };

        if cancelled {
            warn!(
                written = summary.layers_written,
                skipped = summary.layers_skipped(),
                "Slice writing cancelled"
            );
        } else {
            info!(
                layers = summary.layers_written,
                inside_pixels = summary.stats.inside(),
                elapsed_ms = summary.elapsed.as_millis(),
                "Slice writing complete"
            );
        }

        Ok(summary)
    }

    fn run_layer<S, K>(
        &self,
        ctx: &mut LayerContext,
        layer: usize,
        sampler: &S,
        sink: &K,
    ) -> WriteResult<SliceStats>
    where
        S: SliceSampler + ?Sized,
        K: LayerSink + ?Sized,
    {
        let config = &self.config;
        let plane = config.plane(layer);

        ctx.buffer.as_mut_slice().fill(0.0);
        sampler
            .sample_slice(&plane, config.channels(), ctx.buffer.as_mut_slice())
            .map_err(|source| WriteError::Sampling { layer, source })?;

        let stats = rasterize_slice(
            &mut ctx.buffer,
            config.palette,
            config.kernel,
            config.mapping,
            &mut ctx.raster,
        )
        .map_err(|source| WriteError::Rasterize { layer, source })?;

        sink.write_layer(layer, &ctx.raster)?;

        debug!(
            layer,
            z = plane.origin.z,
            outside = stats.outside,
            inside = stats.inside(),
            "Layer written"
        );
        Ok(stats)
    }
}

/// Slice with `params` and write PNG files to the configured output folder.
///
/// Shorthand for building a [`SliceWriter`], planning it and writing to its
/// [`PngDirectory`].
///
/// # Errors
///
/// Any configuration, sampling or output error; see [`SliceWriter::new`],
/// [`SliceWriter::plan`] and [`SlicePlan::write`].
pub fn write_slices<S>(params: WriterParams, sampler: &S) -> WriteResult<WriteSummary>
where
    S: SliceSampler + ?Sized,
{
    let writer = SliceWriter::new(params)?;
    let plan = writer.plan()?;
    plan.write(sampler, &writer.png_sink())
}
