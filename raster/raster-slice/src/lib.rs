//! Multi-material slice writing for voxel inkjet printing.
//!
//! This crate samples an implicit multi-material model on a regular grid,
//! one horizontal layer at a time, dithers each layer down to one material per
//! pixel and writes the result as a PNG image per layer.
//!
//! # Features
//!
//! - **Staged runs**: [`SliceWriter`] validates, [`SlicePlan`] fixes the grid
//!   and layer range, [`SlicePlan::write`] produces a [`WriteSummary`]
//! - **Pluggable input**: any [`SliceSampler`], or a point-wise
//!   [`ChannelModel`] wrapped in a [`PointSampler`]
//! - **Pluggable output**: any [`LayerSink`]; [`PngDirectory`] writes
//!   `{out_folder}/{out_prefix}_{layer}.png`
//! - **Parallel layers**: layers are independent and run on the rayon pool
//! - **Cancellation**: checked before each layer starts
//!
//! # Example
//!
//! ```
//! use raster_slice::{
//!     DitherKernel, PixelPitch, Point3, PointSampler, SliceBounds, WriterParams, write_slices,
//! };
//!
//! // A sphere of radius 1 filled with 30% black.
//! let sampler = PointSampler::new(|p: &Point3<f64>, out: &mut [f64]| {
//!     out[0] = p.coords.norm() - 1.0;
//!     out[1] = 0.3;
//! });
//!
//! let dir = tempfile::tempdir().unwrap();
//! let params = WriterParams::default()
//!     .with_bounds(SliceBounds::from_limits(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0))
//!     .with_pitch(PixelPitch::new(0.05, 0.05))
//!     .with_slice_thickness(0.5)
//!     .with_materials(&["VeroPureWht", "VeroBlack"])
//!     .with_dithering(DitherKernel::FloydSteinberg)
//!     .with_output(dir.path(), "sphere");
//!
//! let summary = write_slices(params, &sampler).unwrap();
//! assert_eq!(summary.layers_written, 4);
//! assert!(dir.path().join("sphere_0.png").is_file());
//! ```
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**, units in mm:
//! - X: image columns, left to right
//! - Y: image rows; `ymin` is the bottom row of each image
//! - Z: layers, bottom up (print direction)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod export;
mod params;
mod result;
mod sampler;
mod writer;

pub use error::{BoxError, WriteError, WriteResult};
pub use export::{LayerSink, PngDirectory, encode_png, save_png};
pub use params::{DPI_X, DPI_Y, SLICE_THICKNESS, SLICE_THICKNESS_HR, WriterParams};
pub use result::WriteSummary;
pub use sampler::{ChannelModel, PointSampler, SliceSampler};
pub use writer::{SlicePlan, SliceWriter, write_slices};

// Re-export the types that appear in this crate's API
pub use raster_dither::{DitherKernel, SliceStats};
pub use raster_types::{
    GridDims, MappingMode, Palette, PixelPitch, Point3, Raster, RasterError, SliceBounds,
    SlicePlane,
};
