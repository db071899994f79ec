//! Core data types for multi-material slice rasterization.
//!
//! This crate holds the leaf types shared by the dithering engine and the
//! slice writer:
//!
//! - [`Palette`] - ordered print materials with their colors and basis densities
//! - [`MappingMode`] and the voxel normalization rules ([`normalize_voxel`])
//! - [`Rgba8`] - 8-bit material colors and ARGB packing
//! - [`SliceBounds`], [`GridDims`], [`SlicePlane`] - physical bounds to pixel grid
//! - [`SliceBuffer`] and [`Raster`] - the per-layer working buffer and its output image
//!
//! # Voxel layout
//!
//! A voxel is a vector of `channel_count` values where `channel_count` equals the
//! number of materials in the palette:
//!
//! - channel 0: signed distance to the model surface (negative = inside)
//! - channel `i` (1..n): density of material `i`
//!
//! Material 0 is the background material. Its density is implicit
//! (`1 - sum(others)`) and is never stored.
//!
//! # Example
//!
//! ```
//! use raster_types::{MappingMode, Palette, normalize_voxel};
//!
//! let palette = Palette::from_names(&["VeroPureWht", "VeroBlack"]).unwrap();
//! assert_eq!(palette.material_count(), 2);
//!
//! let mut voxel = [-1.0, 1.4];
//! normalize_voxel(&mut voxel, MappingMode::Materials);
//! assert!((voxel[1] - 1.0).abs() < 1e-12);
//! ```
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**, units in mm:
//! - X: width (left/right), image columns
//! - Y: depth (front/back), image rows (row 0 of a buffer is the front/bottom)
//! - Z: height (print direction), one raster per layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod buffer;
mod color;
mod error;
mod grid;
mod palette;
mod voxel;

pub use buffer::{Raster, SliceBuffer};
pub use color::{OUTSIDE_ARGB, Rgba8};
pub use error::{RasterError, RasterResult};
pub use grid::{GridDims, PixelPitch, SliceBounds, SlicePlane};
pub use palette::{Material, Palette, REGISTRY, lookup_material};
pub use voxel::{MappingMode, normalize_voxel, residual};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
