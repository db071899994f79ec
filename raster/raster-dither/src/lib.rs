//! Material resolution and error-diffusion dithering for slice rasters.
//!
//! Turns a buffer of fractional material densities into a raster where every
//! pixel holds exactly one printable material, pushing the quantization
//! residual of each pixel onto its not-yet-visited neighbors.
//!
//! # Pipeline
//!
//! For each pixel, in row-major order (rows outer, columns inner):
//!
//! 1. Read the accumulated voxel and normalize it ([`raster_types::normalize_voxel`])
//! 2. Resolve it with [`find_closest_material`]
//! 3. Compute `requested - printed` and spread it with [`diffuse_error`]
//! 4. Pack the material color into the [`raster_types::Raster`]
//!
//! The scan order is what makes every diffusion target a pixel that has not
//! been resolved yet, so a single slice must be processed on one thread.
//! Separate slices are independent.
//!
//! # Example
//!
//! ```
//! use raster_dither::{DitherKernel, rasterize_slice};
//! use raster_types::{MappingMode, Palette, Raster, SliceBuffer};
//!
//! let palette = Palette::from_names(&["VeroPureWht", "VeroBlack"]).unwrap();
//! let mut buffer = SliceBuffer::filled(16, 16, &[-1.0, 0.3]);
//! let mut raster = Raster::new(16, 16, 0);
//!
//! let stats = rasterize_slice(
//!     &mut buffer,
//!     &palette,
//!     DitherKernel::FloydSteinberg,
//!     MappingMode::Materials,
//!     &mut raster,
//! )
//! .unwrap();
//!
//! // Roughly 30% of the pixels print in black.
//! assert!(stats.material_pixels[1] > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod diffuse;
mod error;
mod kernel;
mod rasterize;
mod resolve;

pub use diffuse::diffuse_error;
pub use error::{DitherError, DitherResult};
pub use kernel::{DitherKernel, Tap};
pub use rasterize::{SliceStats, rasterize_slice};
pub use resolve::{BACKGROUND_THRESHOLD, Resolution, find_closest_material};
