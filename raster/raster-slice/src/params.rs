//! Slice writer parameters and presets.

use std::path::PathBuf;

use raster_dither::DitherKernel;
use raster_types::{MappingMode, PixelPitch, SliceBounds};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layer thickness of the high-resolution print mode in mm.
pub const SLICE_THICKNESS_HR: f64 = 0.014;

/// Layer thickness of the standard print mode in mm.
pub const SLICE_THICKNESS: f64 = 0.027;

/// Printer resolution along X in dots per inch.
pub const DPI_X: f64 = 600.0;

/// Printer resolution along Y in dots per inch.
pub const DPI_Y: f64 = 300.0;

/// Parameters for a slice-writing run.
///
/// All values are plain data; validation happens when the writer is built
/// and when the grid is derived.
///
/// # Example
///
/// ```
/// use raster_slice::{DitherKernel, SliceBounds, WriterParams};
///
/// let params = WriterParams::default()
///     .with_bounds(SliceBounds::from_limits(0.0, 20.0, 0.0, 20.0, 0.0, 5.0))
///     .with_materials(&["VeroPureWht", "VeroCyan", "VeroMgnt"])
///     .with_dithering(DitherKernel::Xy)
///     .with_layers(10, Some(5));
///
/// assert_eq!(params.materials.len(), 3);
/// assert_eq!(params.first_layer, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterParams {
    /// Physical extent to slice, in mm.
    pub bounds: SliceBounds,

    /// Layer thickness in mm.
    pub slice_thickness: f64,

    /// Pixel size in mm.
    pub pitch: PixelPitch,

    /// Ordered material names; the first is the background material.
    pub materials: Vec<String>,

    /// Error-diffusion kernel.
    pub dithering: DitherKernel,

    /// How sampled channels map onto densities.
    pub mapping: MappingMode,

    /// First layer to write (`None` = 0).
    pub first_layer: Option<usize>,

    /// Number of layers to write (`None` = all remaining).
    pub layer_count: Option<usize>,

    /// Process layers in parallel.
    pub parallel: bool,

    /// Folder receiving the layer images.
    pub out_folder: PathBuf,

    /// File name prefix of the layer images.
    pub out_prefix: String,
}

impl Default for WriterParams {
    fn default() -> Self {
        Self {
            bounds: SliceBounds::default(),
            slice_thickness: SLICE_THICKNESS_HR,
            pitch: PixelPitch::from_dpi(DPI_X, DPI_Y),
            materials: vec!["VeroPureWht".to_string()],
            dithering: DitherKernel::FloydSteinberg,
            mapping: MappingMode::Materials,
            first_layer: None,
            layer_count: None,
            parallel: true,
            out_folder: PathBuf::from("slices"),
            out_prefix: "slice".to_string(),
        }
    }
}

impl WriterParams {
    /// High-resolution print mode (0.014 mm layers). Same as `default()`.
    #[must_use]
    pub fn high_resolution() -> Self {
        Self::default()
    }

    /// Standard print mode (0.027 mm layers).
    #[must_use]
    pub fn standard() -> Self {
        Self {
            slice_thickness: SLICE_THICKNESS,
            ..Default::default()
        }
    }

    /// Set the physical bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: SliceBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the layer thickness.
    #[must_use]
    pub const fn with_slice_thickness(mut self, thickness: f64) -> Self {
        self.slice_thickness = thickness;
        self
    }

    /// Set the pixel size.
    #[must_use]
    pub const fn with_pitch(mut self, pitch: PixelPitch) -> Self {
        self.pitch = pitch;
        self
    }

    /// Set the ordered material names.
    #[must_use]
    pub fn with_materials<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.materials = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Set the error-diffusion kernel.
    #[must_use]
    pub const fn with_dithering(mut self, kernel: DitherKernel) -> Self {
        self.dithering = kernel;
        self
    }

    /// Set the mapping mode.
    #[must_use]
    pub const fn with_mapping(mut self, mapping: MappingMode) -> Self {
        self.mapping = mapping;
        self
    }

    /// Restrict the run to `count` layers starting at `first`.
    #[must_use]
    pub const fn with_layers(mut self, first: usize, count: Option<usize>) -> Self {
        self.first_layer = Some(first);
        self.layer_count = count;
        self
    }

    /// Enable or disable parallel layer processing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the output folder and file prefix.
    #[must_use]
    pub fn with_output(mut self, folder: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.out_folder = folder.into();
        self.out_prefix = prefix.into();
        self
    }
}
