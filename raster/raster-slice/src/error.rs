//! Error types for slice writing.

use std::path::PathBuf;

use raster_dither::DitherError;
use raster_types::RasterError;
use thiserror::Error;

/// Boxed error returned by samplers and sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a slice-writing run.
///
/// Configuration errors are raised before any layer is processed. Every other
/// error stops the whole run; there is no partial-success mode.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Invalid bounds, pitch, thickness or material list.
    #[error("invalid configuration: {0}")]
    Config(#[from] RasterError),

    /// The first requested layer lies beyond the grid.
    #[error("first layer {first} is outside the grid of {nz} layers")]
    LayerOutOfRange {
        /// Requested first layer.
        first: usize,
        /// Layers in the grid.
        nz: usize,
    },

    /// The sampler failed for a layer.
    #[error("sampling failed for layer {layer}: {source}")]
    Sampling {
        /// Layer being sampled.
        layer: usize,
        /// Error reported by the sampler.
        #[source]
        source: BoxError,
    },

    /// Sampled data did not match the slice layout.
    #[error("layer {layer}: {source}")]
    Rasterize {
        /// Layer being rasterized.
        layer: usize,
        /// The layout mismatch.
        #[source]
        source: DitherError,
    },

    /// Encoding or writing a layer image failed.
    #[error("failed to write layer {layer} to {path}: {source}")]
    LayerWrite {
        /// Layer being written.
        layer: usize,
        /// Destination file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: BoxError,
    },

    /// The output directory could not be created.
    #[error("failed to create output folder {path}: {source}")]
    OutputFolder {
        /// The folder that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for slice writing.
pub type WriteResult<T> = std::result::Result<T, WriteError>;
