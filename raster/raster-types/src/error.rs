//! Error types for grid and buffer construction.

use thiserror::Error;

/// Errors raised while deriving grids or building slice buffers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RasterError {
    /// Bounds produce an empty or inverted pixel grid.
    #[error("illegal output bounds: grid [{nx} x {ny} x {nz}] must be positive on every axis")]
    DegenerateBounds {
        /// Pixels along X.
        nx: i64,
        /// Pixels along Y.
        ny: i64,
        /// Layers along Z.
        nz: i64,
    },

    /// Pixel pitch must be positive and finite.
    #[error("invalid pixel pitch: ({x}, {y}) (must be > 0)")]
    InvalidPitch {
        /// Pitch along X in mm.
        x: f64,
        /// Pitch along Y in mm.
        y: f64,
    },

    /// Slice thickness must be positive and finite.
    #[error("invalid slice thickness: {0} (must be > 0)")]
    InvalidSliceThickness(f64),

    /// A palette needs at least one material.
    #[error("material list is empty")]
    NoMaterials,

    /// A flat buffer does not match `nx * ny * channels`.
    #[error("buffer holds {got} values, expected {expected}")]
    BufferSize {
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        got: usize,
    },

    /// `nx * ny * channels` does not fit in memory addressing.
    #[error("buffer of [{nx} x {ny} x {channels}] values is too large")]
    BufferTooLarge {
        /// Pixels along X.
        nx: usize,
        /// Pixels along Y.
        ny: usize,
        /// Channels per voxel.
        channels: usize,
    },
}

/// Result type for raster type construction.
pub type RasterResult<T> = std::result::Result<T, RasterError>;
