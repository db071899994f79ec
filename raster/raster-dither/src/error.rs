//! Error types for slice rasterization.

use thiserror::Error;

/// Errors that can occur while rasterizing a slice.
#[derive(Debug, Error)]
pub enum DitherError {
    /// Buffer voxels do not have one channel per palette material.
    #[error("buffer has {buffer} channels but the palette has {palette} materials")]
    ChannelMismatch {
        /// Channels per voxel in the buffer.
        buffer: usize,
        /// Materials in the palette.
        palette: usize,
    },

    /// Raster and buffer disagree on the slice size.
    #[error("raster is {raster_width}x{raster_height} but the buffer is {nx}x{ny}")]
    SizeMismatch {
        /// Raster width.
        raster_width: usize,
        /// Raster height.
        raster_height: usize,
        /// Buffer pixels per row.
        nx: usize,
        /// Buffer rows.
        ny: usize,
    },
}

/// Result type for rasterization.
pub type DitherResult<T> = std::result::Result<T, DitherError>;
