//! Per-layer working buffer and the raster it is packed into.

use crate::error::{RasterError, RasterResult};

/// Flat channel data for one slice.
///
/// Values are stored row-major: the voxel of pixel `(ix, iy)` starts at
/// `(ix + iy * nx) * channels`. Row `iy = 0` is the bottom (minimum Y) row of
/// the slice plane. The buffer is exclusively owned by one layer worker and
/// reused from layer to layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceBuffer {
    data: Vec<f64>,
    nx: usize,
    ny: usize,
    channels: usize,
}

impl SliceBuffer {
    /// Number of values held by an `nx x ny` buffer of `channels` channels.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BufferTooLarge`] if the product overflows `usize`.
    pub fn checked_len(nx: usize, ny: usize, channels: usize) -> RasterResult<usize> {
        nx.checked_mul(ny)
            .and_then(|pixels| pixels.checked_mul(channels))
            .ok_or(RasterError::BufferTooLarge { nx, ny, channels })
    }

    /// Allocate a zeroed buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer cannot be allocated. Use [`SliceBuffer::try_new`]
    /// when the dimensions are not already known to fit.
    #[must_use]
    pub fn new(nx: usize, ny: usize, channels: usize) -> Self {
        let len = Self::checked_len(nx, ny, channels).unwrap_or(usize::MAX);
        Self {
            data: vec![0.0; len],
            nx,
            ny,
            channels,
        }
    }

    /// Allocate a zeroed buffer, checking the size first.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BufferTooLarge`] if `nx * ny * channels`
    /// overflows `usize`.
    pub fn try_new(nx: usize, ny: usize, channels: usize) -> RasterResult<Self> {
        let len = Self::checked_len(nx, ny, channels)?;
        Ok(Self {
            data: vec![0.0; len],
            nx,
            ny,
            channels,
        })
    }

    /// Wrap existing sampled data.
    ///
    /// # Errors
    ///
    /// - [`RasterError::BufferTooLarge`] if `nx * ny * channels` overflows `usize`
    /// - [`RasterError::BufferSize`] if `data.len() != nx * ny * channels`
    pub fn from_vec(data: Vec<f64>, nx: usize, ny: usize, channels: usize) -> RasterResult<Self> {
        let expected = Self::checked_len(nx, ny, channels)?;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            nx,
            ny,
            channels,
        })
    }

    /// Build a buffer where every pixel holds the same voxel.
    #[must_use]
    pub fn filled(nx: usize, ny: usize, voxel: &[f64]) -> Self {
        let data = voxel
            .iter()
            .copied()
            .cycle()
            .take(nx * ny * voxel.len())
            .collect();
        Self {
            data,
            nx,
            ny,
            channels: voxel.len(),
        }
    }

    /// Pixels per row.
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// Values per voxel.
    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// All values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// All values, mutably. Samplers write into this.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Offset of the first channel of pixel `(ix, iy)`.
    #[inline]
    #[must_use]
    pub const fn offset(&self, ix: usize, iy: usize) -> usize {
        (ix + iy * self.nx) * self.channels
    }

    /// Voxel of pixel `(ix, iy)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the buffer.
    #[inline]
    #[must_use]
    pub fn voxel(&self, ix: usize, iy: usize) -> &[f64] {
        let start = self.offset(ix, iy);
        &self.data[start..start + self.channels]
    }

    /// Voxel at signed coordinates, or `None` when outside the slice.
    #[inline]
    pub fn voxel_mut_checked(&mut self, ix: i64, iy: i64) -> Option<&mut [f64]> {
        let ix = usize::try_from(ix).ok().filter(|&x| x < self.nx)?;
        let iy = usize::try_from(iy).ok().filter(|&y| y < self.ny)?;
        let start = self.offset(ix, iy);
        Some(&mut self.data[start..start + self.channels])
    }
}

/// A packed ARGB image for one slice.
///
/// Pixels are stored top row first, as image files expect. Use
/// [`Raster::set_slice_pixel`] to write in slice-buffer coordinates so that
/// buffer row 0 (minimum Y) ends up at the bottom of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Raster {
    /// Allocate a raster filled with `argb`.
    ///
    /// # Panics
    ///
    /// Panics if the raster cannot be allocated.
    #[must_use]
    pub fn new(width: usize, height: usize, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; width.saturating_mul(height)],
        }
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Packed pixels, top row first.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel in image coordinates (row 0 = top).
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(x + y * self.width).copied()
    }

    /// Pixel in slice-buffer coordinates (row 0 = bottom).
    #[must_use]
    pub fn get_slice_pixel(&self, ix: usize, iy: usize) -> Option<u32> {
        let row = self.height.checked_sub(iy + 1)?;
        self.get(ix, row)
    }

    /// Write a pixel given in slice-buffer coordinates (row 0 = bottom).
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the raster.
    #[inline]
    pub fn set_slice_pixel(&mut self, ix: usize, iy: usize, argb: u32) {
        let row = self.height - 1 - iy;
        self.pixels[ix + row * self.width] = argb;
    }

    /// Count pixels equal to `argb`.
    #[must_use]
    pub fn count(&self, argb: u32) -> usize {
        self.pixels.iter().filter(|&&p| p == argb).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_layout() {
        let mut buffer = SliceBuffer::new(3, 2, 2);
        assert_eq!(buffer.as_slice().len(), 12);
        assert_eq!(buffer.offset(2, 1), 10);

        buffer.voxel_mut_checked(1, 1).unwrap()[1] = 0.7;
        assert_eq!(buffer.as_slice()[9], 0.7);
        assert_eq!(buffer.voxel(1, 1), &[0.0, 0.7]);
    }

    #[test]
    fn test_checked_access_rejects_outside() {
        let mut buffer = SliceBuffer::new(3, 2, 2);
        assert!(buffer.voxel_mut_checked(-1, 0).is_none());
        assert!(buffer.voxel_mut_checked(3, 0).is_none());
        assert!(buffer.voxel_mut_checked(0, 2).is_none());
        assert!(buffer.voxel_mut_checked(2, 1).is_some());
    }

    #[test]
    fn test_from_vec_size_check() {
        assert!(SliceBuffer::from_vec(vec![0.0; 12], 3, 2, 2).is_ok());
        assert!(matches!(
            SliceBuffer::from_vec(vec![0.0; 11], 3, 2, 2),
            Err(RasterError::BufferSize {
                expected: 12,
                got: 11
            })
        ));
    }

    #[test]
    fn test_size_overflow_is_an_error() {
        assert_eq!(SliceBuffer::checked_len(3, 2, 2).unwrap(), 12);

        let huge = usize::MAX / 2;
        assert!(matches!(
            SliceBuffer::checked_len(huge, 3, 1),
            Err(RasterError::BufferTooLarge { ny: 3, .. })
        ));
        assert!(matches!(
            SliceBuffer::checked_len(huge, 1, 4),
            Err(RasterError::BufferTooLarge { channels: 4, .. })
        ));
        assert!(matches!(
            SliceBuffer::try_new(huge, huge, 2),
            Err(RasterError::BufferTooLarge { .. })
        ));
        assert!(matches!(
            SliceBuffer::from_vec(vec![0.0; 4], huge, 4, 1),
            Err(RasterError::BufferTooLarge { .. })
        ));
        assert_eq!(SliceBuffer::try_new(3, 2, 2).unwrap(), SliceBuffer::new(3, 2, 2));
    }

    #[test]
    fn test_filled() {
        let buffer = SliceBuffer::filled(2, 2, &[-1.0, 0.3]);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.voxel(1, 1), &[-1.0, 0.3]);
    }

    #[test]
    fn test_raster_is_not_mirrored() {
        let mut raster = Raster::new(2, 3, 0);
        raster.set_slice_pixel(1, 0, 7);

        // Buffer row 0 is the last image row.
        assert_eq!(raster.get(1, 2), Some(7));
        assert_eq!(raster.get_slice_pixel(1, 0), Some(7));
        assert_eq!(raster.pixels()[5], 7);
        assert_eq!(raster.count(7), 1);
        assert_eq!(raster.get(2, 0), None);
        assert_eq!(raster.get_slice_pixel(0, 3), None);
    }
}
