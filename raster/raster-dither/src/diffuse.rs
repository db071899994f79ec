//! Residual distribution into the slice buffer.

// Slice dimensions fit comfortably in i64.
#![allow(clippy::cast_possible_wrap)]

use raster_types::SliceBuffer;

use crate::kernel::DitherKernel;

/// Add `error * weight` to the density channels of each kernel target of
/// pixel `(ix, iy)`.
///
/// Targets outside the slice are dropped, so residual near the right and top
/// edges is lost. Channel 0 (signed distance) is never touched, and the
/// targets are not re-normalized: accumulated densities may leave `[0, 1]`
/// until the target pixel itself is resolved.
///
/// Returns the total weight that landed inside the slice.
///
/// # Example
///
/// ```
/// use raster_dither::{DitherKernel, diffuse_error};
/// use raster_types::SliceBuffer;
///
/// let mut buffer = SliceBuffer::new(2, 2, 2);
/// let delivered = diffuse_error(&mut buffer, 1, 0, &[0.0, 0.16], DitherKernel::FloydSteinberg);
///
/// // Only the "below" and "below-left" targets exist for the last column.
/// assert!((delivered - 0.5).abs() < 1e-12);
/// assert!((buffer.voxel(1, 1)[1] - 0.05).abs() < 1e-12);
/// assert!((buffer.voxel(0, 1)[1] - 0.03).abs() < 1e-12);
/// ```
pub fn diffuse_error(
    buffer: &mut SliceBuffer,
    ix: usize,
    iy: usize,
    error: &[f64],
    kernel: DitherKernel,
) -> f64 {
    let mut delivered = 0.0;
    for tap in kernel.taps() {
        let Some(target) = buffer.voxel_mut_checked(ix as i64 + tap.dx, iy as i64 + tap.dy) else {
            continue;
        };
        for (value, e) in target.iter_mut().zip(error).skip(1) {
            *value += e * tap.weight;
        }
        delivered += tap.weight;
    }
    delivered
}
