//! Slice scan: resolve, diffuse, pack.

use raster_types::{
    MappingMode, OUTSIDE_ARGB, Palette, Raster, SliceBuffer, normalize_voxel, residual,
};

use crate::diffuse::diffuse_error;
use crate::error::{DitherError, DitherResult};
use crate::kernel::DitherKernel;
use crate::resolve::{Resolution, find_closest_material};

/// Pixel counts of one rasterized slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceStats {
    /// Pixels outside the model.
    pub outside: usize,
    /// Pixels printed with each palette material, in palette order.
    pub material_pixels: Vec<usize>,
}

impl SliceStats {
    /// Pixels inside the model.
    #[must_use]
    pub fn inside(&self) -> usize {
        self.material_pixels.iter().sum()
    }

    /// Add another slice's counts to these.
    pub fn accumulate(&mut self, other: &Self) {
        self.outside += other.outside;
        if self.material_pixels.len() < other.material_pixels.len() {
            self.material_pixels.resize(other.material_pixels.len(), 0);
        }
        for (total, count) in self.material_pixels.iter_mut().zip(&other.material_pixels) {
            *total += count;
        }
    }
}

/// Convert one sampled slice into packed material colors.
///
/// Pixels are visited row by row from the bottom row (`iy = 0`) upwards,
/// left to right within a row. Each voxel is read with the residual already
/// pushed into it and resolved to one material from a copy normalized with
/// `mapping`. The residual diffused forward with `kernel` is taken from the
/// accumulated values themselves, so error pushed outside `[0, 1]` is carried
/// on rather than clamped away. `buffer` is consumed as scratch space and
/// holds the accumulated values afterwards.
///
/// Buffer row `iy` is written to image row `ny - 1 - iy` of `raster`.
///
/// # Errors
///
/// - [`DitherError::ChannelMismatch`] if the buffer does not carry one channel
///   per palette material
/// - [`DitherError::SizeMismatch`] if the raster and buffer sizes differ
pub fn rasterize_slice(
    buffer: &mut SliceBuffer,
    palette: &Palette,
    kernel: DitherKernel,
    mapping: MappingMode,
    raster: &mut Raster,
) -> DitherResult<SliceStats> {
    let channels = buffer.channels();
    if channels != palette.material_count() {
        return Err(DitherError::ChannelMismatch {
            buffer: channels,
            palette: palette.material_count(),
        });
    }
    let (nx, ny) = (buffer.nx(), buffer.ny());
    if raster.width() != nx || raster.height() != ny {
        return Err(DitherError::SizeMismatch {
            raster_width: raster.width(),
            raster_height: raster.height(),
            nx,
            ny,
        });
    }

    let mut stats = SliceStats {
        outside: 0,
        material_pixels: vec![0; channels],
    };
    let mut voxel = vec![0.0; channels];
    let mut error = vec![0.0; channels];

    for iy in 0..ny {
        for ix in 0..nx {
            voxel.copy_from_slice(buffer.voxel(ix, iy));
            normalize_voxel(&mut voxel, mapping);

            match find_closest_material(&voxel) {
                Resolution::Outside => {
                    raster.set_slice_pixel(ix, iy, OUTSIDE_ARGB);
                    stats.outside += 1;
                }
                Resolution::Material(material) => {
                    residual(buffer.voxel(ix, iy), palette.basis(material), &mut error);
                    diffuse_error(buffer, ix, iy, &error, kernel);
                    raster.set_slice_pixel(ix, iy, palette.argb(material));
                    stats.material_pixels[material] += 1;
                }
            }
        }
    }

    Ok(stats)
}
