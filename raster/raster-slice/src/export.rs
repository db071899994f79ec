//! PNG encoding and layer sinks.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, ImageFormat, ImageResult, RgbaImage};
use raster_types::{Raster, Rgba8};
use tracing::debug;

use crate::error::{WriteError, WriteResult};

/// Convert a raster into an RGBA image, top row first.
fn to_rgba_image(raster: &Raster) -> ImageResult<RgbaImage> {
    let dimension_error =
        || ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError));
    let width = u32::try_from(raster.width()).map_err(|_| dimension_error())?;
    let height = u32::try_from(raster.height()).map_err(|_| dimension_error())?;

    let bytes: Vec<u8> = raster
        .pixels()
        .iter()
        .flat_map(|&argb| Rgba8::from_argb(argb).to_rgba_bytes())
        .collect();

    RgbaImage::from_raw(width, height, bytes).ok_or_else(dimension_error)
}

/// Encode a raster as a PNG file in memory.
///
/// Pixels are written with their alpha channel, so outside pixels
/// (`0xFF000000`) come out opaque black.
///
/// # Errors
///
/// Returns an error if the raster is too large for PNG or encoding fails.
///
/// # Example
///
/// ```
/// use raster_slice::encode_png;
/// use raster_types::Raster;
///
/// let raster = Raster::new(4, 2, 0xFF00_0000);
/// let png = encode_png(&raster).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn encode_png(raster: &Raster) -> ImageResult<Vec<u8>> {
    let image = to_rgba_image(raster)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode a raster as PNG and write it to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing the file fails.
pub fn save_png(raster: &Raster, path: impl AsRef<Path>) -> ImageResult<()> {
    let bytes = encode_png(raster)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Destination for finished layer images.
///
/// Sinks are shared between worker threads when layers run in parallel, and
/// may receive layers out of order.
pub trait LayerSink: Sync {
    /// Called once before the first layer is written.
    ///
    /// # Errors
    ///
    /// An error aborts the run before any layer is sampled.
    fn prepare(&self) -> WriteResult<()> {
        Ok(())
    }

    /// Store the image of layer `layer`.
    ///
    /// # Errors
    ///
    /// An error aborts the run.
    fn write_layer(&self, layer: usize, raster: &Raster) -> WriteResult<()>;
}

/// Writes each layer to `{out_folder}/{out_prefix}_{layer}.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngDirectory {
    /// Destination folder, created on demand.
    pub out_folder: PathBuf,
    /// File name prefix.
    pub out_prefix: String,
}

impl PngDirectory {
    /// Create a sink for the given folder and prefix.
    #[must_use]
    pub fn new(out_folder: impl Into<PathBuf>, out_prefix: impl Into<String>) -> Self {
        Self {
            out_folder: out_folder.into(),
            out_prefix: out_prefix.into(),
        }
    }

    /// File path of layer `layer`.
    ///
    /// ```
    /// use raster_slice::PngDirectory;
    /// use std::path::Path;
    ///
    /// let sink = PngDirectory::new("/tmp/job", "part");
    /// assert_eq!(sink.layer_path(42), Path::new("/tmp/job/part_42.png"));
    /// ```
    #[must_use]
    pub fn layer_path(&self, layer: usize) -> PathBuf {
        self.out_folder.join(format!("{}_{layer}.png", self.out_prefix))
    }
}

impl LayerSink for PngDirectory {
    fn prepare(&self) -> WriteResult<()> {
        std::fs::create_dir_all(&self.out_folder).map_err(|source| WriteError::OutputFolder {
            path: self.out_folder.clone(),
            source,
        })
    }

    fn write_layer(&self, layer: usize, raster: &Raster) -> WriteResult<()> {
        let path = self.layer_path(layer);
        save_png(raster, &path).map_err(|source| WriteError::LayerWrite {
            layer,
            path: path.clone(),
            source: Box::new(source),
        })?;
        debug!(layer, path = %path.display(), "Wrote layer image");
        Ok(())
    }
}
