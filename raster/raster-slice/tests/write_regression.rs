//! End-to-end tests for raster-slice: sample, dither and write PNG layers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use raster_slice::{
    BoxError, DitherKernel, LayerSink, MappingMode, PixelPitch, Point3, PointSampler, Raster,
    RasterError, SliceBounds, SlicePlane, SliceSampler, SliceWriter, WriteError, WriteResult,
    WriterParams, write_slices,
};

const WHITE: [u8; 4] = [240, 240, 240, 255];
const BLACK: [u8; 4] = [26, 26, 29, 255];
const OUTSIDE: [u8; 4] = [0, 0, 0, 255];

/// Unit-pitch job over an `n x n x layers` box with a white/black palette.
fn params(dir: &Path, n: f64, layers: f64) -> WriterParams {
    WriterParams::default()
        .with_bounds(SliceBounds::from_limits(0.0, n, 0.0, n, 0.0, layers))
        .with_pitch(PixelPitch::new(1.0, 1.0))
        .with_slice_thickness(1.0)
        .with_materials(&["VeroPureWht", "VeroBlack"])
        .with_output(dir, "slice")
}

/// Everything inside, with a constant black density.
fn uniform(density: f64) -> impl SliceSampler {
    PointSampler::new(move |_: &Point3<f64>, out: &mut [f64]| {
        out[0] = -1.0;
        out[1] = density;
    })
}

fn load(path: impl AsRef<Path>) -> image::RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

fn count(image: &image::RgbaImage, color: [u8; 4]) -> usize {
    image.pixels().filter(|p| p.0 == color).count()
}

fn png_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn degenerate_bounds_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let params = params(&out, 4.0, 2.0)
        .with_bounds(SliceBounds::from_limits(2.0, 2.0, 0.0, 4.0, 0.0, 2.0));

    let err = write_slices(params, &uniform(0.6)).unwrap_err();

    assert!(matches!(
        err,
        WriteError::Config(RasterError::DegenerateBounds { nx: 0, .. })
    ));
    assert!(!out.exists());
}

#[test]
fn first_layer_past_grid_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 3.0).with_layers(3, None);

    let err = write_slices(params, &uniform(0.6)).unwrap_err();

    assert!(matches!(err, WriteError::LayerOutOfRange { first: 3, nz: 3 }));
    assert!(png_names(dir.path()).is_empty());
}

// =============================================================================
// Output files
// =============================================================================

#[test]
fn writes_one_named_png_per_layer() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("job");
    let params = params(&out, 4.0, 6.0).with_layers(2, Some(3));

    let summary = write_slices(params, &uniform(0.6)).unwrap();

    assert_eq!(summary.layers_written, 3);
    assert_eq!(summary.layers, 2..5);
    assert_eq!(
        png_names(&out),
        vec!["slice_2.png", "slice_3.png", "slice_4.png"]
    );
}

#[test]
fn overlong_layer_count_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 3.0).with_layers(1, Some(50));

    let summary = write_slices(params, &uniform(0.6)).unwrap();

    assert_eq!(summary.layers_written, 2);
    assert_eq!(png_names(dir.path()), vec!["slice_1.png", "slice_2.png"]);
}

#[test]
fn single_layer_creates_output_folder() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("fresh/job");
    let writer =
        SliceWriter::new(params(&out, 4.0, 3.0).with_dithering(DitherKernel::None)).unwrap();

    let stats = writer
        .plan()
        .unwrap()
        .write_layer(1, &uniform(0.6), &writer.png_sink())
        .unwrap();

    assert_eq!(stats.material_pixels, vec![0, 16]);
    assert_eq!(png_names(&out), vec!["slice_1.png"]);
}

#[test]
fn image_size_matches_grid() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 1.0, 1.0)
        .with_bounds(SliceBounds::from_limits(0.0, 6.0, 0.0, 3.0, 0.0, 1.0));

    write_slices(params, &uniform(0.6)).unwrap();

    assert_eq!(load(dir.path().join("slice_0.png")).dimensions(), (6, 3));
}

// =============================================================================
// Dithering through the writer
// =============================================================================

#[test]
fn majority_density_prints_material_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 1.0).with_dithering(DitherKernel::None);

    let summary = write_slices(params, &uniform(0.6)).unwrap();

    assert_eq!(summary.stats.material_pixels, vec![0, 16]);
    assert_eq!(count(&load(dir.path().join("slice_0.png")), BLACK), 16);
}

#[test]
fn minority_density_without_dithering_is_background() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 1.0).with_dithering(DitherKernel::None);

    write_slices(params, &uniform(0.3)).unwrap();

    assert_eq!(count(&load(dir.path().join("slice_0.png")), WHITE), 16);
}

#[test]
fn minority_density_with_dithering_prints_some_material() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 32.0, 1.0).with_dithering(DitherKernel::FloydSteinberg);

    write_slices(params, &uniform(0.3)).unwrap();

    let image = load(dir.path().join("slice_0.png"));
    let black = count(&image, BLACK);
    assert!(black > 0);
    assert_eq!(black + count(&image, WHITE), 32 * 32);
}

#[test]
fn outside_pixels_are_opaque_black() {
    let dir = tempfile::tempdir().unwrap();
    // Disc of radius 3 centered in an 8 x 8 slice.
    let sampler = PointSampler::new(|p: &Point3<f64>, out: &mut [f64]| {
        out[0] = (p.x - 4.0).hypot(p.y - 4.0) - 3.0;
        out[1] = 1.0;
    });

    let summary = write_slices(params(dir.path(), 8.0, 1.0), &sampler).unwrap();

    let image = load(dir.path().join("slice_0.png"));
    assert_eq!(image.get_pixel(0, 0).0, OUTSIDE);
    assert_eq!(image.get_pixel(4, 4).0, BLACK);
    assert_eq!(count(&image, OUTSIDE), summary.stats.outside);
    assert!(summary.stats.outside > 0);
}

#[test]
fn bottom_of_the_model_is_the_bottom_image_row() {
    let dir = tempfile::tempdir().unwrap();
    // Black below y = 2, white above.
    let sampler = PointSampler::new(|p: &Point3<f64>, out: &mut [f64]| {
        out[0] = -1.0;
        out[1] = if p.y < 2.0 { 1.0 } else { 0.0 };
    });
    let params = params(dir.path(), 4.0, 1.0).with_dithering(DitherKernel::None);

    write_slices(params, &sampler).unwrap();

    let image = load(dir.path().join("slice_0.png"));
    for x in 0..4 {
        assert_eq!(image.get_pixel(x, 0).0, WHITE);
        assert_eq!(image.get_pixel(x, 1).0, WHITE);
        assert_eq!(image.get_pixel(x, 2).0, BLACK);
        assert_eq!(image.get_pixel(x, 3).0, BLACK);
    }
}

#[test]
fn unknown_material_prints_error_color() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 1.0)
        .with_materials(&["VeroPureWht", "NotARealResin"])
        .with_dithering(DitherKernel::None);

    write_slices(params, &uniform(0.9)).unwrap();

    assert_eq!(
        count(&load(dir.path().join("slice_0.png")), [255, 0, 0, 255]),
        16
    );
}

#[test]
fn rgba_mapping_writes_color_layers() {
    let dir = tempfile::tempdir().unwrap();
    let sampler = PointSampler::new(|_: &Point3<f64>, out: &mut [f64]| {
        out.copy_from_slice(&[-1.0, 0.1, 0.9, 0.2, 0.0]);
    });
    let params = params(dir.path(), 4.0, 1.0)
        .with_materials(&["VeroPureWht", "VeroCyan", "VeroMgnt", "VeroYellow", "VeroBlack"])
        .with_mapping(MappingMode::Rgba)
        .with_dithering(DitherKernel::None);

    let summary = write_slices(params, &sampler).unwrap();

    assert_eq!(summary.stats.material_pixels, vec![0, 0, 16, 0, 0]);
}

// =============================================================================
// Parallelism and cancellation
// =============================================================================

#[test]
fn parallel_and_serial_runs_write_identical_images() {
    let sampler = PointSampler::new(|p: &Point3<f64>, out: &mut [f64]| {
        out[0] = (p.x - 8.0).hypot(p.y - 8.0) - (7.0 - p.z);
        out[1] = (p.x / 16.0) * 0.8;
    });

    let serial = tempfile::tempdir().unwrap();
    let parallel = tempfile::tempdir().unwrap();
    write_slices(
        params(serial.path(), 16.0, 6.0).with_parallel(false),
        &sampler,
    )
    .unwrap();
    write_slices(
        params(parallel.path(), 16.0, 6.0).with_parallel(true),
        &sampler,
    )
    .unwrap();

    let names = png_names(serial.path());
    assert_eq!(names.len(), 6);
    assert_eq!(names, png_names(parallel.path()));
    for name in &names {
        assert_eq!(
            std::fs::read(serial.path().join(name)).unwrap(),
            std::fs::read(parallel.path().join(name)).unwrap(),
            "{name}"
        );
    }
}

/// Forwards to the PNG sink and raises `cancel` after the first layer.
struct CancelAfterFirst<'a> {
    inner: raster_slice::PngDirectory,
    cancel: &'a AtomicBool,
}

impl LayerSink for CancelAfterFirst<'_> {
    fn prepare(&self) -> WriteResult<()> {
        self.inner.prepare()
    }

    fn write_layer(&self, layer: usize, raster: &Raster) -> WriteResult<()> {
        self.inner.write_layer(layer, raster)?;
        self.cancel.store(true, Ordering::Relaxed);
        Ok(())
    }
}

#[test]
fn cancellation_stops_before_the_next_layer() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SliceWriter::new(params(dir.path(), 4.0, 5.0).with_parallel(false)).unwrap();
    let cancel = AtomicBool::new(false);
    let sink = CancelAfterFirst {
        inner: writer.png_sink(),
        cancel: &cancel,
    };

    let summary = writer
        .plan()
        .unwrap()
        .write_cancellable(&uniform(0.6), &sink, &cancel)
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.layers_written, 1);
    assert_eq!(summary.layers_skipped(), 4);
    assert_eq!(png_names(dir.path()), vec!["slice_0.png"]);
}

#[test]
fn cancelled_before_start_writes_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let writer = SliceWriter::new(params(dir.path(), 4.0, 5.0)).unwrap();
    let cancel = AtomicBool::new(true);

    let summary = writer
        .plan()
        .unwrap()
        .write_cancellable(&uniform(0.6), &writer.png_sink(), &cancel)
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.layers_written, 0);
    assert!(png_names(dir.path()).is_empty());
}

// =============================================================================
// Failures
// =============================================================================

struct FailAtHeight(f64);

impl SliceSampler for FailAtHeight {
    fn sample_slice(
        &self,
        plane: &SlicePlane,
        channels: usize,
        out: &mut [f64],
    ) -> Result<(), BoxError> {
        if plane.origin.z > self.0 {
            return Err(format!("no data above z = {}", self.0).into());
        }
        for voxel in out.chunks_exact_mut(channels) {
            voxel[0] = -1.0;
        }
        Ok(())
    }
}

#[test]
fn sampler_error_reports_layer() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 5.0).with_parallel(false);

    let err = write_slices(params, &FailAtHeight(2.0)).unwrap_err();

    match err {
        WriteError::Sampling { layer, source } => {
            assert_eq!(layer, 2);
            assert!(source.to_string().contains("z = 2"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(png_names(dir.path()), vec!["slice_0.png", "slice_1.png"]);
}

#[test]
fn parallel_sampler_error_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let params = params(dir.path(), 4.0, 8.0).with_parallel(true);

    let err = write_slices(params, &FailAtHeight(3.0)).unwrap_err();

    assert!(matches!(err, WriteError::Sampling { layer, .. } if layer >= 3));
}
