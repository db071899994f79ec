//! Summary of a slice-writing run.

use std::ops::Range;
use std::time::Duration;

use raster_dither::SliceStats;
use raster_types::GridDims;

/// Outcome of [`SlicePlan::write`](crate::SlicePlan::write).
#[derive(Debug, Clone, PartialEq)]
pub struct WriteSummary {
    /// Grid the model was sliced on.
    pub grid: GridDims,

    /// Layers the run was asked to write.
    pub layers: Range<usize>,

    /// Layers handed to the sink.
    pub layers_written: usize,

    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,

    /// Pixel counts summed over the written layers.
    pub stats: SliceStats,

    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl WriteSummary {
    /// Layers requested but not written.
    #[must_use]
    pub fn layers_skipped(&self) -> usize {
        self.layers.len().saturating_sub(self.layers_written)
    }

    /// Fraction of inside pixels printed with each material.
    ///
    /// Empty when no inside pixel was written.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn material_fractions(&self) -> Vec<f64> {
        let inside = self.stats.inside();
        if inside == 0 {
            return Vec::new();
        }
        self.stats
            .material_pixels
            .iter()
            .map(|&count| count as f64 / inside as f64)
            .collect()
    }
}

impl std::fmt::Display for WriteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WriteSummary: {}/{} layers on grid {}, {} inside pixels, {:.2}s{}",
            self.layers_written,
            self.layers.len(),
            self.grid,
            self.stats.inside(),
            self.elapsed.as_secs_f64(),
            if self.cancelled { " (cancelled)" } else { "" }
        )
    }
}
