//! Voxel channel normalization.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How sampled channel values map onto printable densities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MappingMode {
    /// Channels are material densities competing for one voxel.
    #[default]
    Materials,
    /// Channels 1..=3 are independent color components.
    Rgb,
    /// Channels 1..=4 are independent color components with alpha.
    Rgba,
}

impl MappingMode {
    /// Canonical name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
        }
    }

    /// Number of leading density channels clamped independently, if any.
    const fn color_channels(self) -> Option<usize> {
        match self {
            Self::Materials => None,
            Self::Rgb => Some(3),
            Self::Rgba => Some(4),
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MappingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "materials" => Ok(Self::Materials),
            "rgb" | "color_rgb" => Ok(Self::Rgb),
            "rgba" | "color_rgba" => Ok(Self::Rgba),
            other => Err(format!("unknown mapping mode: {other}")),
        }
    }
}

/// Normalize the density channels of one voxel in place.
///
/// Channel 0 (signed distance) is never modified.
///
/// - [`MappingMode::Materials`]: clamp every density to `[0, 1]`, then scale all
///   of them by `1 / t` when their sum `t` exceeds 1.
/// - [`MappingMode::Rgb`] / [`MappingMode::Rgba`]: clamp channels 1..=3 (1..=4)
///   to `[0, 1]` independently. Channels past the voxel length are skipped.
///
/// # Example
///
/// ```
/// use raster_types::{MappingMode, normalize_voxel};
///
/// let mut voxel = [-0.5, 0.9, 0.6, -0.2];
/// normalize_voxel(&mut voxel, MappingMode::Materials);
/// assert!((voxel[1] + voxel[2] + voxel[3] - 1.0).abs() < 1e-12);
/// assert!((voxel[1] / voxel[2] - 1.5).abs() < 1e-12);
/// assert_eq!(voxel[3], 0.0);
/// ```
pub fn normalize_voxel(voxel: &mut [f64], mode: MappingMode) {
    let Some(densities) = voxel.get_mut(1..) else {
        return;
    };

    if let Some(n) = mode.color_channels() {
        for v in densities.iter_mut().take(n) {
            *v = v.clamp(0.0, 1.0);
        }
        return;
    }

    let mut total = 0.0;
    for v in densities.iter_mut() {
        *v = v.clamp(0.0, 1.0);
        total += *v;
    }
    if total > 1.0 {
        let scale = 1.0 / total;
        for v in densities.iter_mut() {
            *v *= scale;
        }
    }
}

/// Write `requested - printed` into `error` for every density channel.
///
/// `error[0]` is set to zero: the distance channel carries no residual.
/// All three slices must have the same length.
pub fn residual(requested: &[f64], printed: &[f64], error: &mut [f64]) {
    debug_assert_eq!(requested.len(), printed.len());
    debug_assert_eq!(requested.len(), error.len());

    if let Some(first) = error.first_mut() {
        *first = 0.0;
    }
    for ((e, r), p) in error.iter_mut().zip(requested).zip(printed).skip(1) {
        *e = r - p;
    }
}
