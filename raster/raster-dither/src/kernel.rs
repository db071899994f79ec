//! Error-diffusion kernels.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One diffusion target relative to the current pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Column offset.
    pub dx: i64,
    /// Row offset (towards rows not yet scanned).
    pub dy: i64,
    /// Share of the residual sent to this target.
    pub weight: f64,
}

impl Tap {
    const fn new(dx: i64, dy: i64, weight: f64) -> Self {
        Self { dx, dy, weight }
    }
}

const FLOYD_STEINBERG: [Tap; 4] = [
    Tap::new(1, 0, 7.0 / 16.0),
    Tap::new(0, 1, 5.0 / 16.0),
    Tap::new(1, 1, 1.0 / 16.0),
    Tap::new(-1, 1, 3.0 / 16.0),
];
const X_AXIS: [Tap; 1] = [Tap::new(1, 0, 1.0)];
const Y_AXIS: [Tap; 1] = [Tap::new(0, 1, 1.0)];
const XY: [Tap; 3] = [
    Tap::new(1, 0, 0.5),
    Tap::new(0, 1, 0.3),
    Tap::new(1, 1, 0.2),
];

/// How the quantization residual of a pixel is spread to its neighbors.
///
/// # Example
///
/// ```
/// use raster_dither::DitherKernel;
///
/// let kernel: DitherKernel = "floyd-steinberg".parse().unwrap();
/// assert_eq!(kernel, DitherKernel::FloydSteinberg);
/// assert_eq!(kernel.taps().len(), 4);
/// assert_eq!(DitherKernel::from_code(-1), Some(DitherKernel::None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DitherKernel {
    /// Residual is discarded.
    None,
    /// 7/16 right, 5/16 below, 1/16 below-right, 3/16 below-left.
    #[default]
    FloydSteinberg,
    /// Everything to the right.
    XAxis,
    /// Everything below.
    YAxis,
    /// 0.5 right, 0.3 below, 0.2 below-right.
    Xy,
}

impl DitherKernel {
    /// All kernels.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::FloydSteinberg,
        Self::XAxis,
        Self::YAxis,
        Self::Xy,
    ];

    /// Diffusion targets of this kernel.
    #[must_use]
    pub const fn taps(self) -> &'static [Tap] {
        match self {
            Self::None => &[],
            Self::FloydSteinberg => &FLOYD_STEINBERG,
            Self::XAxis => &X_AXIS,
            Self::YAxis => &Y_AXIS,
            Self::Xy => &XY,
        }
    }

    /// Sum of tap weights (1.0 for every kernel except [`DitherKernel::None`]).
    #[must_use]
    pub fn total_weight(self) -> f64 {
        self.taps().iter().map(|t| t.weight).sum()
    }

    /// Kernel for a legacy integer dithering type.
    ///
    /// `-1` none, `0` Floyd–Steinberg, `1` x-axis, `2` y-axis, `3` xy.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::None),
            0 => Some(Self::FloydSteinberg),
            1 => Some(Self::XAxis),
            2 => Some(Self::YAxis),
            3 => Some(Self::Xy),
            _ => None,
        }
    }

    /// Legacy integer dithering type of this kernel.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => -1,
            Self::FloydSteinberg => 0,
            Self::XAxis => 1,
            Self::YAxis => 2,
            Self::Xy => 3,
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FloydSteinberg => "floyd-steinberg",
            Self::XAxis => "x-axis",
            Self::YAxis => "y-axis",
            Self::Xy => "xy",
        }
    }
}

impl fmt::Display for DitherKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DitherKernel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Some(kernel) = Self::ALL.into_iter().find(|k| k.as_str() == name) {
            return Ok(kernel);
        }
        name.parse::<i32>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| format!("unknown dithering mode: {s}"))
    }
}
