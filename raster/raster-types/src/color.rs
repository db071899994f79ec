//! Material colors and ARGB packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Packed color written for pixels outside the model (opaque black).
pub const OUTSIDE_ARGB: u32 = 0xFF00_0000;

/// An 8-bit RGBA color.
///
/// # Example
///
/// ```
/// use raster_types::Rgba8;
///
/// let red = Rgba8::new(255, 0, 0, 255);
/// assert_eq!(red.to_argb(), 0xFFFF_0000);
/// assert_eq!(Rgba8::from_argb(red.to_argb()), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Color used for material names missing from the registry.
    pub const ERROR: Self = Self::new(255, 0, 0, 255);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack into `0xAARRGGBB`.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from `0xAARRGGBB`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Channels in RGBA byte order.
    #[must_use]
    pub const fn to_rgba_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
