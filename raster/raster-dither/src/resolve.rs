//! Closest-material resolution.

/// Combined foreground density at which the densest foreground material wins.
pub const BACKGROUND_THRESHOLD: f64 = 0.5;

/// Outcome of resolving one voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The voxel lies outside the model (positive signed distance).
    Outside,
    /// Index of the palette material to print.
    Material(usize),
}

impl Resolution {
    /// Material index, if the voxel is inside the model.
    #[must_use]
    pub const fn material(self) -> Option<usize> {
        match self {
            Self::Outside => None,
            Self::Material(index) => Some(index),
        }
    }
}

/// Pick the single material to print for a normalized voxel.
///
/// - channel 0 > 0: [`Resolution::Outside`]
/// - otherwise, when the densities of materials `1..n` sum to at least
///   [`BACKGROUND_THRESHOLD`], the densest of them wins; ties go to the lowest
///   index
/// - otherwise the background material 0 wins
///
/// # Example
///
/// ```
/// use raster_dither::{Resolution, find_closest_material};
///
/// assert_eq!(find_closest_material(&[1.0, 0.9]), Resolution::Outside);
/// assert_eq!(find_closest_material(&[-1.0, 0.2, 0.4]), Resolution::Material(2));
/// assert_eq!(find_closest_material(&[-1.0, 0.2, 0.2]), Resolution::Material(0));
/// ```
#[must_use]
pub fn find_closest_material(voxel: &[f64]) -> Resolution {
    if voxel.first().is_some_and(|&distance| distance > 0.0) {
        return Resolution::Outside;
    }

    let mut max_density = 0.0;
    let mut max_index = 0;
    let mut sum = 0.0;
    for (index, &density) in voxel.iter().enumerate().skip(1) {
        sum += density;
        if density > max_density {
            max_density = density;
            max_index = index;
        }
    }

    if sum >= BACKGROUND_THRESHOLD {
        Resolution::Material(max_index)
    } else {
        Resolution::Material(0)
    }
}
