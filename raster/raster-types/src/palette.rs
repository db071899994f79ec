//! Named print materials and the per-run palette.

use tracing::warn;

use crate::color::Rgba8;
use crate::error::{RasterError, RasterResult};

/// Built-in PolyJet materials and their preview colors.
pub const REGISTRY: [(&str, Rgba8); 6] = [
    ("VeroPureWht", Rgba8::new(240, 240, 240, 255)),
    ("VeroBlack", Rgba8::new(26, 26, 29, 255)),
    ("VeroCyan", Rgba8::new(0, 90, 158, 255)),
    ("VeroYellow", Rgba8::new(200, 189, 3, 255)),
    ("VeroMgnt", Rgba8::new(166, 33, 98, 255)),
    ("VeroClear", Rgba8::new(227, 233, 253, 50)),
];

/// Look up the color of a registered material.
///
/// Names are case-sensitive.
#[must_use]
pub fn lookup_material(name: &str) -> Option<Rgba8> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, color)| *color)
}

/// A single palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Requested material name.
    pub name: String,

    /// Output color; [`Rgba8::ERROR`] when the name is not registered.
    pub color: Rgba8,

    /// One-hot density signature of this material (length = material count).
    pub basis: Vec<f64>,
}

/// The ordered set of materials used for one run.
///
/// Index 0 is the background material. The palette is immutable once built and
/// is shared read-only between layer workers.
///
/// # Example
///
/// ```
/// use raster_types::{Palette, Rgba8};
///
/// let palette = Palette::from_names(&["VeroPureWht", "VeroCyan", "NoSuchResin"]).unwrap();
/// assert_eq!(palette.material_count(), 3);
/// assert_eq!(palette.color(2), Rgba8::ERROR);
/// assert_eq!(palette.unknown_names(), ["NoSuchResin".to_string()]);
/// assert_eq!(palette.basis(1), &[0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    materials: Vec<Material>,
    argb: Vec<u32>,
    unknown: Vec<String>,
}

impl Palette {
    /// Build a palette from an ordered list of material names.
    ///
    /// Unknown names do not fail the build: they receive [`Rgba8::ERROR`] and
    /// are logged as warnings and kept in [`Palette::unknown_names`].
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::NoMaterials`] if `names` is empty.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> RasterResult<Self> {
        if names.is_empty() {
            return Err(RasterError::NoMaterials);
        }

        let count = names.len();
        let mut unknown = Vec::new();
        let materials: Vec<Material> = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let name = name.as_ref();
                let color = lookup_material(name).unwrap_or_else(|| {
                    warn!(material = name, index, "Unknown material, using error color");
                    unknown.push(name.to_string());
                    Rgba8::ERROR
                });
                let mut basis = vec![0.0; count];
                basis[index] = 1.0;
                Material {
                    name: name.to_string(),
                    color,
                    basis,
                }
            })
            .collect();

        let argb = materials.iter().map(|m| m.color.to_argb()).collect();

        Ok(Self {
            materials,
            argb,
            unknown,
        })
    }

    /// Number of materials, which is also the voxel channel count.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// All entries in palette order.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Color of material `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn color(&self, index: usize) -> Rgba8 {
        self.materials[index].color
    }

    /// Packed ARGB color of material `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn argb(&self, index: usize) -> u32 {
        self.argb[index]
    }

    /// Basis density vector of material `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn basis(&self, index: usize) -> &[f64] {
        &self.materials[index].basis
    }

    /// Requested names that were not found in the registry.
    #[must_use]
    pub fn unknown_names(&self) -> &[String] {
        &self.unknown
    }
}
