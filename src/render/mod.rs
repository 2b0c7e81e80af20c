//! Rendering: shape rasterization, palettes and the two composition engines.

mod composite;
mod composition;
mod palette_gen;
mod raster;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use composite::CompositeEngine;
pub use composition::{CompositionEngine, PlannedShape, TEMPLATE_COMPLEXITY_THRESHOLD};
pub use palette_gen::{GenrePaletteGenerator, PaletteSource};
pub use raster::{GeometricRasterizer, RasterParams, ShapeRasterizer, ShapeStyle, ShapeWindow};

/// Deterministic random stream for a request's seed and variation.
pub(crate) fn request_rng(seed: i64, variation: i64) -> ChaCha8Rng {
    let mixed = (seed as u64) ^ (variation as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    ChaCha8Rng::seed_from_u64(mixed)
}
