//! Stable cache keys.
//!
//! Keys are 128-bit xxh3 digests over a fixed field order. Custom
//! parameters come from a `BTreeMap`, so they are always folded in
//! lexicographic key order.

use xxhash_rust::xxh3::Xxh3;

use crate::types::{
    Colour, CompositeRequest, GenrePalette, ParamValue, SpriteRequest,
};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Domain tags keep sprite and composite keys apart.
const TAG_SPRITE: u8 = 0x53;
const TAG_COMPOSITE: u8 = 0x43;

/// Deterministic identity of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub hi: u64,
    pub lo: u64,
}

impl CacheKey {
    /// Key over kind, size, seed, genre, complexity, variation, custom parameters and palette.
    pub fn from_request(request: &SpriteRequest) -> Self {
        let mut h = StableHasher::new();
        h.write_u8(TAG_SPRITE);
        write_request(&mut h, request);
        h.finish()
    }

    /// Key over the base request followed by every layer, equipment item and effect.
    pub fn from_composite(request: &CompositeRequest) -> Self {
        let mut h = StableHasher::new();
        h.write_u8(TAG_COMPOSITE);
        write_request(&mut h, &request.base);

        h.write_u32(request.layers.len() as u32);
        for layer in &request.layers {
            h.write_str(layer.kind.as_str());
            h.write_i64(layer.z_index as i64);
            h.write_i64(layer.offset_x as i64);
            h.write_i64(layer.offset_y as i64);
            h.write_f64(layer.scale);
            match layer.tint {
                Some(tint) => {
                    h.write_u8(1);
                    h.write_colour(tint);
                }
                None => h.write_u8(0),
            }
            h.write_bool(layer.visible);
            h.write_i64(layer.seed);
            h.write_str(layer.shape.as_str());
        }

        h.write_u32(request.equipment.len() as u32);
        for item in &request.equipment {
            h.write_str(&format!("{:?}", item.slot));
            h.write_str(&item.item_id);
            h.write_i64(item.seed);
            h.write_str(item.layer.as_str());
        }

        h.write_u32(request.effects.len() as u32);
        for effect in &request.effects {
            h.write_str(&format!("{:?}", effect.kind));
            h.write_f64(effect.intensity);
            h.write_colour(effect.resolved_colour());
            h.write_u32(effect.particle_count);
        }
        h.finish()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

fn write_request(h: &mut StableHasher, request: &SpriteRequest) {
    h.write_u8(request.kind.tag());
    h.write_u32(request.width);
    h.write_u32(request.height);
    h.write_i64(request.seed);
    h.write_str(&request.genre_id);
    h.write_f64(request.complexity);
    h.write_i64(request.variation);

    h.write_u32(request.custom.len() as u32);
    for (key, value) in &request.custom {
        h.write_str(key);
        write_param(h, value);
    }

    match &request.palette {
        Some(palette) => {
            h.write_u8(1);
            write_palette(h, palette);
        }
        None => h.write_u8(0),
    }
}

fn write_param(h: &mut StableHasher, value: &ParamValue) {
    match value {
        ParamValue::Bool(b) => {
            h.write_u8(0);
            h.write_bool(*b);
        }
        ParamValue::Int(i) => {
            h.write_u8(1);
            h.write_i64(*i);
        }
        ParamValue::Float(f) => {
            h.write_u8(2);
            h.write_f64(*f);
        }
        ParamValue::Str(s) => {
            h.write_u8(3);
            h.write_str(s);
        }
    }
}

fn write_palette(h: &mut StableHasher, palette: &GenrePalette) {
    for colour in [
        palette.primary,
        palette.secondary,
        palette.accent1,
        palette.accent2,
        palette.accent3,
        palette.highlight1,
        palette.highlight2,
        palette.shadow,
        palette.background,
    ] {
        h.write_colour(colour);
    }
    h.write_u32(palette.colours.len() as u32);
    for &colour in &palette.colours {
        h.write_colour(colour);
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_bytes(&v.to_bits().to_le_bytes());
    }

    /// Length-prefixed so adjacent strings cannot run together.
    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn write_colour(&mut self, c: Colour) {
        self.write_bytes(&c.to_rgba());
    }

    fn finish(self) -> CacheKey {
        let v = self.inner.digest128();
        CacheKey {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}
