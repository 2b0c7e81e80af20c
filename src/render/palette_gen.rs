//! Builtin genre palette generator.
//!
//! Palettes are built in HSL space around a per-genre base hue, with a
//! small seeded jitter so two seeds of the same genre stay recognisably
//! related but distinct.

use palette::{Hsl, IntoColor, Srgb};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SpriteError};
use crate::types::{Colour, Genre, GenrePalette};

/// Source of themed palettes.
pub trait PaletteSource: Send + Sync {
    /// Derive a palette for `genre_id` and `seed`.
    fn generate(&self, genre_id: &str, seed: i64) -> Result<GenrePalette>;
}

/// HSL-based palette generator covering the builtin genres.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenrePaletteGenerator;

/// Base hue (degrees), saturation and lightness for a genre.
fn genre_base(genre: Genre) -> (f32, f32, f32) {
    match genre {
        Genre::Fantasy => (30.0, 0.55, 0.45),
        Genre::SciFi => (200.0, 0.6, 0.5),
        Genre::Horror => (350.0, 0.35, 0.3),
        Genre::Cyberpunk => (300.0, 0.85, 0.55),
        Genre::PostApocalyptic => (40.0, 0.3, 0.4),
    }
}

fn hsl(hue: f32, saturation: f32, lightness: f32, alpha: u8) -> Colour {
    let hsl = Hsl::new(
        hue.rem_euclid(360.0),
        saturation.clamp(0.0, 1.0),
        lightness.clamp(0.0, 1.0),
    );
    let rgb: Srgb<f32> = hsl.into_color();
    Colour::new(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        alpha,
    )
}

impl PaletteSource for GenrePaletteGenerator {
    fn generate(&self, genre_id: &str, seed: i64) -> Result<GenrePalette> {
        let genre = Genre::parse(genre_id).ok_or_else(|| SpriteError::Palette {
            genre: genre_id.to_string(),
            message: "unknown genre".to_string(),
        })?;

        let (base_hue, base_sat, base_light) = genre_base(genre);
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let hue = base_hue + rng.gen_range(-15.0..15.0f32);
        let sat = base_sat + rng.gen_range(-0.08..0.08f32);
        let light = base_light + rng.gen_range(-0.05..0.05f32);

        let colours = (0..6)
            .map(|i| hsl(hue + 45.0 * i as f32, sat, light + 0.05 * (i % 3) as f32, 255))
            .collect();

        Ok(GenrePalette {
            primary: hsl(hue, sat, light, 255),
            secondary: hsl(hue + 30.0, sat * 0.9, light - 0.1, 255),
            accent1: hsl(hue + 150.0, sat, light + 0.05, 255),
            accent2: hsl(hue + 180.0, sat, light, 255),
            accent3: hsl(hue + 210.0, sat * 1.1, light + 0.1, 255),
            highlight1: hsl(hue, sat * 0.9, light + 0.3, 255),
            highlight2: hsl(hue + 60.0, sat, light + 0.25, 255),
            shadow: hsl(hue, 0.2, 0.08, 110),
            background: hsl(hue, sat * 0.3, 0.12, 255),
            colours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_deterministic() {
        let gen = GenrePaletteGenerator;
        let a = gen.generate("fantasy", 42).unwrap();
        let b = gen.generate("fantasy", 42).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, gen.generate("fantasy", 43).unwrap());
    }

    #[test]
    fn test_empty_genre_is_fantasy() {
        let gen = GenrePaletteGenerator;
        assert_eq!(gen.generate("", 9).unwrap(), gen.generate("fantasy", 9).unwrap());
    }

    #[test]
    fn test_unknown_genre_fails() {
        let err = GenrePaletteGenerator.generate("western", 1).unwrap_err();
        assert!(matches!(err, SpriteError::Palette { ref genre, .. } if genre == "western"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_shadow_is_translucent() {
        let p = GenrePaletteGenerator.generate("horror", 5).unwrap();
        assert_eq!(p.shadow.a, 110);
        assert!(p.primary.is_opaque());
        assert_eq!(p.colours.len(), 6);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5, 255), Colour::rgb(255, 0, 0));
        assert_eq!(hsl(120.0, 1.0, 0.5, 255), Colour::rgb(0, 255, 0));
        assert_eq!(hsl(0.0, 0.0, 1.0, 7), Colour::new(255, 255, 255, 7));
    }
}
