//! Colour type, parsing and blending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpriteError, Result};

/// An RGBA colour value (straight, non-premultiplied alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Magenta (used for missing/error placeholders).
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RGBA` (4 digits, expanded to 8)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let digits = hex
            .chars()
            .map(parse_hex_digit)
            .collect::<Result<Vec<u8>>>()?;

        match digits.as_slice() {
            &[r, g, b] => Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b)),
            &[r, g, b, a] => Ok(Self::new(r << 4 | r, g << 4 | g, b << 4 | b, a << 4 | a)),
            &[r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
            &[r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::new(
                r1 << 4 | r0,
                g1 << 4 | g0,
                b1 << 4 | b0,
                a1 << 4 | a0,
            )),
            _ => Err(SpriteError::Config {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
            }),
        }
    }

    /// Convert to RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Same colour with a replaced alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Multiply the alpha channel by `factor` (clamped to [0, 1]).
    pub fn scale_alpha(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        self.with_alpha((self.a as f64 * factor).round() as u8)
    }

    /// Composite `src` over `self` (source-over) with an extra opacity factor.
    pub fn blend_over(self, src: Colour, opacity: f64) -> Colour {
        let sa = src.a as f64 / 255.0 * opacity.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return self;
        }
        let da = self.a as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Colour::TRANSPARENT;
        }

        let channel = |s: u8, d: u8| {
            let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };

        Colour::new(
            channel(src.r, self.r),
            channel(src.g, self.g),
            channel(src.b, self.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }
}

impl FromStr for Colour {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = SpriteError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| SpriteError::Config {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}
