//! Primitive shape kinds understood by the rasterizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// A closed set of geometric primitives.
///
/// `Organic`, `Lightning`, `Wave` and `Spiral` are perturbed by the shape seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Rectangle,
    Triangle,
    Diamond,
    Star,
    Ring,
    Hexagon,
    Cross,
    Crescent,
    Capsule,
    Blade,
    Organic,
    Lightning,
    Wave,
    Spiral,
}

impl ShapeKind {
    /// Every shape kind, in declaration order.
    pub const ALL: [ShapeKind; 16] = [
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Star,
        ShapeKind::Ring,
        ShapeKind::Hexagon,
        ShapeKind::Cross,
        ShapeKind::Crescent,
        ShapeKind::Capsule,
        ShapeKind::Blade,
        ShapeKind::Organic,
        ShapeKind::Lightning,
        ShapeKind::Wave,
        ShapeKind::Spiral,
    ];

    /// The shape's lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Star => "star",
            ShapeKind::Ring => "ring",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Cross => "cross",
            ShapeKind::Crescent => "crescent",
            ShapeKind::Capsule => "capsule",
            ShapeKind::Blade => "blade",
            ShapeKind::Organic => "organic",
            ShapeKind::Lightning => "lightning",
            ShapeKind::Wave => "wave",
            ShapeKind::Spiral => "spiral",
        }
    }

    /// Whether the outline depends on the shape seed.
    pub fn is_seeded(self) -> bool {
        matches!(
            self,
            ShapeKind::Organic | ShapeKind::Lightning | ShapeKind::Wave | ShapeKind::Spiral
        )
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SpriteError::Config {
                message: format!("Unknown shape kind: '{}'", s),
                help: Some(
                    "Use one of the builtin shape kinds, e.g. circle, rectangle, star".to_string(),
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.as_str().parse::<ShapeKind>().unwrap(), kind);
        }
        assert_eq!(" Star ".parse::<ShapeKind>().unwrap(), ShapeKind::Star);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("blob".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_seeded_kinds() {
        let seeded: Vec<ShapeKind> = ShapeKind::ALL.into_iter().filter(|k| k.is_seeded()).collect();
        assert_eq!(
            seeded,
            vec![ShapeKind::Organic, ShapeKind::Lightning, ShapeKind::Wave, ShapeKind::Spiral]
        );
    }
}
