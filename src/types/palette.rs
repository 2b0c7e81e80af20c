//! Themed colour sets and symbolic colour roles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Colour;

/// A symbolic colour slot resolved against a [`GenrePalette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColourRole {
    Primary,
    Secondary,
    Accent1,
    Accent2,
    Accent3,
    Highlight1,
    Highlight2,
    Shadow,
}

impl ColourRole {
    /// All roles, in declaration order.
    pub const ALL: [ColourRole; 8] = [
        ColourRole::Primary,
        ColourRole::Secondary,
        ColourRole::Accent1,
        ColourRole::Accent2,
        ColourRole::Accent3,
        ColourRole::Highlight1,
        ColourRole::Highlight2,
        ColourRole::Shadow,
    ];

    /// The role's lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ColourRole::Primary => "primary",
            ColourRole::Secondary => "secondary",
            ColourRole::Accent1 => "accent1",
            ColourRole::Accent2 => "accent2",
            ColourRole::Accent3 => "accent3",
            ColourRole::Highlight1 => "highlight1",
            ColourRole::Highlight2 => "highlight2",
            ColourRole::Shadow => "shadow",
        }
    }
}

impl fmt::Display for ColourRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A themed colour set derived from a genre and seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenrePalette {
    pub primary: Colour,
    pub secondary: Colour,
    pub accent1: Colour,
    pub accent2: Colour,
    pub accent3: Colour,
    pub highlight1: Colour,
    pub highlight2: Colour,
    pub shadow: Colour,
    pub background: Colour,
    /// Extra colours for detail shapes and particles.
    pub colours: Vec<Colour>,
}

impl GenrePalette {
    /// Resolve a colour role.
    pub fn resolve(&self, role: ColourRole) -> Colour {
        match role {
            ColourRole::Primary => self.primary,
            ColourRole::Secondary => self.secondary,
            ColourRole::Accent1 => self.accent1,
            ColourRole::Accent2 => self.accent2,
            ColourRole::Accent3 => self.accent3,
            ColourRole::Highlight1 => self.highlight1,
            ColourRole::Highlight2 => self.highlight2,
            ColourRole::Shadow => self.shadow,
        }
    }

    /// Pick an extra colour by index, wrapping; falls back to the primary colour.
    pub fn colour_at(&self, index: usize) -> Colour {
        if self.colours.is_empty() {
            self.primary
        } else {
            self.colours[index % self.colours.len()]
        }
    }

    /// A flat monochrome palette, handy for tests and debug rendering.
    pub fn monochrome(colour: Colour) -> Self {
        Self {
            primary: colour,
            secondary: colour,
            accent1: colour,
            accent2: colour,
            accent3: colour,
            highlight1: colour,
            highlight2: colour,
            shadow: Colour::new(0, 0, 0, 96),
            background: Colour::TRANSPARENT,
            colours: vec![colour],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_role() {
        let mut palette = GenrePalette::monochrome(Colour::WHITE);
        palette.accent2 = Colour::rgb(1, 2, 3);

        assert_eq!(palette.resolve(ColourRole::Accent2), Colour::rgb(1, 2, 3));
        assert_eq!(palette.resolve(ColourRole::Primary), Colour::WHITE);
        assert_eq!(palette.resolve(ColourRole::Shadow).a, 96);
    }

    #[test]
    fn test_colour_at_wraps() {
        let mut palette = GenrePalette::monochrome(Colour::WHITE);
        palette.colours = vec![Colour::BLACK, Colour::MAGENTA];

        assert_eq!(palette.colour_at(0), Colour::BLACK);
        assert_eq!(palette.colour_at(3), Colour::MAGENTA);

        palette.colours.clear();
        assert_eq!(palette.colour_at(7), Colour::WHITE);
    }

    #[test]
    fn test_role_names() {
        let names: Vec<&str> = ColourRole::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(ColourRole::Highlight1.to_string(), "highlight1");
    }
}
