//! Item layouts with rarity embellishments.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::{ColourRole, Rarity, ShapeKind};

use super::PartSpec;

use ShapeKind::*;

/// A named item part. Declaration order breaks Z-index ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPart {
    Aura,
    Shaft,
    Handle,
    Body,
    Blade,
    Guard,
    Head,
    Cap,
    Band,
    Trim,
    Gem,
    Sparkle,
}

impl ItemPart {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemPart::Aura => "aura",
            ItemPart::Shaft => "shaft",
            ItemPart::Handle => "handle",
            ItemPart::Body => "body",
            ItemPart::Blade => "blade",
            ItemPart::Guard => "guard",
            ItemPart::Head => "head",
            ItemPart::Cap => "cap",
            ItemPart::Band => "band",
            ItemPart::Trim => "trim",
            ItemPart::Gem => "gem",
            ItemPart::Sparkle => "sparkle",
        }
    }
}

impl fmt::Display for ItemPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parts of one item sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemLayout {
    pub name: String,
    parts: BTreeMap<ItemPart, PartSpec>,
}

impl ItemLayout {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: BTreeMap::new(),
        }
    }

    fn with(mut self, part: ItemPart, spec: PartSpec) -> Self {
        self.parts.insert(part, spec);
        self
    }

    pub fn part(&self, part: ItemPart) -> Option<&PartSpec> {
        self.parts.get(&part)
    }

    pub fn has_part(&self, part: ItemPart) -> bool {
        self.parts.contains_key(&part)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts sorted by ascending Z-index; ties keep part declaration order.
    pub fn draw_order(&self) -> Vec<(ItemPart, &PartSpec)> {
        let mut parts: Vec<(ItemPart, &PartSpec)> =
            self.parts.iter().map(|(&p, s)| (p, s)).collect();
        parts.sort_by_key(|(_, spec)| spec.z_index);
        parts
    }

    /// The part rarity embellishments hang off.
    fn anchor(&self) -> Option<&PartSpec> {
        [
            ItemPart::Guard,
            ItemPart::Head,
            ItemPart::Body,
            ItemPart::Blade,
            ItemPart::Band,
            ItemPart::Shaft,
        ]
        .iter()
        .find_map(|p| self.parts.get(p))
    }
}

fn spec(
    center: (f64, f64),
    size: (f64, f64),
    shapes: &[ShapeKind],
    z: i32,
    role: ColourRole,
) -> PartSpec {
    PartSpec::new(center, size, shapes, z, role)
}

fn base_layout(item_type: &str) -> ItemLayout {
    use ColourRole::*;
    use ItemPart::*;

    match item_type.trim().to_ascii_lowercase().as_str() {
        "sword" | "dagger" | "blade" => ItemLayout::new("sword")
            .with(Blade, spec((0.5, 0.4), (0.14, 0.6), &[ShapeKind::Blade], 20, Highlight1))
            .with(Guard, spec((0.5, 0.72), (0.4, 0.07), &[Rectangle, Capsule], 30, Secondary))
            .with(Handle, spec((0.5, 0.84), (0.08, 0.18), &[Rectangle], 10, Accent1)),
        "axe" | "hammer" | "mace" => ItemLayout::new("axe")
            .with(Shaft, spec((0.5, 0.55), (0.08, 0.8), &[Rectangle], 10, Accent1))
            .with(Head, spec((0.62, 0.28), (0.38, 0.32), &[Crescent, Diamond], 30, Highlight1)),
        "bow" => ItemLayout::new("bow")
            .with(Body, spec((0.45, 0.5), (0.35, 0.85), &[Crescent], 20, Primary))
            .with(Band, spec((0.62, 0.5), (0.03, 0.8), &[Rectangle], 25, Highlight2))
            .with(Handle, spec((0.33, 0.5), (0.08, 0.16), &[Rectangle], 30, Accent1)),
        "staff" => ItemLayout::new("staff")
            .with(Shaft, spec((0.5, 0.58), (0.08, 0.8), &[Rectangle, Capsule], 10, Accent1))
            .with(Head, spec((0.5, 0.16), (0.24, 0.24), &[Circle, Star, Diamond], 30, Accent3)),
        "wand" => ItemLayout::new("wand")
            .with(Shaft, spec((0.5, 0.6), (0.06, 0.6), &[Capsule], 10, Accent1))
            .with(Head, spec((0.5, 0.26), (0.14, 0.14), &[Star, Circle], 30, Highlight1)),
        "potion" | "flask" => ItemLayout::new("potion")
            .with(
                Body,
                spec((0.5, 0.62), (0.56, 0.56), &[Circle, Ellipse], 20, Primary).with_opacity(0.9),
            )
            .with(Handle, spec((0.5, 0.28), (0.18, 0.16), &[Rectangle], 10, Secondary))
            .with(Cap, spec((0.5, 0.18), (0.22, 0.08), &[Rectangle, Capsule], 35, Accent1)),
        "shield" => ItemLayout::new("shield")
            .with(Body, spec((0.5, 0.5), (0.7, 0.8), &[Hexagon, Circle, Diamond], 20, Primary))
            .with(Band, spec((0.5, 0.5), (0.12, 0.8), &[Rectangle], 25, Secondary))
            .with(Cap, spec((0.5, 0.5), (0.18, 0.18), &[Circle], 35, Accent1)),
        "armor" | "armour" => ItemLayout::new("armor")
            .with(Body, spec((0.5, 0.52), (0.7, 0.7), &[Rectangle, Hexagon], 20, Primary))
            .with(Band, spec((0.5, 0.6), (0.7, 0.1), &[Rectangle], 25, Secondary))
            .with(Guard, spec((0.5, 0.24), (0.8, 0.16), &[Capsule], 30, Accent1)),
        "helmet" | "helm" => ItemLayout::new("helmet")
            .with(Body, spec((0.5, 0.5), (0.64, 0.56), &[Crescent, Circle], 20, Primary))
            .with(Band, spec((0.5, 0.6), (0.64, 0.1), &[Rectangle], 25, Secondary))
            .with(Cap, spec((0.5, 0.2), (0.1, 0.2), &[Triangle], 35, Accent1)),
        "ring" => ItemLayout::new("ring")
            .with(Band, spec((0.5, 0.56), (0.56, 0.56), &[Ring], 25, Secondary))
            .with(Head, spec((0.5, 0.28), (0.22, 0.2), &[Diamond, Circle], 30, Accent3)),
        "amulet" | "necklace" => ItemLayout::new("amulet")
            .with(Band, spec((0.5, 0.32), (0.6, 0.5), &[Crescent, ShapeKind::Ring], 25, Secondary))
            .with(Head, spec((0.5, 0.66), (0.34, 0.34), &[Circle, Diamond, Hexagon], 30, Primary)),
        "gem" | "jewel" | "crystal" => ItemLayout::new("gem")
            .with(Body, spec((0.5, 0.5), (0.6, 0.66), &[Diamond, Hexagon, Circle], 20, Accent3)),
        "scroll" => ItemLayout::new("scroll")
            .with(Body, spec((0.5, 0.5), (0.6, 0.7), &[Rectangle], 20, Primary))
            .with(Cap, spec((0.5, 0.16), (0.72, 0.1), &[Capsule], 35, Secondary))
            .with(Band, spec((0.5, 0.84), (0.72, 0.1), &[Capsule], 25, Secondary)),
        "key" => ItemLayout::new("key")
            .with(Shaft, spec((0.5, 0.6), (0.08, 0.6), &[Rectangle], 10, Primary))
            .with(Head, spec((0.5, 0.22), (0.26, 0.26), &[Ring, Circle], 30, Primary))
            .with(Guard, spec((0.6, 0.82), (0.16, 0.08), &[Rectangle], 30, Primary)),
        _ => ItemLayout::new("trinket")
            .with(Body, spec((0.5, 0.5), (0.5, 0.5), &[Circle, Star, Hexagon], 20, Primary)),
    }
}

/// Layout for `item_type`, embellished cumulatively by rarity tier.
pub(super) fn layout(item_type: &str, rarity: Rarity) -> ItemLayout {
    let mut layout = base_layout(item_type);
    let Some(anchor) = layout.anchor().cloned() else {
        return layout;
    };

    if rarity >= Rarity::Uncommon {
        let trim = PartSpec {
            z_index: anchor.z_index - 1,
            colour_role: ColourRole::Highlight2,
            opacity: 0.8,
            ..anchor.scaled_size(1.15)
        };
        layout.parts.insert(ItemPart::Trim, trim);
    }
    if rarity >= Rarity::Rare {
        let gem = spec(
            (anchor.center_x, anchor.center_y),
            (0.12, 0.12),
            &[Diamond, Circle],
            60,
            ColourRole::Accent3,
        );
        layout.parts.insert(ItemPart::Gem, gem);
    }
    if rarity >= Rarity::Epic {
        let aura = spec((0.5, 0.5), (0.9, 0.9), &[Circle, Ring], 0, ColourRole::Highlight1)
            .with_opacity(0.35);
        layout.parts.insert(ItemPart::Aura, aura);
    }
    if rarity >= Rarity::Legendary {
        let sparkle = spec((0.78, 0.2), (0.18, 0.18), &[Star], 70, ColourRole::Highlight2);
        layout.parts.insert(ItemPart::Sparkle, sparkle);
    }

    if rarity > Rarity::Common {
        layout.name = format!("{}-{:?}", layout.name, rarity).to_ascii_lowercase();
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_item_is_trinket() {
        assert_eq!(layout("frying pan", Rarity::Common).name, "trinket");
        assert_eq!(layout("", Rarity::Common).name, "trinket");
    }

    #[test]
    fn test_rarity_is_cumulative() {
        let counts: Vec<usize> = [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
        .iter()
        .map(|&r| layout("sword", r).len())
        .collect();
        assert_eq!(counts, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_legendary_draw_order() {
        let sword = layout("sword", Rarity::Legendary);
        let names: Vec<&str> = sword.draw_order().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            names,
            vec!["aura", "handle", "blade", "trim", "guard", "gem", "sparkle"]
        );
        assert_eq!(sword.name, "sword-legendary");
    }

    #[test]
    fn test_gem_sits_on_anchor() {
        let staff = layout("staff", Rarity::Rare);
        let head = staff.part(ItemPart::Head).unwrap();
        let gem = staff.part(ItemPart::Gem).unwrap();
        assert_eq!((gem.center_x, gem.center_y), (head.center_x, head.center_y));
    }

    #[test]
    fn test_layouts_stay_in_bounds() {
        for item in [
            "sword", "axe", "bow", "staff", "wand", "potion", "shield", "armor", "helmet",
            "ring", "amulet", "gem", "scroll", "key", "other",
        ] {
            let l = layout(item, Rarity::Legendary);
            for (part, s) in l.draw_order() {
                assert!(s.width > 0.0 && s.width <= 1.0, "{} {}", item, part);
                assert!(s.height > 0.0 && s.height <= 1.0, "{} {}", item, part);
                assert!((0.0..=1.0).contains(&s.center_x), "{} {}", item, part);
                assert!(!s.shapes.is_empty());
            }
        }
    }
}
