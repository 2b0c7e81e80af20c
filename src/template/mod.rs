//! Anatomical templates.
//!
//! A template maps body parts to placement specs expressed as fractions of
//! the sprite size. The [`TemplateLibrary`] turns an entity description
//! (type, genre, facing, equipment, boss flag) into a template; the
//! composition engine then renders the parts in Z order.
//!
//! Each [`Archetype`] owns an explicit part set, so tags such as
//! `LeftWing` or `HindLegs` never share a slot with an unrelated meaning.

mod archetypes;
mod boss;
mod humanoid;
mod item;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, SpriteError};
use crate::types::{ColourRole, Direction, Genre, Rarity, ShapeKind, SpriteRequest};

pub use item::{ItemLayout, ItemPart};

/// A named body part. Declaration order breaks Z-index ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Shadow,
    Legs,
    Torso,
    Arms,
    Head,
    Weapon,
    Shield,
    Helmet,
    Armor,
    Tail,
    Wings,
    LeftWing,
    RightWing,
    FrontLegs,
    HindLegs,
    LeftLegs,
    RightLegs,
    Abdomen,
    Core,
    Eyes,
}

impl BodyPart {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyPart::Shadow => "shadow",
            BodyPart::Legs => "legs",
            BodyPart::Torso => "torso",
            BodyPart::Arms => "arms",
            BodyPart::Head => "head",
            BodyPart::Weapon => "weapon",
            BodyPart::Shield => "shield",
            BodyPart::Helmet => "helmet",
            BodyPart::Armor => "armor",
            BodyPart::Tail => "tail",
            BodyPart::Wings => "wings",
            BodyPart::LeftWing => "left_wing",
            BodyPart::RightWing => "right_wing",
            BodyPart::FrontLegs => "front_legs",
            BodyPart::HindLegs => "hind_legs",
            BodyPart::LeftLegs => "left_legs",
            BodyPart::RightLegs => "right_legs",
            BodyPart::Abdomen => "abdomen",
            BodyPart::Core => "core",
            BodyPart::Eyes => "eyes",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renderable body plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Humanoid,
    Quadruped,
    Blob,
    Mechanical,
    Flying,
    Serpentine,
    Arachnid,
    Undead,
}

impl Archetype {
    /// Map an entity type (or alias) to its archetype. Unknown types are humanoid.
    pub fn from_entity_type(entity_type: &str) -> Self {
        match entity_type.trim().to_ascii_lowercase().as_str() {
            "quadruped" | "wolf" | "dog" | "cat" | "horse" | "bear" | "beast" | "deer"
            | "lion" | "boar" => Archetype::Quadruped,
            "blob" | "slime" | "ooze" | "jelly" | "amoeba" => Archetype::Blob,
            "mechanical" | "robot" | "mech" | "drone" | "android" | "turret" | "golem" => {
                Archetype::Mechanical
            }
            "flying" | "bird" | "bat" | "dragon" | "wyvern" | "insect" | "griffin" => {
                Archetype::Flying
            }
            "serpentine" | "snake" | "serpent" | "worm" | "eel" | "naga" => Archetype::Serpentine,
            "arachnid" | "spider" | "scorpion" | "crab" => Archetype::Arachnid,
            "undead" | "zombie" | "skeleton" | "ghost" | "ghoul" | "lich" | "wraith"
            | "vampire" | "mummy" => Archetype::Undead,
            _ => Archetype::Humanoid,
        }
    }

    /// Whether the archetype shares the humanoid body plan (directional, equippable).
    pub fn is_humanoid_family(self) -> bool {
        matches!(self, Archetype::Humanoid | Archetype::Undead)
    }

    /// The parts a template of this archetype may contain.
    pub fn allowed_parts(self) -> &'static [BodyPart] {
        use BodyPart::*;
        match self {
            Archetype::Humanoid => &[
                Shadow, Legs, Torso, Arms, Head, Weapon, Shield, Helmet, Armor, Wings,
            ],
            Archetype::Undead => &[
                Shadow, Legs, Torso, Arms, Head, Eyes, Weapon, Shield, Helmet, Armor,
            ],
            Archetype::Quadruped => &[Shadow, FrontLegs, HindLegs, Torso, Head, Tail, Armor],
            Archetype::Blob => &[Shadow, Torso, Core, Eyes, Armor],
            Archetype::Mechanical => &[Shadow, Legs, Torso, Arms, Head, Core, Weapon, Armor],
            Archetype::Flying => &[Shadow, Torso, Head, Tail, LeftWing, RightWing, Armor],
            Archetype::Serpentine => &[Shadow, Torso, Tail, Head, Eyes, Armor],
            Archetype::Arachnid => &[
                Shadow, LeftLegs, RightLegs, Abdomen, Torso, Head, Eyes, Armor,
            ],
        }
    }
}

/// Placement, shape options, layering and colour for one part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSpec {
    /// Centre as a fraction of sprite width.
    pub center_x: f64,
    /// Centre as a fraction of sprite height.
    pub center_y: f64,
    /// Size as fractions of sprite size.
    pub width: f64,
    pub height: f64,
    /// Acceptable shapes; one is chosen per generation.
    pub shapes: Vec<ShapeKind>,
    pub z_index: i32,
    pub colour_role: ColourRole,
    pub opacity: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
}

impl PartSpec {
    pub fn new(
        center: (f64, f64),
        size: (f64, f64),
        shapes: &[ShapeKind],
        z_index: i32,
        colour_role: ColourRole,
    ) -> Self {
        Self {
            center_x: center.0,
            center_y: center.1,
            width: size.0,
            height: size.1,
            shapes: shapes.to_vec(),
            z_index,
            colour_role,
            opacity: 1.0,
            rotation: 0.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_shapes(mut self, shapes: &[ShapeKind]) -> Self {
        self.shapes = shapes.to_vec();
        self
    }

    /// Scale size and centre offset about the sprite centre.
    pub fn scaled_about_center(&self, scale: f64) -> Self {
        Self {
            center_x: 0.5 + (self.center_x - 0.5) * scale,
            center_y: 0.5 + (self.center_y - 0.5) * scale,
            width: self.width * scale,
            height: self.height * scale,
            ..self.clone()
        }
    }

    /// Scale size only, keeping the centre.
    pub fn scaled_size(&self, scale: f64) -> Self {
        Self {
            width: self.width * scale,
            height: self.height * scale,
            ..self.clone()
        }
    }

    /// Mirror about the vertical centre line.
    pub fn mirrored(&self) -> Self {
        Self {
            center_x: 1.0 - self.center_x,
            rotation: -self.rotation,
            ..self.clone()
        }
    }

    /// Pixel rectangle `(x, y, w, h)` for a sprite of the given size.
    ///
    /// `None` when either dimension rounds to zero or the geometry is not
    /// finite. Sides are capped at `u32::MAX`; the rectangle stays centred.
    pub fn pixel_rect(&self, sprite_w: u32, sprite_h: u32) -> Option<(i64, i64, u32, u32)> {
        if !self.center_x.is_finite() || !self.center_y.is_finite() {
            return None;
        }
        let w = (self.width * sprite_w as f64).round();
        let h = (self.height * sprite_h as f64).round();
        if w < 1.0 || h < 1.0 || !w.is_finite() || !h.is_finite() {
            return None;
        }
        let (w, h) = (w.min(u32::MAX as f64), h.min(u32::MAX as f64));
        let x = (self.center_x * sprite_w as f64 - w / 2.0).round() as i64;
        let y = (self.center_y * sprite_h as f64 - h / 2.0).round() as i64;
        Some((x, y, w as u32, h as u32))
    }
}

/// A named mapping from body parts to part specs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnatomicalTemplate {
    pub name: String,
    pub archetype: Archetype,
    parts: BTreeMap<BodyPart, PartSpec>,
}

impl AnatomicalTemplate {
    pub fn new(name: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            name: name.into(),
            archetype,
            parts: BTreeMap::new(),
        }
    }

    /// Add or replace a part.
    pub fn with_part(mut self, part: BodyPart, spec: PartSpec) -> Self {
        self.parts.insert(part, spec);
        self
    }

    pub fn set_part(&mut self, part: BodyPart, spec: PartSpec) {
        self.parts.insert(part, spec);
    }

    pub fn part(&self, part: BodyPart) -> Option<&PartSpec> {
        self.parts.get(&part)
    }

    pub fn part_mut(&mut self, part: BodyPart) -> Option<&mut PartSpec> {
        self.parts.get_mut(&part)
    }

    pub fn has_part(&self, part: BodyPart) -> bool {
        self.parts.contains_key(&part)
    }

    pub fn parts(&self) -> impl Iterator<Item = (BodyPart, &PartSpec)> {
        self.parts.iter().map(|(&p, s)| (p, s))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts sorted by ascending Z-index; ties keep part declaration order.
    pub fn draw_order(&self) -> Vec<(BodyPart, &PartSpec)> {
        let mut parts: Vec<(BodyPart, &PartSpec)> = self.parts().collect();
        parts.sort_by_key(|(_, spec)| spec.z_index);
        parts
    }

    /// Mirror every part about the vertical centre line.
    pub fn mirrored(&self) -> Self {
        Self {
            name: self.name.clone(),
            archetype: self.archetype,
            parts: self.parts.iter().map(|(&p, s)| (p, s.mirrored())).collect(),
        }
    }

    fn map_parts(&mut self, mut f: impl FnMut(BodyPart, &mut PartSpec)) {
        for (&part, spec) in self.parts.iter_mut() {
            f(part, spec);
        }
    }

    /// Check the part set against the archetype and geometry ranges.
    pub fn validate(&self) -> Result<()> {
        let allowed = self.archetype.allowed_parts();
        for (part, spec) in self.parts() {
            let fail = |message: String| SpriteError::InvalidRequest {
                message: format!("template '{}': {}", self.name, message),
                help: None,
            };
            if !allowed.contains(&part) {
                return Err(fail(format!("part '{}' is not valid for {:?}", part, self.archetype)));
            }
            if spec.shapes.is_empty() {
                return Err(fail(format!("part '{}' has no shapes", part)));
            }
            let in_unit = |v: f64| (0.0..=1.0).contains(&v);
            if !in_unit(spec.center_x) || !in_unit(spec.center_y) || !in_unit(spec.opacity) {
                return Err(fail(format!("part '{}' position or opacity out of [0,1]", part)));
            }
            if !(spec.width > 0.0 && spec.width <= 1.0 && spec.height > 0.0 && spec.height <= 1.0) {
                return Err(fail(format!("part '{}' size out of (0,1]", part)));
            }
        }
        Ok(())
    }
}

/// Builtin template catalogue.
pub struct TemplateLibrary;

impl TemplateLibrary {
    /// Base template for an entity type; unknown or empty types give the humanoid default.
    pub fn select_template(entity_type: &str) -> AnatomicalTemplate {
        match Archetype::from_entity_type(entity_type) {
            Archetype::Humanoid => humanoid::base(Direction::Down),
            Archetype::Undead => humanoid::undead(Direction::Down),
            Archetype::Quadruped => archetypes::quadruped(),
            Archetype::Blob => archetypes::blob(),
            Archetype::Mechanical => archetypes::mechanical(),
            Archetype::Flying => archetypes::flying(),
            Archetype::Serpentine => archetypes::serpentine(),
            Archetype::Arachnid => archetypes::arachnid(),
        }
    }

    /// Direction-adjusted humanoid with genre and entity-subtype overrides.
    pub fn select_humanoid_template(
        genre: &str,
        entity_type: &str,
        direction: Direction,
    ) -> AnatomicalTemplate {
        let mut template = match Archetype::from_entity_type(entity_type) {
            Archetype::Undead => humanoid::undead(direction),
            _ => humanoid::base(direction),
        };
        if let Some(genre) = Genre::parse(genre) {
            humanoid::apply_genre(&mut template, genre);
        }
        humanoid::apply_subtype(&mut template, entity_type, direction);
        template
    }

    /// Humanoid facing `direction` carrying the requested equipment.
    pub fn humanoid_with_equipment(
        direction: Direction,
        has_weapon: bool,
        has_shield: bool,
    ) -> AnatomicalTemplate {
        let mut template = humanoid::base(direction);
        humanoid::add_equipment(&mut template, direction, has_weapon, has_shield);
        template
    }

    /// Scale every part's size and centre offset by `scale`. Non-positive scales are a no-op.
    pub fn boss_template(base: &AnatomicalTemplate, scale: f64) -> AnatomicalTemplate {
        boss::scale_template(base, scale)
    }

    /// Add an oversized armor part just behind the torso.
    pub fn apply_boss_enhancements(template: &AnatomicalTemplate) -> AnatomicalTemplate {
        boss::enhance(template)
    }

    /// Item layout for an item type and rarity.
    pub fn select_item_layout(item_type: &str, rarity: Rarity) -> ItemLayout {
        item::layout(item_type, rarity)
    }

    /// Full template selection for an entity request.
    pub fn for_request(request: &SpriteRequest) -> AnatomicalTemplate {
        let entity_type = request.entity_type().unwrap_or("");
        let direction = request.direction();
        let archetype = Archetype::from_entity_type(entity_type);

        let mut template = if archetype.is_humanoid_family() {
            let mut t =
                Self::select_humanoid_template(request.template_genre(), entity_type, direction);
            humanoid::add_equipment(&mut t, direction, request.has_weapon(), request.has_shield());
            t
        } else {
            let base = Self::select_template(entity_type);
            if direction == Direction::Left {
                base.mirrored()
            } else {
                base
            }
        };

        if request.is_boss() {
            template = Self::boss_template(&template, request.boss_scale());
            template = Self::apply_boss_enhancements(&template);
        }

        tracing::debug!(
            template = %template.name,
            archetype = ?template.archetype,
            direction = %direction,
            parts = template.len(),
            "selected template"
        );
        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::keys;
    use pretty_assertions::assert_eq;

    fn order_names(template: &AnatomicalTemplate) -> String {
        template
            .draw_order()
            .iter()
            .map(|(p, _)| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn test_select_template_aliases() {
        assert_eq!(TemplateLibrary::select_template("wolf").archetype, Archetype::Quadruped);
        assert_eq!(TemplateLibrary::select_template("Zombie").archetype, Archetype::Undead);
        assert_eq!(TemplateLibrary::select_template("slime").archetype, Archetype::Blob);
        assert_eq!(TemplateLibrary::select_template("spider").archetype, Archetype::Arachnid);
        assert_eq!(TemplateLibrary::select_template("snake").archetype, Archetype::Serpentine);
        assert_eq!(TemplateLibrary::select_template("robot").archetype, Archetype::Mechanical);
        assert_eq!(TemplateLibrary::select_template("bat").archetype, Archetype::Flying);
    }

    #[test]
    fn test_unknown_and_empty_default_to_humanoid() {
        let default = TemplateLibrary::select_template("humanoid");
        assert_eq!(TemplateLibrary::select_template(""), default);
        assert_eq!(TemplateLibrary::select_template("toaster"), default);
    }

    #[test]
    fn test_every_builtin_template_validates() {
        for entity in [
            "humanoid", "wolf", "slime", "robot", "bat", "snake", "spider", "zombie",
        ] {
            let template = TemplateLibrary::select_template(entity);
            template.validate().unwrap();
        }
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            TemplateLibrary::humanoid_with_equipment(dir, true, true)
                .validate()
                .unwrap();
            for genre in ["fantasy", "scifi", "horror", "cyberpunk", "postapoc"] {
                for entity in ["knight", "mage", "rogue", "angel", "dwarf", "skeleton"] {
                    TemplateLibrary::select_humanoid_template(genre, entity, dir)
                        .validate()
                        .unwrap();
                }
            }
        }
    }

    #[test]
    fn test_humanoid_draw_order() {
        let template = TemplateLibrary::select_humanoid_template("fantasy", "humanoid", Direction::Down);
        insta::assert_snapshot!(order_names(&template), @"shadow,legs,torso,arms,head");
    }

    #[test]
    fn test_draw_order_is_monotonic() {
        let template = TemplateLibrary::humanoid_with_equipment(Direction::Up, true, true);
        let zs: Vec<i32> = template.draw_order().iter().map(|(_, s)| s.z_index).collect();
        assert!(zs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_draw_order_ties_keep_declaration_order() {
        let spec = PartSpec::new((0.5, 0.5), (0.2, 0.2), &[ShapeKind::Circle], 5, ColourRole::Primary);
        let template = AnatomicalTemplate::new("tie", Archetype::Humanoid)
            .with_part(BodyPart::Head, spec.clone())
            .with_part(BodyPart::Shadow, spec.clone())
            .with_part(BodyPart::Torso, spec);
        assert_eq!(order_names(&template), "shadow,torso,head");
    }

    #[test]
    fn test_validate_rejects_foreign_part() {
        let template = TemplateLibrary::select_template("wolf").with_part(
            BodyPart::Weapon,
            PartSpec::new((0.5, 0.5), (0.1, 0.1), &[ShapeKind::Blade], 50, ColourRole::Highlight1),
        );
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_pixel_rect() {
        let spec = PartSpec::new((0.5, 0.25), (0.3, 0.28), &[ShapeKind::Circle], 40, ColourRole::Accent1);
        assert_eq!(spec.pixel_rect(28, 28), Some((10, 3, 8, 8)));

        let tiny = PartSpec::new((0.5, 0.5), (0.01, 0.5), &[ShapeKind::Circle], 0, ColourRole::Primary);
        assert_eq!(tiny.pixel_rect(28, 28), None);

        let huge = spec.scaled_about_center(1e12);
        let (x, y, w, h) = huge.pixel_rect(28, 28).unwrap();
        assert_eq!((w, h), (u32::MAX, u32::MAX));
        assert!(x < 0 && x + w as i64 > 28);
        assert!(y < 0 && y + h as i64 > 0);
    }

    #[test]
    fn test_for_request_mirrors_non_humanoids_facing_left() {
        let right = SpriteRequest::entity(32, 32, 1).with_entity_type("wolf");
        let left = right.clone().with_param(keys::FACING, "left");

        let r = TemplateLibrary::for_request(&right);
        let l = TemplateLibrary::for_request(&left);
        let rh = r.part(BodyPart::Head).unwrap();
        let lh = l.part(BodyPart::Head).unwrap();
        assert!((lh.center_x - (1.0 - rh.center_x)).abs() < 1e-12);
    }

    #[test]
    fn test_for_request_adds_equipment_and_boss_armor() {
        let req = SpriteRequest::entity(32, 32, 1)
            .with_entity_type("knight")
            .with_weapon(true)
            .with_shield(true);
        let template = TemplateLibrary::for_request(&req);
        assert!(template.has_part(BodyPart::Weapon));
        assert!(template.has_part(BodyPart::Shield));
        assert!(template.has_part(BodyPart::Helmet));

        let boss = TemplateLibrary::for_request(&SpriteRequest::entity(32, 32, 1).boss(1.5));
        let armor = boss.part(BodyPart::Armor).unwrap();
        let torso = boss.part(BodyPart::Torso).unwrap();
        assert_eq!(armor.z_index, torso.z_index - 1);
    }
}
