//! Multi-layer composite requests: layers, equipment overlays and status effects.

use serde::{Deserialize, Serialize};

use super::{Colour, ColourRole, ShapeKind, SpriteRequest};

/// The visual role of a composite layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Shadow,
    Legs,
    Body,
    Armor,
    Head,
    Helmet,
    Shield,
    Weapon,
    Accessory,
    Effect,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Shadow => "shadow",
            LayerKind::Legs => "legs",
            LayerKind::Body => "body",
            LayerKind::Armor => "armor",
            LayerKind::Head => "head",
            LayerKind::Helmet => "helmet",
            LayerKind::Shield => "shield",
            LayerKind::Weapon => "weapon",
            LayerKind::Accessory => "accessory",
            LayerKind::Effect => "effect",
        }
    }

    /// Shape size as a fraction of the sprite size (body largest, accessory smallest).
    pub fn size_fraction(self) -> f64 {
        match self {
            LayerKind::Body => 0.6,
            LayerKind::Armor => 0.55,
            LayerKind::Shadow => 0.5,
            LayerKind::Effect => 0.5,
            LayerKind::Legs => 0.45,
            LayerKind::Weapon => 0.4,
            LayerKind::Head => 0.35,
            LayerKind::Shield => 0.35,
            LayerKind::Helmet => 0.3,
            LayerKind::Accessory => 0.2,
        }
    }

    /// Palette role used when the layer carries no explicit tint.
    pub fn colour_role(self) -> ColourRole {
        match self {
            LayerKind::Shadow => ColourRole::Shadow,
            LayerKind::Body => ColourRole::Primary,
            LayerKind::Legs | LayerKind::Armor => ColourRole::Secondary,
            LayerKind::Head => ColourRole::Accent1,
            LayerKind::Shield => ColourRole::Accent2,
            LayerKind::Helmet | LayerKind::Effect => ColourRole::Accent3,
            LayerKind::Weapon => ColourRole::Highlight1,
            LayerKind::Accessory => ColourRole::Highlight2,
        }
    }

    /// Z-index this kind sits at by default.
    pub fn default_z(self) -> i32 {
        match self {
            LayerKind::Shadow => 0,
            LayerKind::Legs => 10,
            LayerKind::Body => 20,
            LayerKind::Armor => 25,
            LayerKind::Head => 30,
            LayerKind::Helmet => 35,
            LayerKind::Shield => 40,
            LayerKind::Weapon => 45,
            LayerKind::Accessory => 50,
            LayerKind::Effect => 60,
        }
    }
}

/// One layer of a composite sprite.
///
/// When deserialized without a `z_index`, the layer sits at its kind's
/// [`default_z`](LayerKind::default_z).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayerConfigFields")]
pub struct LayerConfig {
    pub kind: LayerKind,
    pub z_index: i32,
    /// Pixel offset from the sprite centre.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Multiplier on the kind's size fraction.
    pub scale: f64,
    /// Explicit colour; the kind's palette role is used otherwise.
    pub tint: Option<Colour>,
    pub visible: bool,
    pub seed: i64,
    pub shape: ShapeKind,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::new(LayerKind::Body, ShapeKind::Ellipse)
    }
}

/// Wire form of [`LayerConfig`]; every field is optional.
#[derive(Deserialize)]
#[serde(default)]
struct LayerConfigFields {
    kind: LayerKind,
    z_index: Option<i32>,
    offset_x: i32,
    offset_y: i32,
    scale: f64,
    tint: Option<Colour>,
    visible: bool,
    seed: i64,
    shape: ShapeKind,
}

impl Default for LayerConfigFields {
    fn default() -> Self {
        let layer = LayerConfig::default();
        Self {
            kind: layer.kind,
            z_index: None,
            offset_x: layer.offset_x,
            offset_y: layer.offset_y,
            scale: layer.scale,
            tint: layer.tint,
            visible: layer.visible,
            seed: layer.seed,
            shape: layer.shape,
        }
    }
}

impl From<LayerConfigFields> for LayerConfig {
    fn from(fields: LayerConfigFields) -> Self {
        Self {
            kind: fields.kind,
            z_index: fields.z_index.unwrap_or_else(|| fields.kind.default_z()),
            offset_x: fields.offset_x,
            offset_y: fields.offset_y,
            scale: fields.scale,
            tint: fields.tint,
            visible: fields.visible,
            seed: fields.seed,
            shape: fields.shape,
        }
    }
}

impl LayerConfig {
    /// A visible, untinted layer at the kind's default Z-index.
    pub fn new(kind: LayerKind, shape: ShapeKind) -> Self {
        Self {
            kind,
            z_index: kind.default_z(),
            offset_x: 0,
            offset_y: 0,
            scale: 1.0,
            tint: None,
            visible: true,
            seed: 0,
            shape,
        }
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tint(mut self, tint: Colour) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Where a piece of equipment is worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Shield,
    Helmet,
    Armor,
    Boots,
    Gloves,
    Accessory,
}

impl EquipmentSlot {
    /// Candidate shapes; one is picked from the item's seed.
    pub fn shapes(self) -> &'static [ShapeKind] {
        match self {
            EquipmentSlot::Weapon => &[ShapeKind::Blade, ShapeKind::Star, ShapeKind::Triangle],
            EquipmentSlot::Armor => &[ShapeKind::Rectangle],
            EquipmentSlot::Accessory => &[ShapeKind::Circle, ShapeKind::Star, ShapeKind::Ring],
            EquipmentSlot::Shield => &[ShapeKind::Hexagon, ShapeKind::Circle, ShapeKind::Diamond],
            EquipmentSlot::Helmet => &[ShapeKind::Crescent, ShapeKind::Circle],
            EquipmentSlot::Boots => &[ShapeKind::Rectangle, ShapeKind::Capsule],
            EquipmentSlot::Gloves => &[ShapeKind::Circle, ShapeKind::Capsule],
        }
    }

    /// Offset from the sprite centre as a fraction of sprite size.
    pub fn relative_offset(self) -> (f64, f64) {
        match self {
            EquipmentSlot::Weapon => (0.25, 0.0),
            EquipmentSlot::Shield => (-0.25, 0.05),
            EquipmentSlot::Helmet => (0.0, -0.3),
            EquipmentSlot::Armor => (0.0, 0.05),
            EquipmentSlot::Boots => (0.0, 0.38),
            EquipmentSlot::Gloves => (0.2, 0.1),
            EquipmentSlot::Accessory => (0.15, -0.1),
        }
    }

    /// Layer an item in this slot lands on unless overridden.
    pub fn default_layer(self) -> LayerKind {
        match self {
            EquipmentSlot::Weapon => LayerKind::Weapon,
            EquipmentSlot::Shield => LayerKind::Shield,
            EquipmentSlot::Helmet => LayerKind::Helmet,
            EquipmentSlot::Armor => LayerKind::Armor,
            EquipmentSlot::Boots => LayerKind::Legs,
            EquipmentSlot::Gloves | EquipmentSlot::Accessory => LayerKind::Accessory,
        }
    }
}

/// A piece of equipment drawn over a composite sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentVisual {
    pub slot: EquipmentSlot,
    pub item_id: String,
    pub seed: i64,
    pub layer: LayerKind,
}

impl EquipmentVisual {
    pub fn new(slot: EquipmentSlot, item_id: impl Into<String>, seed: i64) -> Self {
        Self {
            slot,
            item_id: item_id.into(),
            seed,
            layer: slot.default_layer(),
        }
    }

    pub fn on_layer(mut self, layer: LayerKind) -> Self {
        self.layer = layer;
        self
    }
}

/// Status effect types with a default particle colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Burn,
    Freeze,
    Poison,
    Shock,
    Bleed,
    Bless,
    Curse,
}

impl EffectKind {
    pub fn default_colour(self) -> Colour {
        match self {
            EffectKind::Burn => Colour::rgb(255, 110, 20),
            EffectKind::Freeze => Colour::rgb(150, 220, 255),
            EffectKind::Poison => Colour::rgb(90, 200, 60),
            EffectKind::Shock => Colour::rgb(255, 240, 80),
            EffectKind::Bleed => Colour::rgb(200, 20, 30),
            EffectKind::Bless => Colour::rgb(255, 215, 120),
            EffectKind::Curse => Colour::rgb(140, 60, 180),
        }
    }
}

/// A particle overlay describing an active status effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Particle alpha multiplier in [0, 1].
    pub intensity: f64,
    #[serde(default)]
    pub colour: Option<Colour>,
    pub particle_count: u32,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, intensity: f64, particle_count: u32) -> Self {
        Self {
            kind,
            intensity,
            colour: None,
            particle_count,
        }
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Explicit colour, or the effect kind's default.
    pub fn resolved_colour(&self) -> Colour {
        self.colour.unwrap_or_else(|| self.kind.default_colour())
    }
}

/// A base request plus ordered layers, equipment and status overlays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeRequest {
    pub base: SpriteRequest,
    pub layers: Vec<LayerConfig>,
    pub equipment: Vec<EquipmentVisual>,
    pub effects: Vec<StatusEffect>,
}

impl CompositeRequest {
    pub fn new(base: SpriteRequest) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn with_layer(mut self, layer: LayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_equipment(mut self, item: EquipmentVisual) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn with_effect(mut self, effect: StatusEffect) -> Self {
        self.effects.push(effect);
        self
    }
}
