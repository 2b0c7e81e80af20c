//! Sprite requests and their recognized custom parameters.
//!
//! A request carries a handful of fixed fields plus an ordered map of custom
//! parameters. Semantic toggles (facing, equipment, boss, item rarity) live in
//! that map under the keys in [`keys`], so a request's identity is exactly its
//! fixed fields plus its custom map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteError};

use super::GenrePalette;

/// Recognized custom-parameter keys.
pub mod keys {
    pub const ENTITY_TYPE: &str = "entityType";
    pub const FACING: &str = "facing";
    pub const GENRE: &str = "genre";
    pub const HAS_WEAPON: &str = "hasWeapon";
    pub const HAS_SHIELD: &str = "hasShield";
    pub const IS_BOSS: &str = "isBoss";
    pub const BOSS_SCALE: &str = "bossScale";
    pub const ITEM_TYPE: &str = "itemType";
    pub const RARITY: &str = "rarity";
}

/// Boss scale used when `isBoss` is set without an explicit `bossScale`.
pub const DEFAULT_BOSS_SCALE: f64 = 1.5;

/// What kind of sprite is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    #[default]
    Entity,
    Item,
    Tile,
    Particle,
    Ui,
}

impl SpriteKind {
    /// Parse a kind name. Unknown names fall back to `Entity`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" => SpriteKind::Item,
            "tile" => SpriteKind::Tile,
            "particle" => SpriteKind::Particle,
            "ui" => SpriteKind::Ui,
            _ => SpriteKind::Entity,
        }
    }

    /// Stable tag used for hashing.
    pub fn tag(self) -> u8 {
        match self {
            SpriteKind::Entity => 0,
            SpriteKind::Item => 1,
            SpriteKind::Tile => 2,
            SpriteKind::Particle => 3,
            SpriteKind::Ui => 4,
        }
    }
}

/// Facing direction of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a direction name (`up`/`north`, `down`/`south`, `left`/`west`, `right`/`east`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "north" | "n" => Some(Direction::Up),
            "down" | "south" | "s" => Some(Direction::Down),
            "left" | "west" | "w" => Some(Direction::Left),
            "right" | "east" | "e" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Horizontal sign: -1 facing left, +1 facing right, 0 otherwise.
    pub fn side(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
            Direction::Up | Direction::Down => 0.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Tier from an ordinal; values past the top tier clamp to `Legendary`.
    pub fn from_index(index: i64) -> Self {
        match index {
            i64::MIN..=0 => Rarity::Common,
            1 => Rarity::Uncommon,
            2 => Rarity::Rare,
            3 => Rarity::Epic,
            _ => Rarity::Legendary,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "epic" => Some(Rarity::Epic),
            "legendary" => Some(Rarity::Legendary),
            other => other.parse::<i64>().ok().map(Rarity::from_index),
        }
    }
}

/// A custom parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Int(i) => Some(*i != 0),
            ParamValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            ParamValue::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Str(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(f) => Some(*f as i64),
            ParamValue::Str(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// A request for one procedurally generated sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteRequest {
    pub kind: SpriteKind,
    pub width: u32,
    pub height: u32,
    pub seed: i64,
    pub genre_id: String,
    /// Detail level in [0, 1].
    pub complexity: f64,
    pub variation: i64,
    /// Pre-built palette; when absent one is generated from genre and seed.
    pub palette: Option<GenrePalette>,
    /// Custom parameters, iterated in key order.
    pub custom: BTreeMap<String, ParamValue>,
}

impl Default for SpriteRequest {
    fn default() -> Self {
        Self {
            kind: SpriteKind::Entity,
            width: 32,
            height: 32,
            seed: 0,
            genre_id: "fantasy".to_string(),
            complexity: 0.5,
            variation: 0,
            palette: None,
            custom: BTreeMap::new(),
        }
    }
}

impl SpriteRequest {
    /// Create a request with default genre and complexity.
    pub fn new(kind: SpriteKind, width: u32, height: u32, seed: i64) -> Self {
        Self {
            kind,
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    /// Shorthand for an entity request.
    pub fn entity(width: u32, height: u32, seed: i64) -> Self {
        Self::new(SpriteKind::Entity, width, height, seed)
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre_id = genre.into();
        self
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity.clamp(0.0, 1.0);
        self
    }

    pub fn with_variation(mut self, variation: i64) -> Self {
        self.variation = variation;
        self
    }

    pub fn with_palette(mut self, palette: GenrePalette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Set an arbitrary custom parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    pub fn with_entity_type(self, entity_type: impl Into<String>) -> Self {
        self.with_param(keys::ENTITY_TYPE, entity_type.into())
    }

    pub fn facing(self, direction: Direction) -> Self {
        self.with_param(keys::FACING, direction.as_str())
    }

    pub fn with_weapon(self, has_weapon: bool) -> Self {
        self.with_param(keys::HAS_WEAPON, has_weapon)
    }

    pub fn with_shield(self, has_shield: bool) -> Self {
        self.with_param(keys::HAS_SHIELD, has_shield)
    }

    /// Mark the request as a boss with the given scale.
    pub fn boss(self, scale: f64) -> Self {
        self.with_param(keys::IS_BOSS, true)
            .with_param(keys::BOSS_SCALE, scale)
    }

    /// Turn the request into an item request.
    pub fn item(mut self, item_type: impl Into<String>, rarity: Rarity) -> Self {
        self.kind = SpriteKind::Item;
        self.with_param(keys::ITEM_TYPE, item_type.into())
            .with_param(keys::RARITY, rarity.index() as i64)
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.custom.get(key)
    }

    /// Entity type, if one was given and is non-empty.
    pub fn entity_type(&self) -> Option<&str> {
        self.param(keys::ENTITY_TYPE)
            .and_then(ParamValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Facing direction; missing or unparseable values mean `Down`.
    pub fn direction(&self) -> Direction {
        self.param(keys::FACING)
            .and_then(ParamValue::as_str)
            .and_then(Direction::parse)
            .unwrap_or_default()
    }

    /// Genre used for template variants (`genre` custom key, else `genre_id`).
    pub fn template_genre(&self) -> &str {
        self.param(keys::GENRE)
            .and_then(ParamValue::as_str)
            .unwrap_or(self.genre_id.as_str())
    }

    pub fn has_weapon(&self) -> bool {
        self.flag(keys::HAS_WEAPON)
    }

    pub fn has_shield(&self) -> bool {
        self.flag(keys::HAS_SHIELD)
    }

    pub fn is_boss(&self) -> bool {
        self.flag(keys::IS_BOSS)
    }

    /// Boss scale as given; `DEFAULT_BOSS_SCALE` when absent.
    pub fn boss_scale(&self) -> f64 {
        self.param(keys::BOSS_SCALE)
            .and_then(ParamValue::as_f64)
            .unwrap_or(DEFAULT_BOSS_SCALE)
    }

    pub fn item_type(&self) -> Option<&str> {
        self.param(keys::ITEM_TYPE)
            .and_then(ParamValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn rarity(&self) -> Rarity {
        match self.param(keys::RARITY) {
            Some(ParamValue::Str(s)) => Rarity::parse(s).unwrap_or_default(),
            Some(v) => v.as_i64().map(Rarity::from_index).unwrap_or_default(),
            None => Rarity::Common,
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.param(key).and_then(ParamValue::as_bool).unwrap_or(false)
    }

    /// Reject requests that cannot produce any pixels.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::InvalidRequest {
                message: format!(
                    "sprite size must be positive, got {}x{}",
                    self.width, self.height
                ),
                help: Some("Use a width and height of at least 1 pixel".to_string()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_falls_back_to_entity() {
        assert_eq!(SpriteKind::parse("item"), SpriteKind::Item);
        assert_eq!(SpriteKind::parse(" UI "), SpriteKind::Ui);
        assert_eq!(SpriteKind::parse("vehicle"), SpriteKind::Entity);
    }

    #[test]
    fn test_direction_defaults_down() {
        let req = SpriteRequest::entity(16, 16, 1);
        assert_eq!(req.direction(), Direction::Down);

        let req = req.with_param(keys::FACING, "sideways");
        assert_eq!(req.direction(), Direction::Down);

        let req = req.facing(Direction::Left);
        assert_eq!(req.direction(), Direction::Left);
    }

    #[test]
    fn test_recognized_keys() {
        let req = SpriteRequest::entity(16, 16, 1)
            .with_entity_type("wolf")
            .with_weapon(true)
            .with_param(keys::HAS_SHIELD, "yes")
            .boss(2.0)
            .with_param(keys::GENRE, "horror");

        assert_eq!(req.entity_type(), Some("wolf"));
        assert!(req.has_weapon());
        assert!(req.has_shield());
        assert!(req.is_boss());
        assert_eq!(req.boss_scale(), 2.0);
        assert_eq!(req.template_genre(), "horror");
        assert_eq!(req.genre_id, "fantasy");
    }

    #[test]
    fn test_empty_entity_type_is_none() {
        let req = SpriteRequest::entity(16, 16, 1).with_entity_type("  ");
        assert_eq!(req.entity_type(), None);
    }

    #[test]
    fn test_boss_scale_default() {
        let req = SpriteRequest::entity(16, 16, 1).with_param(keys::IS_BOSS, true);
        assert_eq!(req.boss_scale(), DEFAULT_BOSS_SCALE);
    }

    #[test]
    fn test_item_rarity() {
        let req = SpriteRequest::entity(16, 16, 1).item("sword", Rarity::Epic);
        assert_eq!(req.kind, SpriteKind::Item);
        assert_eq!(req.item_type(), Some("sword"));
        assert_eq!(req.rarity(), Rarity::Epic);

        let req = req.with_param(keys::RARITY, "legendary");
        assert_eq!(req.rarity(), Rarity::Legendary);

        let req = req.with_param(keys::RARITY, 99_i64);
        assert_eq!(req.rarity(), Rarity::Legendary);
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        assert!(SpriteRequest::entity(0, 16, 1).validate().is_err());
        assert!(SpriteRequest::entity(16, 16, 1).validate().is_ok());
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "kind": "item",
            "width": 24,
            "height": 24,
            "seed": 7,
            "custom": { "itemType": "potion", "rarity": 2, "isBoss": false }
        }"#;
        let req: SpriteRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.kind, SpriteKind::Item);
        assert_eq!(req.genre_id, "fantasy");
        assert_eq!(req.item_type(), Some("potion"));
        assert_eq!(req.rarity(), Rarity::Rare);
        assert!(!req.is_boss());
    }
}
