//! Core domain types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Colour` - RGBA colour values with source-over blending
//! - `GenrePalette` / `ColourRole` - themed colour sets and symbolic slots
//! - `PixelBuffer` - the pixel grid every generation step produces
//! - `ShapeKind` - the closed set of rasterizable primitives
//! - `Genre` - thematic style tags
//! - `SpriteRequest` / `CompositeRequest` - what callers ask for

mod buffer;
mod colour;
mod composite;
mod genre;
mod palette;
mod request;
mod shape;

pub use buffer::PixelBuffer;
pub use colour::Colour;
pub use composite::{
    CompositeRequest, EffectKind, EquipmentSlot, EquipmentVisual, LayerConfig, LayerKind,
    StatusEffect,
};
pub use genre::Genre;
pub use palette::{ColourRole, GenrePalette};
pub use request::{
    keys, Direction, ParamValue, Rarity, SpriteKind, SpriteRequest, DEFAULT_BOSS_SCALE,
};
pub use shape::ShapeKind;
