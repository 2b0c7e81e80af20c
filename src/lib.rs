//! sprite-forge - procedural sprite synthesis
//!
//! Builds 2D sprites at runtime from a seed and a handful of semantic
//! parameters. Anatomical templates lay out geometric parts, the composition
//! engines rasterize and blend them by Z-index, and an LRU cache, a buffer
//! pool and a batch coordinator make repeated generation cheap.

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod pool;
pub mod render;
pub mod template;
pub mod types;

pub use batch::{BatchCoordinator, BatchOptions, SpriteSource};
pub use cache::{CacheKey, CacheStats, SpriteCache};
pub use config::{CacheConfig, EngineConfig, PoolConfig, RenderConfig};
pub use error::{Result, SpriteError};
pub use generator::SpriteGenerator;
pub use pool::{BufferPool, PoolStats};
pub use render::{
    CompositeEngine, CompositionEngine, GenrePaletteGenerator, GeometricRasterizer, PaletteSource,
    PlannedShape, RasterParams, ShapeRasterizer, ShapeStyle, ShapeWindow,
};
pub use template::{
    AnatomicalTemplate, Archetype, BodyPart, ItemLayout, ItemPart, PartSpec, TemplateLibrary,
};
pub use types::{
    Colour, ColourRole, CompositeRequest, Direction, EffectKind, EquipmentSlot, EquipmentVisual,
    Genre, GenrePalette, LayerConfig, LayerKind, ParamValue, PixelBuffer, Rarity, ShapeKind,
    SpriteKind, SpriteRequest, StatusEffect,
};
