//! Composite engine - ordered layers, equipment overlays and status effects.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{Result, SpriteError};
use crate::types::{
    Colour, CompositeRequest, EffectKind, EquipmentVisual, LayerConfig, LayerKind, PixelBuffer,
    ShapeKind,
};

use super::{request_rng, CompositionEngine, PlannedShape};

/// Something placed on the composite canvas before sorting.
enum Placement<'a> {
    Layer(&'a LayerConfig),
    Equipment(&'a EquipmentVisual),
}

impl Placement<'_> {
    fn z_index(&self) -> i32 {
        match self {
            Placement::Layer(layer) => layer.z_index,
            Placement::Equipment(item) => item.layer.default_z(),
        }
    }
}

/// Renders [`CompositeRequest`]s on top of a [`CompositionEngine`].
pub struct CompositeEngine {
    engine: CompositionEngine,
}

impl Default for CompositeEngine {
    fn default() -> Self {
        Self::new(CompositionEngine::new())
    }
}

impl CompositeEngine {
    /// Share the rasterizer, palette source and pool of `engine`.
    pub fn new(engine: CompositionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &CompositionEngine {
        &self.engine
    }

    fn validate(request: &CompositeRequest) -> Result<()> {
        let base = &request.base;
        if base.width == 0 || base.height == 0 {
            return Err(SpriteError::InvalidComposite {
                message: format!("canvas must be non-empty, got {}x{}", base.width, base.height),
                help: Some("Set base.width and base.height to at least 1".to_string()),
            });
        }
        if request.layers.is_empty() {
            return Err(SpriteError::InvalidComposite {
                message: "no layers to composite".to_string(),
                help: Some("Add at least one LayerConfig".to_string()),
            });
        }
        Ok(())
    }

    /// Compute the draw list: visible layers and equipment by ascending Z, then effects.
    pub fn plan(&self, request: &CompositeRequest) -> Result<Vec<PlannedShape>> {
        Self::validate(request)?;
        let base = &request.base;
        let palette = self.engine.resolve_palette(base)?;
        let (w, h) = (base.width as f64, base.height as f64);

        let mut placements: Vec<Placement> = request
            .layers
            .iter()
            .map(Placement::Layer)
            .chain(request.equipment.iter().map(Placement::Equipment))
            .collect();
        // Stable: equal Z keeps layers before equipment, each in input order.
        placements.sort_by_key(Placement::z_index);

        let mut plan = Vec::with_capacity(placements.len());
        for placement in &placements {
            let shape = match placement {
                Placement::Layer(layer) => {
                    if !layer.visible || !(layer.scale.is_finite() && layer.scale > 0.0) {
                        continue;
                    }
                    let frac = layer.kind.size_fraction() * layer.scale;
                    let colour = layer
                        .tint
                        .unwrap_or_else(|| palette.resolve(layer.kind.colour_role()));
                    centred(
                        layer.kind.as_str().to_string(),
                        (w, h),
                        frac,
                        (layer.offset_x as f64, layer.offset_y as f64),
                        layer.shape,
                        colour,
                        layer.seed as u64,
                        layer.z_index,
                    )
                }
                Placement::Equipment(item) => {
                    let mut rng = ChaCha8Rng::seed_from_u64(item.seed as u64);
                    let shape = *item
                        .slot
                        .shapes()
                        .choose(&mut rng)
                        .unwrap_or(&ShapeKind::Rectangle);
                    let (rx, ry) = item.slot.relative_offset();
                    centred(
                        format!("{}:{}", item.layer.as_str(), item.item_id),
                        (w, h),
                        item.layer.size_fraction(),
                        (rx * w, ry * h),
                        shape,
                        palette.resolve(item.layer.colour_role()),
                        rng.gen(),
                        item.layer.default_z(),
                    )
                }
            };
            if let Some(shape) = shape {
                plan.push(shape);
            }
        }

        let top = plan
            .last()
            .map_or(i32::MIN, |p| p.z_index)
            .max(LayerKind::Effect.default_z());
        for (index, effect) in request.effects.iter().enumerate() {
            let mut rng = request_rng(base.seed, base.variation ^ (index as i64 + 1));
            let colour = effect
                .resolved_colour()
                .scale_alpha(effect.intensity.clamp(0.0, 1.0));
            let size = ((w.min(h) * 0.08).round() as u32).max(1);
            for _ in 0..effect.particle_count {
                let x = rng.gen_range(0.0..w) as i64;
                let y = rng.gen_range(0.0..h) as i64;
                plan.push(PlannedShape {
                    label: format!("effect:{:?}", effect.kind).to_ascii_lowercase(),
                    shape: particle_shape(effect.kind),
                    x,
                    y,
                    width: size,
                    height: size,
                    colour,
                    opacity: 1.0,
                    rotation: 0.0,
                    seed: rng.gen(),
                    z_index: top,
                });
            }
        }

        debug!(
            layers = request.layers.len(),
            equipment = request.equipment.len(),
            effects = request.effects.len(),
            shapes = plan.len(),
            "composite plan"
        );
        Ok(plan)
    }

    /// Render a composite request. Validation and palette failures are returned.
    pub fn generate_composite(&self, request: &CompositeRequest) -> Result<PixelBuffer> {
        let plan = self.plan(request)?;
        let mut canvas = PixelBuffer::new(request.base.width, request.base.height);
        self.engine.render_plan(&plan, &mut canvas);
        Ok(canvas)
    }
}

fn particle_shape(kind: EffectKind) -> ShapeKind {
    match kind {
        EffectKind::Shock | EffectKind::Bless => ShapeKind::Star,
        EffectKind::Freeze => ShapeKind::Diamond,
        EffectKind::Burn | EffectKind::Poison | EffectKind::Bleed | EffectKind::Curse => {
            ShapeKind::Circle
        }
    }
}

/// A shape of `frac` of the canvas, centred and shifted by `offset` pixels.
/// Sides are capped at `u32::MAX`.
#[allow(clippy::too_many_arguments)]
fn centred(
    label: String,
    (w, h): (f64, f64),
    frac: f64,
    offset: (f64, f64),
    shape: ShapeKind,
    colour: Colour,
    seed: u64,
    z_index: i32,
) -> Option<PlannedShape> {
    let sw = (w * frac).round().min(u32::MAX as f64);
    let sh = (h * frac).round().min(u32::MAX as f64);
    if !(sw >= 1.0 && sh >= 1.0) {
        return None;
    }
    Some(PlannedShape {
        label,
        shape,
        x: ((w - sw) / 2.0 + offset.0).round() as i64,
        y: ((h - sh) / 2.0 + offset.1).round() as i64,
        width: sw as u32,
        height: sh as u32,
        colour,
        opacity: 1.0,
        rotation: 0.0,
        seed,
        z_index,
    })
}
