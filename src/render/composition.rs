//! Composition engine - turns a sprite request into one pixel buffer.
//!
//! Generation happens in two steps. [`CompositionEngine::plan`] resolves
//! the palette, picks a template (or the legacy random-shape mode) and
//! produces a Z-ordered list of [`PlannedShape`]s; [`CompositionEngine::generate`]
//! rasterizes that plan onto a transparent canvas.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::config::DEFAULT_SMOOTHING;
use crate::error::Result;
use crate::pool::BufferPool;
use crate::template::{PartSpec, TemplateLibrary};
use crate::types::{
    Colour, ColourRole, GenrePalette, PixelBuffer, ShapeKind, SpriteKind, SpriteRequest,
};

use super::{
    request_rng, GenrePaletteGenerator, GeometricRasterizer, PaletteSource, ShapeRasterizer,
    ShapeStyle, ShapeWindow,
};

/// Requests below this complexity without an entity type use random shapes.
pub const TEMPLATE_COMPLEXITY_THRESHOLD: f64 = 0.3;

const BODY_SHAPES: [ShapeKind; 5] = [
    ShapeKind::Circle,
    ShapeKind::Ellipse,
    ShapeKind::Organic,
    ShapeKind::Hexagon,
    ShapeKind::Diamond,
];

/// One shape placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedShape {
    /// Part or layer name.
    pub label: String,
    pub shape: ShapeKind,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub colour: Colour,
    pub opacity: f64,
    pub rotation: f64,
    pub seed: u64,
    pub z_index: i32,
}

/// Renders sprite requests part by part.
pub struct CompositionEngine {
    rasterizer: Arc<dyn ShapeRasterizer>,
    palettes: Arc<dyn PaletteSource>,
    pool: Option<Arc<BufferPool>>,
    smoothing: f64,
}

impl Default for CompositionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositionEngine {
    /// Engine using the builtin rasterizer and palette generator.
    pub fn new() -> Self {
        Self {
            rasterizer: Arc::new(GeometricRasterizer),
            palettes: Arc::new(GenrePaletteGenerator),
            pool: None,
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn ShapeRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_palette_source(mut self, palettes: Arc<dyn PaletteSource>) -> Self {
        self.palettes = palettes;
        self
    }

    /// Recycle per-part scratch buffers through `pool`.
    pub fn with_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// The request's palette, generated from genre and seed when not supplied.
    pub fn resolve_palette(&self, request: &SpriteRequest) -> Result<GenrePalette> {
        match &request.palette {
            Some(palette) => Ok(palette.clone()),
            None => self.palettes.generate(&request.genre_id, request.seed),
        }
    }

    /// Whether a request renders through a template rather than random shapes.
    pub fn uses_template(request: &SpriteRequest) -> bool {
        request.kind == SpriteKind::Item
            || request.complexity >= TEMPLATE_COMPLEXITY_THRESHOLD
            || request.entity_type().is_some()
    }

    /// Compute the Z-ordered shapes for a request without rasterizing.
    pub fn plan(&self, request: &SpriteRequest) -> Result<Vec<PlannedShape>> {
        request.validate()?;
        let palette = self.resolve_palette(request)?;
        let mut rng = request_rng(request.seed, request.variation);
        let (w, h) = (request.width, request.height);

        let plan = match request.kind {
            SpriteKind::Item => {
                let layout = TemplateLibrary::select_item_layout(
                    request.item_type().unwrap_or(""),
                    request.rarity(),
                );
                debug!(layout = %layout.name, parts = layout.len(), "item layout");
                plan_parts(
                    layout.draw_order().into_iter().map(|(p, s)| (p.as_str(), s)),
                    w,
                    h,
                    &palette,
                    &mut rng,
                )
            }
            // Tiles, particles and UI elements render like entities.
            SpriteKind::Entity | SpriteKind::Tile | SpriteKind::Particle | SpriteKind::Ui => {
                if Self::uses_template(request) {
                    let template = TemplateLibrary::for_request(request);
                    plan_parts(
                        template.draw_order().into_iter().map(|(p, s)| (p.as_str(), s)),
                        w,
                        h,
                        &palette,
                        &mut rng,
                    )
                } else {
                    plan_random_shapes(request, &palette, &mut rng)
                }
            }
        };
        Ok(plan)
    }

    /// Generate the sprite for `request`.
    ///
    /// Palette failures are returned; a part that fails to rasterize is
    /// logged and left out.
    #[tracing::instrument(
        skip(self, request),
        fields(w = request.width, h = request.height, seed = request.seed)
    )]
    pub fn generate(&self, request: &SpriteRequest) -> Result<PixelBuffer> {
        let plan = self.plan(request)?;
        let mut canvas = PixelBuffer::new(request.width, request.height);
        self.render_plan(&plan, &mut canvas);
        Ok(canvas)
    }

    /// Rasterize planned shapes onto `canvas` in order.
    pub(crate) fn render_plan(&self, plan: &[PlannedShape], canvas: &mut PixelBuffer) {
        for item in plan {
            trace!(
                part = %item.label,
                shape = %item.shape,
                z = item.z_index,
                x = item.x,
                y = item.y,
                "render part"
            );
            let (canvas_w, canvas_h) = canvas.size();
            let (Some((x0, vis_w)), Some((y0, vis_h))) = (
                visible_span(item.x, item.width, canvas_w),
                visible_span(item.y, item.height, canvas_h),
            ) else {
                trace!(part = %item.label, "part is off canvas");
                continue;
            };
            let window = ShapeWindow {
                width: item.width,
                height: item.height,
                x: x0 - item.x,
                y: y0 - item.y,
            };
            let style = ShapeStyle::new(item.colour)
                .with_seed(item.seed)
                .with_smoothing(self.smoothing)
                .with_rotation(item.rotation)
                .with_window(window);

            let mut scratch = match &self.pool {
                Some(pool) => pool.get(vis_w, vis_h),
                None => PixelBuffer::new(vis_w, vis_h),
            };
            match self.rasterizer.rasterize_into(item.shape, &style, &mut scratch) {
                Ok(()) => canvas.composite(&scratch, x0, y0, item.opacity),
                Err(err) => warn!(part = %item.label, error = %err, "skipping part"),
            }
            if let Some(pool) = &self.pool {
                pool.put(scratch);
            }
        }
    }
}

/// Start and length of `[start, start + len)` clipped to `[0, limit)`.
fn visible_span(start: i64, len: u32, limit: u32) -> Option<(i64, u32)> {
    let from = start.max(0);
    let to = start.saturating_add(i64::from(len)).min(i64::from(limit));
    (to > from).then(|| (from, (to - from) as u32))
}

/// Place template parts (already in draw order) on a `w`x`h` canvas.
fn plan_parts<'a>(
    parts: impl Iterator<Item = (&'a str, &'a PartSpec)>,
    w: u32,
    h: u32,
    palette: &GenrePalette,
    rng: &mut ChaCha8Rng,
) -> Vec<PlannedShape> {
    let mut plan = Vec::new();
    for (label, spec) in parts {
        let Some((x, y, pw, ph)) = spec.pixel_rect(w, h) else {
            trace!(part = label, "part too small, skipped");
            continue;
        };
        let Some(&shape) = spec.shapes.choose(rng) else {
            continue;
        };
        plan.push(PlannedShape {
            label: label.to_string(),
            shape,
            x,
            y,
            width: pw,
            height: ph,
            colour: palette.resolve(spec.colour_role),
            opacity: spec.opacity.clamp(0.0, 1.0),
            rotation: spec.rotation,
            seed: rng.gen(),
            z_index: spec.z_index,
        });
    }
    plan
}

/// One body shape plus `1 + 4 * complexity` detail shapes at random spots.
fn plan_random_shapes(
    request: &SpriteRequest,
    palette: &GenrePalette,
    rng: &mut ChaCha8Rng,
) -> Vec<PlannedShape> {
    let (w, h) = (request.width, request.height);
    let (wf, hf) = (w as f64, h as f64);
    let mut plan = Vec::new();

    let body_frac = rng.gen_range(0.5..0.8);
    let bw = ((wf * body_frac).round() as u32).max(1);
    let bh = ((hf * body_frac).round() as u32).max(1);
    let body_shape = *BODY_SHAPES.choose(rng).unwrap_or(&ShapeKind::Circle);
    plan.push(PlannedShape {
        label: "body".to_string(),
        shape: body_shape,
        x: ((wf - bw as f64) / 2.0).round() as i64,
        y: ((hf - bh as f64) / 2.0).round() as i64,
        width: bw,
        height: bh,
        colour: palette.resolve(ColourRole::Primary),
        opacity: 1.0,
        rotation: 0.0,
        seed: rng.gen(),
        z_index: 0,
    });

    let details = 1 + (4.0 * request.complexity.clamp(0.0, 1.0)).floor() as usize;
    for i in 0..details {
        let frac = rng.gen_range(0.1..0.3);
        let dw = ((wf * frac).round() as u32).max(1);
        let dh = ((hf * frac).round() as u32).max(1);
        let shape = *ShapeKind::ALL.choose(rng).unwrap_or(&ShapeKind::Circle);
        let cx = rng.gen_range(0.2..0.8) * wf;
        let cy = rng.gen_range(0.2..0.8) * hf;
        plan.push(PlannedShape {
            label: "detail".to_string(),
            shape,
            x: (cx - dw as f64 / 2.0).round() as i64,
            y: (cy - dh as f64 / 2.0).round() as i64,
            width: dw,
            height: dh,
            colour: palette.colour_at(rng.gen_range(0..8)),
            opacity: 1.0,
            rotation: rng.gen_range(0.0..360.0),
            seed: rng.gen(),
            z_index: i as i32 + 1,
        });
    }
    plan
}
