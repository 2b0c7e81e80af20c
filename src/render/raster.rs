//! Shape rasterizer - draws one primitive into a pixel buffer.
//!
//! Every [`ShapeKind`] maps to a signed-distance function over normalised
//! coordinates (the target box spans `[-1, 1]` on both axes). Distances are
//! negative inside the shape; coverage is derived from the distance with an
//! edge softness controlled by the smoothing factor.

use std::f64::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, SpriteError};
use crate::types::{Colour, PixelBuffer, ShapeKind};

/// Extra per-shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParams {
    /// Stroke thickness for ring, cross, lightning, wave and spiral, in normalised units.
    pub thickness: f64,
    /// Star point count.
    pub points: u32,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            thickness: 0.35,
            points: 5,
        }
    }
}

/// The part of a larger shape box a target covers.
///
/// The shape is laid out over `width`x`height`; target pixel `(0, 0)` sits at
/// `(x, y)` inside that box. Lets a caller draw only the visible slice of a
/// part that overhangs the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeWindow {
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

/// How a shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub colour: Colour,
    /// Perturbs organic, lightning, wave and spiral shapes.
    pub seed: u64,
    /// Edge softness in [0, 1].
    pub smoothing: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub params: RasterParams,
    /// Draw a slice of a larger box instead of filling the target.
    pub window: Option<ShapeWindow>,
}

impl ShapeStyle {
    pub fn new(colour: Colour) -> Self {
        Self {
            colour,
            seed: 0,
            smoothing: 0.25,
            rotation: 0.0,
            params: RasterParams::default(),
            window: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_window(mut self, window: ShapeWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// Draws primitive shapes.
pub trait ShapeRasterizer: Send + Sync {
    /// Draw `shape` filling `target` (or the slice named by `style.window`),
    /// overwriting its pixels where covered.
    fn rasterize_into(&self, shape: ShapeKind, style: &ShapeStyle, target: &mut PixelBuffer)
        -> Result<()>;

    /// Draw `shape` into a fresh `width`x`height` buffer.
    fn rasterize(
        &self,
        shape: ShapeKind,
        width: u32,
        height: u32,
        style: &ShapeStyle,
    ) -> Result<PixelBuffer> {
        let mut buffer = PixelBuffer::new(width, height);
        self.rasterize_into(shape, style, &mut buffer)?;
        Ok(buffer)
    }
}

/// The builtin signed-distance rasterizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricRasterizer;

/// Per-draw context handed to the distance functions.
struct ShapeCtx {
    /// Box aspect: coordinates multiplied by these give a space where the
    /// shorter side spans `[-1, 1]`.
    ax: f64,
    ay: f64,
    params: RasterParams,
    /// Seeded values in [0, 1) for perturbed shapes.
    noise: [f64; 8],
}

type Sdf = fn(f64, f64, &ShapeCtx) -> f64;

/// Distance function for each shape kind.
fn sdf_for(shape: ShapeKind) -> Sdf {
    match shape {
        ShapeKind::Circle => circle,
        ShapeKind::Ellipse => ellipse,
        ShapeKind::Rectangle => rectangle,
        ShapeKind::Triangle => triangle,
        ShapeKind::Diamond => diamond,
        ShapeKind::Star => star,
        ShapeKind::Ring => ring,
        ShapeKind::Hexagon => hexagon,
        ShapeKind::Cross => cross,
        ShapeKind::Crescent => crescent,
        ShapeKind::Capsule => capsule,
        ShapeKind::Blade => blade,
        ShapeKind::Organic => organic,
        ShapeKind::Lightning => lightning,
        ShapeKind::Wave => wave,
        ShapeKind::Spiral => spiral,
    }
}

fn circle(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    (x * ctx.ax).hypot(y * ctx.ay) - 1.0
}

fn ellipse(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    x.hypot(y) - 1.0
}

fn rectangle(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    x.abs().max(y.abs()) - 1.0
}

fn triangle(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    // Apex at the top, base along the bottom edge.
    let side = (2.0 * x.abs() - y - 1.0) / 5f64.sqrt();
    side.max(y - 1.0)
}

fn diamond(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    (x.abs() + y.abs() - 1.0) / 2f64.sqrt()
}

fn star(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let inner = 0.45;
    let points = ctx.params.points.max(2) as f64;
    let angle = x.atan2(-y);
    let frac = (angle * points / TAU).rem_euclid(1.0);
    let tip = 1.0 - 2.0 * frac.min(1.0 - frac);
    x.hypot(y) - (inner + (1.0 - inner) * tip)
}

fn ring(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let t = ctx.params.thickness.clamp(0.05, 1.0);
    (x.hypot(y) - (1.0 - t / 2.0)).abs() - t / 2.0
}

fn hexagon(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    let k = 3f64.sqrt() / 2.0;
    let qx = x.abs();
    let qy = y.abs() * k;
    (qx * k + qy * 0.5).max(qy) - k
}

fn cross(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let t = ctx.params.thickness.clamp(0.05, 1.0);
    let vertical = (x.abs() - t).max(y.abs() - 1.0);
    let horizontal = (x.abs() - 1.0).max(y.abs() - t);
    vertical.min(horizontal)
}

fn crescent(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    let outer = x.hypot(y) - 1.0;
    let bite = (x - 0.45).hypot(y + 0.15) - 0.85;
    outer.max(-bite)
}

fn capsule(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let (px, py) = (x * ctx.ax, y * ctx.ay);
    if ctx.ay >= ctx.ax {
        let half = ctx.ay - 1.0;
        px.hypot((py.abs() - half).max(0.0)) - 1.0
    } else {
        let half = ctx.ax - 1.0;
        (px.abs() - half).max(0.0).hypot(py) - 1.0
    }
}

fn blade(x: f64, y: f64, _: &ShapeCtx) -> f64 {
    // Point at the top widening to full width, then a short straight run.
    let half_width = 0.9 * ((y + 1.0) / 0.6).clamp(0.0, 1.0);
    (x.abs() - half_width).max(y - 1.0).max(-1.0 - y)
}

fn organic(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let angle = y.atan2(x);
    let n = &ctx.noise;
    let wobble = 0.08 * (angle * (2.0 + (n[0] * 3.0).floor()) + n[1] * TAU).sin()
        + 0.06 * (angle * (3.0 + (n[2] * 3.0).floor()) + n[3] * TAU).sin()
        + 0.04 * (angle * (5.0 + (n[4] * 2.0).floor()) + n[5] * TAU).sin();
    x.hypot(y) - (0.8 + wobble).min(1.0)
}

fn lightning(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    const SEGMENTS: usize = 5;
    let t = (ctx.params.thickness * 0.5).clamp(0.05, 0.5);
    let mut best = f64::INFINITY;
    let mut prev = (0.0, -1.0);
    for i in 1..=SEGMENTS {
        let vy = -1.0 + 2.0 * i as f64 / SEGMENTS as f64;
        let vx = if i == SEGMENTS {
            0.0
        } else {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            sign * (0.3 + 0.5 * ctx.noise[i % ctx.noise.len()])
        };
        best = best.min(segment_distance((x, y), prev, (vx, vy)));
        prev = (vx, vy);
    }
    best - t
}

fn wave(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    let t = (ctx.params.thickness * 0.7).clamp(0.05, 0.8);
    let frequency = 1.5 + 1.5 * ctx.noise[0];
    let phase = ctx.noise[1] * TAU;
    let amplitude = 0.4;
    let centre = amplitude * (x * frequency * PI + phase).sin();
    let slope = amplitude * frequency * PI * (x * frequency * PI + phase).cos();
    ((y - centre).abs() / (1.0 + slope * slope).sqrt() - t).max(x.abs() - 1.0)
}

fn spiral(x: f64, y: f64, ctx: &ShapeCtx) -> f64 {
    const TURNS: f64 = 2.5;
    let t = (ctx.params.thickness * 0.35).clamp(0.03, 0.3);
    let b = 1.0 / (TURNS * TAU);
    let r = x.hypot(y);
    let theta = (y.atan2(x) + ctx.noise[0] * TAU).rem_euclid(TAU);
    let k = ((r / b - theta) / TAU).round().max(0.0);
    let d = (r - b * (theta + TAU * k)).abs();
    (d - t).max(r - 1.0)
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    (p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
}

impl ShapeRasterizer for GeometricRasterizer {
    fn rasterize_into(
        &self,
        shape: ShapeKind,
        style: &ShapeStyle,
        target: &mut PixelBuffer,
    ) -> Result<()> {
        let (w, h) = target.size();
        if w == 0 || h == 0 {
            return Err(SpriteError::raster(shape, format!("empty target {}x{}", w, h)));
        }
        if !style.rotation.is_finite() || !style.smoothing.is_finite() {
            return Err(SpriteError::raster(shape, "non-finite rotation or smoothing"));
        }

        let window = style.window.unwrap_or(ShapeWindow {
            width: w,
            height: h,
            x: 0,
            y: 0,
        });
        if window.width == 0 || window.height == 0 {
            return Err(SpriteError::raster(
                shape,
                format!("empty shape box {}x{}", window.width, window.height),
            ));
        }
        let (bw, bh) = (window.width as f64, window.height as f64);

        let min_side = bw.min(bh);
        let mut noise = [0.0; 8];
        if shape.is_seeded() {
            let mut rng = ChaCha8Rng::seed_from_u64(style.seed);
            for n in noise.iter_mut() {
                *n = rng.gen::<f64>();
            }
        }
        let ctx = ShapeCtx {
            ax: bw / min_side,
            ay: bh / min_side,
            params: style.params,
            noise,
        };
        let sdf = sdf_for(shape);

        // Inverse rotation, applied in aspect-corrected space.
        let (sin, cos) = (-style.rotation.to_radians()).sin_cos();
        let pixel = 2.0 / min_side;
        let softness = pixel * (1.0 + 2.0 * style.smoothing.clamp(0.0, 1.0));

        for py in 0..h {
            for px in 0..w {
                let bx = (window.x + px as i64) as f64;
                let by = (window.y + py as i64) as f64;
                let nx = ((bx + 0.5) / bw) * 2.0 - 1.0;
                let ny = ((by + 0.5) / bh) * 2.0 - 1.0;
                let (sx, sy) = (nx * ctx.ax, ny * ctx.ay);
                let rx = (sx * cos - sy * sin) / ctx.ax;
                let ry = (sx * sin + sy * cos) / ctx.ay;

                let coverage = (0.5 - sdf(rx, ry, &ctx) / softness).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    target.set(px, py, style.colour.scale_alpha(coverage));
                }
            }
        }
        Ok(())
    }
}
