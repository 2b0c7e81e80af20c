//! Pixel buffer - the output of every generation step.

use image::{ImageBuffer, RgbaImage};

use super::Colour;

/// A row-major grid of straight-alpha RGBA colours.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Colour>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Colour::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Create a buffer from row-major pixels.
    ///
    /// Returns `None` when the pixel count does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Colour>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the buffer has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Whether the pixel storage agrees with the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Overwrite a pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = colour;
        }
    }

    /// Source-over blend a colour into one pixel; out-of-bounds writes are ignored.
    pub fn blend(&mut self, x: i64, y: i64, colour: Colour, opacity: f64) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(i) = self.index(x as u32, y as u32) {
            self.pixels[i] = self.pixels[i].blend_over(colour, opacity);
        }
    }

    /// Reset every pixel to transparent, keeping the allocation.
    pub fn clear(&mut self) {
        self.pixels.fill(Colour::TRANSPARENT);
    }

    /// Get a reference to the flat pixel storage.
    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Colour]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|c| c.a > 0).count()
    }

    /// Composite `source` onto this buffer with its top-left corner at `(offset_x, offset_y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn composite(&mut self, source: &PixelBuffer, offset_x: i64, offset_y: i64, opacity: f64) {
        if opacity <= 0.0 {
            return;
        }
        for sy in 0..source.height {
            let dy = offset_y + sy as i64;
            if dy < 0 {
                continue;
            }
            if dy >= self.height as i64 {
                break;
            }
            for sx in 0..source.width {
                let dx = offset_x + sx as i64;
                if dx < 0 {
                    continue;
                }
                if dx >= self.width as i64 {
                    break;
                }
                if let Some(pixel) = source.get(sx, sy) {
                    if pixel.a > 0 {
                        self.blend(dx, dy, pixel, opacity);
                    }
                }
            }
        }
    }

    /// Convert to a flat RGBA byte buffer.
    pub fn to_rgba_buffer(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.pixels.len() * 4);
        for colour in &self.pixels {
            buffer.extend_from_slice(&colour.to_rgba());
        }
        buffer
    }

    /// Convert to an in-memory `image` buffer for downstream consumers.
    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.get(x, y).unwrap_or(Colour::TRANSPARENT).to_rgba())
        })
    }
}
