use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use hyperspeed_platform::{DrawingSurface, Result, Rgba, ViewportSize};
use tracing::info;

/// One RGBA8 texel, straight alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

/// Software raster target with canvas-like source-over blending.
/// Starts (and resizes to) fully transparent.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = self
            .to_image()
            .ok_or("pixel buffer does not match surface dimensions")?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        let dst = self.pixels[index];
        let dst_a = dst.a as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        let channel = |src: f32, dst: u8| {
            let dst = dst as f32 / 255.0;
            let value = (src.clamp(0.0, 1.0) * alpha + dst * dst_a * (1.0 - alpha)) / out_a;
            (value * 255.0).round() as u8
        };
        self.pixels[index] = Pixel {
            r: channel(color.r, dst.r),
            g: channel(color.g, dst.g),
            b: channel(color.b, dst.b),
            a: (out_a * 255.0).round() as u8,
        };
    }

    /// Pixel index range covering `[min, max]`, clipped to `limit`.
    fn span(min: f32, max: f32, limit: u32) -> std::ops::Range<i64> {
        let start = (min.floor() as i64).max(0);
        let end = (max.ceil() as i64).min(limit as i64);
        start..end.max(start)
    }
}

impl DrawingSurface for PixelSurface {
    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.width as f32, self.height as f32)
    }

    fn resize(&mut self, size: ViewportSize) {
        let width = size.width.max(0.0) as u32;
        let height = size.height.max(0.0) as u32;
        *self = Self::new(width, height);
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        if color.is_invisible() || !origin.is_finite() || !extent.is_finite() {
            return;
        }
        let min = origin.min(origin + extent);
        let max = origin.max(origin + extent);
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if color.is_invisible() || !(width > 0.0) || !from.is_finite() || !to.is_finite() {
            return;
        }
        // Hairlines still touch one pixel across, at reduced coverage.
        let half = (width / 2.0).max(0.5);
        let coverage = width.min(1.0);
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let segment = to - from;
        let length_sq = segment.length_squared();
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if length_sq > 0.0 {
                    ((sample - from).dot(segment) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if sample.distance(from + segment * t) <= half {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if color.is_invisible() || !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let mut covered = false;
        for y in Self::span(center.y - radius, center.y + radius, self.height) {
            for x in Self::span(center.x - radius, center.x + radius, self.width) {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if sample.distance(center) <= radius {
                    self.blend(x, y, color, 1.0);
                    covered = true;
                }
            }
        }
        if !covered {
            // Sub-pixel dot: spread its area onto the pixel it sits in.
            let area = (std::f32::consts::PI * radius * radius).min(1.0);
            self.blend(center.x.floor() as i64, center.y.floor() as i64, color, area);
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Pixel::TRANSPARENT);
    }
}
