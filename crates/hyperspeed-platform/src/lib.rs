//! Platform abstraction traits so `hyperspeed-core` stays display-agnostic.

use crossbeam_channel::Sender;
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Dimensions of a viewport or drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Straight (non-premultiplied) color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// True when drawing with this color leaves the surface untouched.
    pub fn is_invisible(&self) -> bool {
        !(self.a > 0.0)
    }
}

impl From<Vec4> for Rgba {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

/// Handle for one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameToken(pub u64);

/// Handle returned when subscribing to viewport changes; the same value
/// must be handed back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// 2D drawing target. Non-positive widths/radii, invisible colors and
/// non-finite coordinates draw nothing.
pub trait DrawingSurface {
    fn size(&self) -> ViewportSize;
    /// Resize the backing store. Like a canvas, resizing discards its content.
    fn resize(&mut self, size: ViewportSize);
    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn clear(&mut self);
}

/// Resolves a surface identifier to a drawing surface.
pub trait SurfaceLocator {
    type Surface: DrawingSurface;

    fn locate(&mut self, id: &str) -> Option<Self::Surface>;
}

/// Request-next-frame primitive. At most one request is pending at a time.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Source of the current viewport size and of resize notifications.
pub trait ViewportSource {
    fn size(&self) -> ViewportSize;
    fn subscribe(&mut self, listener: Sender<ViewportSize>) -> Result<SubscriptionId>;
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()>;
}
