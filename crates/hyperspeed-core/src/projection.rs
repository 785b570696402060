use glam::{Vec2, Vec3};

use crate::surface::SurfaceState;

/// Point radius and trail width at the viewer.
pub const MAX_SIZE: f32 = 2.0;
/// Point alpha at the viewer.
pub const MAX_OPACITY: f32 = 0.8;

/// Pinhole projection onto the surface, `fov` acting as focal length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub fov: f32,
    pub center: Vec2,
    /// Depth at which particles are invisible; the surface width.
    pub depth_range: f32,
}

impl Projector {
    pub fn new(fov: f32, surface: &SurfaceState) -> Self {
        Self {
            fov,
            center: surface.center,
            depth_range: surface.width,
        }
    }

    pub fn project(&self, position: Vec3) -> Vec2 {
        position.truncate() / position.z * self.fov + self.center
    }

    pub fn visuals(&self, depth: f32, trail_length: f32) -> DepthVisuals {
        DepthVisuals::from_depth(depth, self.depth_range, trail_length)
    }
}

/// Size and alpha derived from depth. Not clamped: a particle deeper than
/// `depth_range` (possible right after a shrinking resize) gets negative
/// values, which surfaces treat as invisible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthVisuals {
    pub proximity: f32,
    pub size: f32,
    pub opacity: f32,
    pub trail_opacity: f32,
}

impl DepthVisuals {
    pub fn from_depth(depth: f32, depth_range: f32, trail_length: f32) -> Self {
        let proximity = 1.0 - depth / depth_range;
        let opacity = proximity * MAX_OPACITY;
        Self {
            proximity,
            size: proximity * MAX_SIZE,
            opacity,
            trail_opacity: opacity * trail_length,
        }
    }
}
