use glam::Vec2;
use hyperspeed_platform::{DrawingSurface, Rgba};

use crate::config::StarFieldConfig;
use crate::particle::Particle;
use crate::projection::Projector;
use crate::surface::SurfaceState;

/// Issues the per-frame fade and per-particle trail and point draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    pub trail_length: f32,
    pub fade_alpha: f32,
    /// Base color for points and trails; alpha comes from depth.
    pub color: Rgba,
}

impl Renderer {
    pub fn new(trail_length: f32, fade_alpha: f32) -> Self {
        Self {
            trail_length,
            fade_alpha,
            color: Rgba::WHITE,
        }
    }

    pub fn from_config(config: &StarFieldConfig) -> Self {
        let mut renderer = Self::new(config.trail_length, config.fade_alpha);
        if config.use_star_color {
            renderer.color = Rgba::from(config.star_color).with_alpha(1.0);
        }
        renderer
    }

    /// Translucent black over the whole surface; earlier frames fade into trails.
    pub fn fade(&self, surface: &mut dyn DrawingSurface, state: &SurfaceState) {
        surface.fill_rect(
            Vec2::ZERO,
            Vec2::new(state.width, state.height),
            Rgba::BLACK.with_alpha(self.fade_alpha),
        );
    }

    /// Draw the trail from last frame's projection (if any), then the point.
    /// Returns the projection used this frame.
    pub fn draw_particle(
        &self,
        surface: &mut dyn DrawingSurface,
        projector: &Projector,
        particle: &Particle,
    ) -> Vec2 {
        let screen = projector.project(particle.position);
        let visuals = projector.visuals(particle.position.z, self.trail_length);

        if let Some(prev) = particle.prev_screen {
            surface.stroke_line(
                prev,
                screen,
                visuals.size,
                self.color.with_alpha(visuals.trail_opacity),
            );
        }
        surface.fill_circle(screen, visuals.size, self.color.with_alpha(visuals.opacity));
        screen
    }
}
