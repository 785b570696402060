use glam::Vec2;

use crate::config::RecycleDepth;
use crate::particle::{create_particle, Particle};
use crate::random::RandomSource;
use crate::surface::SurfaceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    Recycled,
}

/// Moves particles toward the viewer and recycles the ones that pass it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    /// Depth units per frame. Non-positive speeds are allowed; particles then never recycle.
    pub speed: f32,
    pub recycle: RecycleDepth,
}

impl Stepper {
    pub fn new(speed: f32, recycle: RecycleDepth) -> Self {
        Self { speed, recycle }
    }

    /// Advance one particle by one frame.
    ///
    /// `screen` is the particle's projection at its current depth, as drawn
    /// this frame; it becomes the next frame's trail start. A particle
    /// reaching `z <= 0` is respawned in place with no trail memory, so no
    /// projection ever divides by a non-positive depth.
    pub fn step(
        &self,
        particle: &mut Particle,
        screen: Vec2,
        surface: &SurfaceState,
        random: &mut dyn RandomSource,
    ) -> StepOutcome {
        particle.prev_screen = Some(screen);
        particle.position.z -= self.speed;

        if particle.position.z > 0.0 {
            return StepOutcome::Advanced;
        }

        *particle = match self.recycle {
            RecycleDepth::Random => create_particle(surface, random),
            RecycleDepth::Far => {
                let mut fresh = create_particle(surface, random);
                fresh.position.z = surface.width;
                fresh
            }
        };
        StepOutcome::Recycled
    }
}
