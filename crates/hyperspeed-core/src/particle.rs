use glam::{Vec2, Vec3};

use crate::random::RandomSource;
use crate::surface::SurfaceState;

/// One star. `position.x/y` are offsets from the forward axis in surface
/// pixels, `position.z` is the depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Screen projection from the previous frame; `None` right after (re)spawn.
    pub prev_screen: Option<Vec2>,
}

impl Particle {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            prev_screen: None,
        }
    }
}

/// Spawn a particle uniformly over the surface extent, centered on the
/// vanishing point, at a depth in `(0, width]`.
pub fn create_particle(surface: &SurfaceState, random: &mut dyn RandomSource) -> Particle {
    let x = random.next_unit() * surface.width - surface.center.x;
    let y = random.next_unit() * surface.height - surface.center.y;
    // (1 - u) keeps z off zero for u in [0, 1).
    let z = (1.0 - random.next_unit()) * surface.width;
    Particle::new(Vec3::new(x, y, z))
}

/// Fixed-size particle set. Its length only changes through [`ParticleStore::initialize`].
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(count: usize, surface: &SurfaceState, random: &mut dyn RandomSource) -> Self {
        let mut store = Self::new();
        store.initialize(count, surface, random);
        store
    }

    /// Replace every particle with `count` fresh ones.
    pub fn initialize(&mut self, count: usize, surface: &SurfaceState, random: &mut dyn RandomSource) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(create_particle(surface, random));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SeededRandom};
    use hyperspeed_platform::ViewportSize;
    use pretty_assertions::assert_eq;

    fn surface(width: f32, height: f32) -> SurfaceState {
        SurfaceState::from_size(ViewportSize::new(width, height))
    }

    #[test]
    fn midpoint_draw_spawns_on_axis_at_half_depth() {
        let particle = create_particle(&surface(800.0, 600.0), &mut FixedRandom(0.5));
        assert_eq!(particle.position, Vec3::new(0.0, 0.0, 400.0));
        assert_eq!(particle.prev_screen, None);
    }

    #[test]
    fn zero_draw_spawns_on_far_plane_in_top_left() {
        let particle = create_particle(&surface(800.0, 600.0), &mut FixedRandom(0.0));
        assert_eq!(particle.position, Vec3::new(-400.0, -300.0, 800.0));
    }

    #[test]
    fn spawned_particles_stay_inside_the_surface_volume() {
        let state = surface(640.0, 480.0);
        let mut random = SeededRandom::from_seed(3);
        for _ in 0..500 {
            let p = create_particle(&state, &mut random).position;
            assert!(p.x >= -320.0 && p.x <= 320.0);
            assert!(p.y >= -240.0 && p.y <= 240.0);
            assert!(p.z > 0.0 && p.z <= 640.0);
        }
    }

    #[test]
    fn initialize_replaces_contents_with_exact_count() {
        let state = surface(800.0, 600.0);
        let mut random = SeededRandom::from_seed(11);
        let mut store = ParticleStore::with_count(25, &state, &mut random);
        assert_eq!(store.len(), 25);

        store.initialize(4, &state, &mut random);
        assert_eq!(store.len(), 4);
        assert!(store.iter().all(|p| p.prev_screen.is_none()));

        store.initialize(0, &state, &mut random);
        assert!(store.is_empty());
    }
}
