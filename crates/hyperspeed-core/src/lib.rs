//! Hyperspeed core engine: platform-agnostic star field simulation, projection and rendering.

pub mod config;
pub mod error;
pub mod particle;
pub mod projection;
pub mod random;
pub mod render;
pub mod simulator;
pub mod stepper;
pub mod surface;

pub use config::{ConfigError, RecycleDepth, StarFieldConfig};
pub use error::{Error, Result};
pub use particle::{create_particle, Particle, ParticleStore};
pub use projection::{DepthVisuals, Projector};
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use render::Renderer;
pub use simulator::{Collaborators, SimulatorState, StarFieldSimulator};
pub use stepper::{StepOutcome, Stepper};
pub use surface::SurfaceState;
