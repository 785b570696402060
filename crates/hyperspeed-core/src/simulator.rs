//! Star field state machine: `Uninitialized -> Running -> Destroyed`, with
//! resizes applied in place while running.

use crossbeam_channel::Receiver;
use hyperspeed_platform::{
    DrawingSurface, FrameScheduler, FrameToken, SubscriptionId, SurfaceLocator, ViewportSize,
    ViewportSource,
};
use tracing::{debug, error, info, trace, warn};

use crate::config::StarFieldConfig;
use crate::error::{Error, Result};
use crate::particle::{Particle, ParticleStore};
use crate::projection::Projector;
use crate::random::RandomSource;
use crate::render::Renderer;
use crate::stepper::Stepper;
use crate::surface::SurfaceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Uninitialized,
    Running,
    Destroyed,
}

/// Everything the simulator needs from its host besides the surface.
pub struct Collaborators {
    pub scheduler: Box<dyn FrameScheduler>,
    pub viewport: Box<dyn ViewportSource>,
    pub random: Box<dyn RandomSource>,
}

pub struct StarFieldSimulator<S: DrawingSurface> {
    surface: S,
    scheduler: Box<dyn FrameScheduler>,
    viewport: Box<dyn ViewportSource>,
    random: Box<dyn RandomSource>,
    config: StarFieldConfig,
    renderer: Renderer,
    speed: f32,
    store: ParticleStore,
    surface_state: SurfaceState,
    state: SimulatorState,
    pending_frame: Option<FrameToken>,
    subscription: Option<SubscriptionId>,
    resize_events: Option<Receiver<ViewportSize>>,
    frames: u64,
}

impl<S: DrawingSurface> StarFieldSimulator<S> {
    /// Resolve `surface_id` and validate `config`. Nothing is drawn or
    /// scheduled until [`StarFieldSimulator::start`].
    pub fn new<L>(
        surface_id: &str,
        locator: &mut L,
        collaborators: Collaborators,
        config: StarFieldConfig,
    ) -> Result<Self>
    where
        L: SurfaceLocator<Surface = S> + ?Sized,
    {
        config.validate()?;
        let Some(surface) = locator.locate(surface_id) else {
            error!("Drawing surface {:?} not found; star field not started", surface_id);
            return Err(Error::SurfaceNotFound {
                id: surface_id.to_owned(),
            });
        };

        let Collaborators {
            scheduler,
            viewport,
            random,
        } = collaborators;
        Ok(Self {
            surface,
            scheduler,
            viewport,
            random,
            renderer: Renderer::from_config(&config),
            speed: config.speed,
            config,
            store: ParticleStore::new(),
            surface_state: SurfaceState::default(),
            state: SimulatorState::Uninitialized,
            pending_frame: None,
            subscription: None,
            resize_events: None,
            frames: 0,
        })
    }

    /// Size the surface to the viewport, populate the particles, subscribe to
    /// resizes and request the first frame.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SimulatorState::Uninitialized => {}
            SimulatorState::Running => {
                warn!("start() called on a running star field; ignoring");
                return Ok(());
            }
            SimulatorState::Destroyed => {
                warn!("start() called on a destroyed star field; ignoring");
                return Ok(());
            }
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        let subscription = self.viewport.subscribe(sender).map_err(Error::Platform)?;
        self.subscription = Some(subscription);
        self.resize_events = Some(receiver);

        self.apply_size(self.viewport.size());
        self.store.initialize(
            self.config.particle_count,
            &self.surface_state,
            self.random.as_mut(),
        );
        for issue in self.config.degenerate_settings() {
            warn!("Degenerate star field configuration: {issue}");
        }

        self.state = SimulatorState::Running;
        self.pending_frame = Some(self.scheduler.request_frame());
        info!(
            "Star field started => {} particles on {}x{} surface",
            self.store.len(),
            self.surface_state.width,
            self.surface_state.height
        );
        Ok(())
    }

    /// Frame callback. Only the currently pending token of a running
    /// simulator does any work.
    pub fn on_frame(&mut self, token: FrameToken) {
        if self.state != SimulatorState::Running {
            debug!("Frame {:?} ignored in state {:?}", token, self.state);
            return;
        }
        if self.pending_frame != Some(token) {
            warn!(
                "Stale frame {:?} ignored (pending {:?})",
                token, self.pending_frame
            );
            return;
        }
        self.pending_frame = None;

        self.drain_resize_events();
        self.render_frame();
        self.frames += 1;
        trace!("Frame {} done", self.frames);

        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Apply new viewport dimensions. Particles keep their offsets relative
    /// to the new center until they recycle.
    pub fn on_resize(&mut self, size: ViewportSize) {
        if self.state == SimulatorState::Destroyed {
            warn!("on_resize() after destroy; ignoring");
            return;
        }
        self.apply_size(size);
        debug!(
            "Star field resized => {}x{}, center ({}, {})",
            size.width, size.height, self.surface_state.center.x, self.surface_state.center.y
        );
    }

    /// Takes effect on the next step.
    pub fn set_speed(&mut self, speed: f32) {
        if self.state == SimulatorState::Destroyed {
            warn!("set_speed() after destroy; ignoring");
            return;
        }
        if !speed.is_finite() {
            warn!("set_speed({speed}) rejected: speed must be finite");
            return;
        }
        if speed <= 0.0 {
            warn!("Speed set to {speed}; particles will not reach the viewer");
        }
        debug!("Speed {} -> {}", self.speed, speed);
        self.speed = speed;
    }

    /// Reconfigure the particle count, respawning every particle.
    pub fn resize_store(&mut self, count: usize) {
        if self.state == SimulatorState::Destroyed {
            warn!("resize_store() after destroy; ignoring");
            return;
        }
        self.config.particle_count = count;
        if self.state == SimulatorState::Running {
            self.store
                .initialize(count, &self.surface_state, self.random.as_mut());
        }
        debug!("Particle count set to {count}");
    }

    /// Cancel the pending frame, release the resize subscription and clear
    /// the surface. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.state == SimulatorState::Destroyed {
            return;
        }
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        if let Some(id) = self.subscription.take() {
            if let Err(err) = self.viewport.unsubscribe(id) {
                warn!("Failed to release resize subscription {id:?}: {err}");
            }
        }
        self.resize_events = None;
        self.surface.clear();
        self.state = SimulatorState::Destroyed;
        info!("Star field destroyed after {} frames", self.frames);
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn config(&self) -> &StarFieldConfig {
        &self.config
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.surface_state
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn apply_size(&mut self, size: ViewportSize) {
        if size.is_empty() {
            warn!(
                "Surface is {}x{}; nothing will be visible",
                size.width, size.height
            );
        }
        self.surface.resize(size);
        self.surface_state = SurfaceState::from_size(size);
    }

    fn drain_resize_events(&mut self) {
        let latest = self
            .resize_events
            .as_ref()
            .and_then(|events| events.try_iter().last());
        if let Some(size) = latest {
            self.on_resize(size);
        }
    }

    fn render_frame(&mut self) {
        let projector = Projector::new(self.config.fov, &self.surface_state);
        let stepper = Stepper::new(self.speed, self.config.recycle_depth);

        self.renderer.fade(&mut self.surface, &self.surface_state);
        for particle in self.store.iter_mut() {
            let screen = self
                .renderer
                .draw_particle(&mut self.surface, &projector, particle);
            stepper.step(
                particle,
                screen,
                &self.surface_state,
                self.random.as_mut(),
            );
        }
    }
}
