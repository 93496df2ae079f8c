//! Owned state shared by the driver, the viewport and the control panel

use ember_core::Result;
use ember_particles::{ParticleConfig, ParticleSystem, TickReport};
use ember_scene::{Camera, Renderer, Scene};

/// Everything one running emitter needs, owned in one place.
///
/// Only touched from the event-loop thread: the control panel edits `config`
/// between ticks and the driver reads it during them.
pub struct Stage<R: Renderer> {
    pub scene: Scene,
    pub camera: Camera,
    pub renderer: R,
    pub particles: ParticleSystem,
    pub config: ParticleConfig,
}

impl<R: Renderer> Stage<R> {
    /// Build a stage around `renderer`. A `seed` makes spawning deterministic.
    pub fn new(renderer: R, config: ParticleConfig, seed: Option<u64>) -> Self {
        let mut scene = Scene::new();
        let particles = match seed {
            Some(seed) => ParticleSystem::with_seed(&mut scene, seed),
            None => ParticleSystem::new(&mut scene),
        };
        Self {
            scene,
            camera: Camera::new(),
            renderer,
            particles,
            config,
        }
    }

    /// Advance the particles one step
    pub fn update(&mut self) -> TickReport {
        let eye = self.camera.position;
        self.particles.update(&self.config, &mut self.scene, eye)
    }

    /// Draw the current scene
    pub fn render(&mut self) -> Result<()> {
        self.renderer.render(&self.scene, &self.camera)
    }

    /// Replace the emitter settings, pulling out-of-range fields back into range
    pub fn apply_config(&mut self, config: ParticleConfig) {
        let clamped = config.clamped();
        if clamped != config {
            tracing::debug!("emitter settings clamped into range");
        }
        self.config = clamped;
    }

    /// Drop every live particle
    pub fn clear_particles(&mut self) {
        self.particles.clear(&mut self.scene);
    }

    /// Push the configured color to live particles
    pub fn recolor(&mut self) {
        self.particles.recolor(&self.config, &mut self.scene);
    }
}
