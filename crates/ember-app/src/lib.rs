//! Ember App - the windowed particle emitter
//!
//! Hosts an `ember_runtime::Stage` in a winit window, draws it with
//! `ember_render::SceneRenderer` and exposes the emitter parameters through
//! egui panels.

mod app;
pub mod panels;

pub use app::{EmberApp, LaunchOptions};

#[cfg(test)]
mod tests {
    use ember_particles::ParticleConfig;

    #[test]
    fn sample_emitter_config_loads() {
        let config = ParticleConfig::from_toml_str(include_str!("../emitter.toml"))
            .expect("emitter.toml should be valid");
        assert!(!config.random_color);
        assert!(config.spawn_visible);
        assert_eq!(config.num_particles, 800);
    }
}
