//! Ember Particles - per-tick particle lifecycle
//!
//! Provides the emitter core:
//! - `ParticleConfig` - live-tunable emitter parameters, loadable from TOML
//! - `Particle` - one live particle owning its scene visual
//! - `ParticleSystem` - spawn, integrate and cull, one discrete step per tick
//! - `ParticleRng` - seeded uniform sampling for spawn jitter and colors

pub mod config;
mod particle;
pub mod rand;
mod system;

pub use config::ParticleConfig;
pub use particle::Particle;
pub use system::{ParticleSystem, TickReport, GRAVITY_SCALE, SPAWN_ORIGIN, VELOCITY_SCALE};
