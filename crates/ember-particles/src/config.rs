//! Emitter configuration: a live-edited snapshot, optionally loaded from TOML

use ember_core::{Color, EmberError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Valid ranges for the numeric fields, shared with the control panel sliders
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const GRAVITY: RangeInclusive<f32> = 0.0..=10.0;
    pub const HORIZONTAL_VELOCITY: RangeInclusive<f32> = 0.0..=10.0;
    pub const VERTICAL_VELOCITY: RangeInclusive<f32> = 0.0..=10.0;
    pub const PARTICLE_SIZE: RangeInclusive<f32> = 0.005..=1.0;
    pub const NUM_PARTICLES: RangeInclusive<usize> = 0..=10_000;
    pub const LIFETIME: RangeInclusive<u32> = 1..=1_000;
    pub const NUM_NEW_PARTICLES: RangeInclusive<usize> = 0..=100;
    pub const HORIZONTAL_SPAWN_VAR: RangeInclusive<f32> = 0.0..=10.0;
    pub const VERTICAL_SPAWN_VAR: RangeInclusive<f32> = 0.0..=10.0;
}

/// Emitter parameters, read by the particle system every tick.
///
/// Every field is independent of the others, so the panel may edit them in
/// any order between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleConfig {
    /// Strength of the downward pull
    pub gravity: f32,
    /// Bound on the initial sideways speed (x and z)
    pub horizontal_velocity: f32,
    /// Bound on the initial upward speed
    pub vertical_velocity: f32,
    /// Disc radius of newly spawned particles
    pub particle_size: f32,
    /// Capacity: maximum number of live particles
    pub num_particles: usize,
    /// Particles older than this many ticks are removed
    pub lifetime: u32,
    /// Particles spawned per tick while below capacity
    pub num_new_particles: usize,
    /// Width and depth of the spawn box
    pub horizontal_spawn_var: f32,
    /// Height of the spawn box
    pub vertical_spawn_var: f32,
    /// Show the spawn box outline
    pub spawn_visible: bool,
    /// Pick a random color per particle instead of `color`
    pub random_color: bool,
    pub color: Color,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            horizontal_velocity: 1.0,
            vertical_velocity: 1.0,
            particle_size: 0.05,
            num_particles: 500,
            lifetime: 100,
            num_new_particles: 2,
            horizontal_spawn_var: 1.0,
            vertical_spawn_var: 0.2,
            spawn_visible: false,
            random_color: true,
            color: Color::RED,
        }
    }
}

impl ParticleConfig {
    /// Parse a TOML emitter table. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse an emitter file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every numeric field against its documented range
    pub fn validate(&self) -> Result<()> {
        check_f32("gravity", self.gravity, ranges::GRAVITY)?;
        check_f32(
            "horizontal_velocity",
            self.horizontal_velocity,
            ranges::HORIZONTAL_VELOCITY,
        )?;
        check_f32(
            "vertical_velocity",
            self.vertical_velocity,
            ranges::VERTICAL_VELOCITY,
        )?;
        check_f32("particle_size", self.particle_size, ranges::PARTICLE_SIZE)?;
        check_count("num_particles", self.num_particles, ranges::NUM_PARTICLES)?;
        check_count("lifetime", self.lifetime as usize, widen_u32(ranges::LIFETIME))?;
        check_count(
            "num_new_particles",
            self.num_new_particles,
            ranges::NUM_NEW_PARTICLES,
        )?;
        check_f32(
            "horizontal_spawn_var",
            self.horizontal_spawn_var,
            ranges::HORIZONTAL_SPAWN_VAR,
        )?;
        check_f32(
            "vertical_spawn_var",
            self.vertical_spawn_var,
            ranges::VERTICAL_SPAWN_VAR,
        )?;
        for (name, value) in [
            ("color.r", self.color.r),
            ("color.g", self.color.g),
            ("color.b", self.color.b),
        ] {
            check_f32(name, value, 0.0..=1.0)?;
        }
        Ok(())
    }

    /// Copy with every numeric field clamped into its range
    pub fn clamped(&self) -> Self {
        Self {
            gravity: clamp_f32(self.gravity, ranges::GRAVITY),
            horizontal_velocity: clamp_f32(self.horizontal_velocity, ranges::HORIZONTAL_VELOCITY),
            vertical_velocity: clamp_f32(self.vertical_velocity, ranges::VERTICAL_VELOCITY),
            particle_size: clamp_f32(self.particle_size, ranges::PARTICLE_SIZE),
            num_particles: self
                .num_particles
                .clamp(*ranges::NUM_PARTICLES.start(), *ranges::NUM_PARTICLES.end()),
            lifetime: self
                .lifetime
                .clamp(*ranges::LIFETIME.start(), *ranges::LIFETIME.end()),
            num_new_particles: self.num_new_particles.clamp(
                *ranges::NUM_NEW_PARTICLES.start(),
                *ranges::NUM_NEW_PARTICLES.end(),
            ),
            horizontal_spawn_var: clamp_f32(
                self.horizontal_spawn_var,
                ranges::HORIZONTAL_SPAWN_VAR,
            ),
            vertical_spawn_var: clamp_f32(self.vertical_spawn_var, ranges::VERTICAL_SPAWN_VAR),
            spawn_visible: self.spawn_visible,
            random_color: self.random_color,
            color: self.color.clamped(),
        }
    }
}

fn widen_u32(range: RangeInclusive<u32>) -> RangeInclusive<usize> {
    *range.start() as usize..=*range.end() as usize
}

fn check_f32(field: &str, value: f32, range: RangeInclusive<f32>) -> Result<()> {
    // NaN fails `contains` too
    if range.contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value as f64, *range.start() as f64, *range.end() as f64))
    }
}

fn check_count(field: &str, value: usize, range: RangeInclusive<usize>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value as f64, *range.start() as f64, *range.end() as f64))
    }
}

fn out_of_range(field: &str, value: f64, min: f64, max: f64) -> EmberError {
    EmberError::ValueOutOfRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}

fn clamp_f32(value: f32, range: RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
