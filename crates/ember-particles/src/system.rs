//! Per-tick particle lifecycle: spawn, integrate, cull

use crate::config::ParticleConfig;
use crate::particle::Particle;
use crate::rand::ParticleRng;
use ember_core::{Color, Vec3};
use ember_scene::{SceneGraph, VisualDesc, VisualHandle};

/// Gravity per unit of `ParticleConfig::gravity`, applied once per tick
pub const GRAVITY_SCALE: f32 = 1e-5;

/// Converts the configured velocity bounds into world units per tick
pub const VELOCITY_SCALE: f32 = 1e-3;

/// Centre of the spawn box
pub const SPAWN_ORIGIN: Vec3 = Vec3::new(0.0, -1.5, 0.0);

const SPAWN_VOLUME_COLOR: Color = Color::new(1.0, 1.0, 0.0);

/// What one call to `ParticleSystem::update` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: usize,
    pub removed: usize,
    pub live: usize,
}

/// Owns the live particles and their scene visuals
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Survivor buffer reused by the cull pass
    scratch: Vec<Particle>,
    rng: ParticleRng,
    spawn_volume: VisualHandle,
}

impl ParticleSystem {
    /// Create an empty system seeded from the operating system
    pub fn new<S: SceneGraph>(scene: &mut S) -> Self {
        Self::with_rng(scene, ParticleRng::from_entropy())
    }

    /// Create an empty system with a deterministic seed
    pub fn with_seed<S: SceneGraph>(scene: &mut S, seed: u64) -> Self {
        Self::with_rng(scene, ParticleRng::new(seed))
    }

    fn with_rng<S: SceneGraph>(scene: &mut S, rng: ParticleRng) -> Self {
        let spawn_volume = scene.add(VisualDesc::wire_box(
            SPAWN_ORIGIN,
            Vec3::ONE,
            SPAWN_VOLUME_COLOR,
        ));
        Self {
            particles: Vec::new(),
            scratch: Vec::new(),
            rng,
            spawn_volume,
        }
    }

    /// Live particles, oldest first
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance the system by one tick.
    ///
    /// Spawns up to `num_new_particles` without exceeding `num_particles`,
    /// then ages and moves every particle (new ones included) and removes
    /// those whose life exceeded `lifetime`. `eye` is the camera position the
    /// discs turn to face.
    pub fn update<S: SceneGraph>(
        &mut self,
        config: &ParticleConfig,
        scene: &mut S,
        eye: Vec3,
    ) -> TickReport {
        let gravity = Vec3::new(0.0, -GRAVITY_SCALE * config.gravity, 0.0);

        let room = config.num_particles.saturating_sub(self.particles.len());
        let spawned = config.num_new_particles.min(room);
        for _ in 0..spawned {
            let particle = self.spawn_particle(config, scene, eye);
            self.particles.push(particle);
        }

        let removed = self.integrate(config.lifetime, gravity, scene, eye);
        self.sync_spawn_volume(config, scene);

        let report = TickReport {
            spawned,
            removed,
            live: self.particles.len(),
        };
        tracing::trace!(
            spawned = report.spawned,
            removed = report.removed,
            live = report.live,
            "particle tick"
        );
        report
    }

    fn spawn_particle<S: SceneGraph>(
        &mut self,
        config: &ParticleConfig,
        scene: &mut S,
        eye: Vec3,
    ) -> Particle {
        let rng = &mut self.rng;
        let jitter = Vec3::new(
            rng.centered(config.horizontal_spawn_var),
            rng.centered(config.vertical_spawn_var),
            rng.centered(config.horizontal_spawn_var),
        );
        let position = SPAWN_ORIGIN + jitter;

        let hv = config.horizontal_velocity;
        let vv = config.vertical_velocity;
        let velocity = Vec3::new(
            rng.range(-hv, hv),
            rng.range(0.5 * vv, vv),
            rng.range(-hv, hv),
        ) * VELOCITY_SCALE;

        let color = if config.random_color {
            rng.color()
        } else {
            config.color
        };

        let visual = scene.add(VisualDesc::disc(position, config.particle_size, color));
        scene.orient_towards(&visual, eye);
        Particle::new(position, velocity, color, visual)
    }

    // Survivors move into `scratch`, which then becomes the live list
    fn integrate<S: SceneGraph>(
        &mut self,
        lifetime: u32,
        gravity: Vec3,
        scene: &mut S,
        eye: Vec3,
    ) -> usize {
        let mut survivors = std::mem::take(&mut self.scratch);
        survivors.clear();
        survivors.reserve(self.particles.len());

        let mut removed = 0;
        for mut particle in self.particles.drain(..) {
            if particle.life > lifetime {
                scene.remove(particle.into_visual());
                removed += 1;
                continue;
            }

            particle.life += 1;
            particle.position += particle.velocity * particle.life as f32;
            scene.set_position(particle.visual(), particle.position);
            scene.orient_towards(particle.visual(), eye);
            particle.velocity += gravity;
            survivors.push(particle);
        }

        self.scratch = std::mem::replace(&mut self.particles, survivors);
        removed
    }

    fn sync_spawn_volume<S: SceneGraph>(&self, config: &ParticleConfig, scene: &mut S) {
        scene.set_scale(
            &self.spawn_volume,
            Vec3::new(
                config.horizontal_spawn_var,
                config.vertical_spawn_var,
                config.horizontal_spawn_var,
            ),
        );
        scene.set_visible(&self.spawn_volume, config.spawn_visible);
    }

    /// Remove every live particle and its visual
    pub fn clear<S: SceneGraph>(&mut self, scene: &mut S) {
        let count = self.particles.len();
        for particle in self.particles.drain(..) {
            scene.remove(particle.into_visual());
        }
        tracing::debug!("cleared {} particles", count);
    }

    /// Apply `config.color` to every live particle unless colors are random
    pub fn recolor<S: SceneGraph>(&mut self, config: &ParticleConfig, scene: &mut S) {
        if config.random_color {
            return;
        }
        for particle in &mut self.particles {
            particle.color = config.color;
            scene.set_color(particle.visual(), config.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ObjectId;
    use ember_scene::{Layer, Scene};
    use std::collections::{HashMap, HashSet};

    const EYE: Vec3 = Vec3::new(0.0, 0.0, 8.0);

    fn scenario_config() -> ParticleConfig {
        ParticleConfig {
            num_particles: 50,
            lifetime: 49,
            num_new_particles: 1,
            gravity: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn first_particle_lives_through_its_lifetime() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 1);
        let config = scenario_config();

        let report = system.update(&config, &mut scene, EYE);
        assert_eq!(report, TickReport { spawned: 1, removed: 0, live: 1 });
        assert_eq!(system.particles()[0].life, 1);
        let first = system.particles()[0].id();

        for _ in 1..50 {
            system.update(&config, &mut scene, EYE);
        }
        assert_eq!(system.live_count(), 50);
        assert_eq!(system.particles()[0].id(), first);
        assert_eq!(system.particles()[0].life, 50);

        let report = system.update(&config, &mut scene, EYE);
        assert_eq!(report.spawned, 0);
        assert_eq!(report.removed, 1);
        assert!(system.live_count() <= 50);
        assert!(system.particles().iter().all(|p| p.id() != first));
        assert!(scene.get(first).is_none());
    }

    #[test]
    fn live_count_never_exceeds_capacity() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 2);
        let mut config = ParticleConfig {
            num_particles: 30,
            num_new_particles: 7,
            lifetime: 20,
            ..Default::default()
        };

        for tick in 0..200 {
            config.num_particles = [30, 5, 100, 0, 64][tick / 40];
            config.num_new_particles = [7, 100, 3, 50, 64][tick / 40];
            let before = system.live_count();
            let report = system.update(&config, &mut scene, EYE);

            assert!(report.spawned <= config.num_new_particles);
            assert!(report.spawned <= config.num_particles.saturating_sub(before));
            assert!(report.live <= config.num_particles.max(before));
            if before <= config.num_particles {
                assert!(report.live <= config.num_particles);
            }
        }
    }

    #[test]
    fn every_live_particle_has_one_visible_disc() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 3);
        let config = ParticleConfig {
            num_particles: 40,
            num_new_particles: 5,
            lifetime: 12,
            spawn_visible: true,
            ..Default::default()
        };

        for _ in 0..100 {
            system.update(&config, &mut scene, EYE);
            assert_eq!(scene.visible_count(Layer::Particles), system.live_count());
            assert_eq!(scene.count(Layer::Particles), system.live_count());
            assert_eq!(scene.count(Layer::Helpers), 1);
            for particle in system.particles() {
                let obj = scene.get(particle.id()).unwrap();
                assert_eq!(obj.position, particle.position);
            }
        }
    }

    #[test]
    fn life_strictly_increases_until_removal() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 4);
        let config = ParticleConfig {
            num_particles: 25,
            num_new_particles: 3,
            lifetime: 10,
            ..Default::default()
        };

        let mut last_life: HashMap<ObjectId, u32> = HashMap::new();
        let mut gone: HashSet<ObjectId> = HashSet::new();
        for _ in 0..80 {
            system.update(&config, &mut scene, EYE);
            let current: HashMap<ObjectId, u32> =
                system.particles().iter().map(|p| (p.id(), p.life)).collect();

            for (id, life) in &current {
                assert!(!gone.contains(id), "particle {id} came back");
                match last_life.get(id) {
                    Some(prev) => assert_eq!(*life, prev + 1),
                    None => assert_eq!(*life, 1),
                }
                assert!(*life <= config.lifetime + 1);
            }
            for id in last_life.keys() {
                if !current.contains_key(id) {
                    gone.insert(*id);
                }
            }
            last_life = current;
        }
        assert!(!gone.is_empty());
    }

    #[test]
    fn random_colors_vary() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 99);
        let config = ParticleConfig {
            num_particles: 100,
            num_new_particles: 100,
            random_color: true,
            ..Default::default()
        };

        system.update(&config, &mut scene, EYE);
        assert_eq!(system.live_count(), 100);
        let distinct: HashSet<[u32; 3]> = system
            .particles()
            .iter()
            .map(|p| p.color.to_array().map(f32::to_bits))
            .collect();
        assert!(distinct.len() >= 95, "only {} distinct colors", distinct.len());
    }

    #[test]
    fn fixed_color_is_used_when_not_random() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 6);
        let mut config = ParticleConfig {
            random_color: false,
            color: Color::GREEN,
            num_new_particles: 10,
            ..Default::default()
        };

        system.update(&config, &mut scene, EYE);
        assert!(system.particles().iter().all(|p| p.color == Color::GREEN));

        config.color = Color::WHITE;
        system.recolor(&config, &mut scene);
        for particle in system.particles() {
            assert_eq!(particle.color, Color::WHITE);
            assert_eq!(scene.get(particle.id()).unwrap().color, Color::WHITE);
        }
    }

    #[test]
    fn lowered_capacity_pauses_spawning() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 7);
        let mut config = ParticleConfig {
            num_particles: 50,
            num_new_particles: 10,
            lifetime: 30,
            ..Default::default()
        };
        for _ in 0..5 {
            system.update(&config, &mut scene, EYE);
        }
        assert_eq!(system.live_count(), 50);

        config.num_particles = 10;
        let mut previous = system.live_count();
        for _ in 0..40 {
            let report = system.update(&config, &mut scene, EYE);
            if previous >= config.num_particles {
                assert_eq!(report.spawned, 0);
            }
            assert!(report.live <= previous.max(config.num_particles));
            previous = report.live;
        }
        assert!(system.live_count() <= 10);
    }

    #[test]
    fn spawns_inside_box_with_upward_velocity() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 8);
        let config = ParticleConfig {
            gravity: 0.0,
            horizontal_velocity: 2.0,
            vertical_velocity: 4.0,
            horizontal_spawn_var: 1.0,
            vertical_spawn_var: 0.2,
            num_new_particles: 50,
            ..Default::default()
        };

        system.update(&config, &mut scene, EYE);
        for particle in system.particles() {
            let v = particle.velocity;
            assert!(v.x.abs() <= 2.0 * VELOCITY_SCALE);
            assert!(v.z.abs() <= 2.0 * VELOCITY_SCALE);
            assert!(v.y >= 2.0 * VELOCITY_SCALE && v.y < 4.0 * VELOCITY_SCALE);

            // Moved once by `velocity * 1` after spawning
            let start = particle.position - v;
            let offset = start - SPAWN_ORIGIN;
            assert!(offset.x.abs() <= 0.5 + 1e-6);
            assert!(offset.y.abs() <= 0.1 + 1e-6);
            assert!(offset.z.abs() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn motion_accumulates_velocity_times_life() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 9);
        let mut config = ParticleConfig {
            gravity: 2.0,
            num_new_particles: 1,
            ..Default::default()
        };

        system.update(&config, &mut scene, EYE);
        config.num_new_particles = 0;
        let p = &system.particles()[0];
        let g = Vec3::new(0.0, -GRAVITY_SCALE * 2.0, 0.0);
        let mut velocity = p.velocity;
        let mut position = p.position;

        for tick in 2..=5u32 {
            system.update(&config, &mut scene, EYE);
            position += velocity * tick as f32;
            velocity += g;
            let p = &system.particles()[0];
            assert_eq!(p.life, tick);
            assert!((p.position - position).length() < 1e-5);
            assert!((p.velocity - velocity).length() < 1e-7);
        }
    }

    #[test]
    fn discs_face_the_eye() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 10);
        let config = ParticleConfig {
            num_new_particles: 5,
            ..Default::default()
        };
        system.update(&config, &mut scene, EYE);
        for particle in system.particles() {
            let obj = scene.get(particle.id()).unwrap();
            let expected = (EYE - particle.position).normalized();
            assert!((obj.facing - expected).length() < 1e-5);
            assert_eq!(obj.scale, Vec3::splat(config.particle_size));
        }
    }

    #[test]
    fn spawn_volume_follows_config() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 11);
        let mut config = ParticleConfig {
            num_new_particles: 0,
            ..Default::default()
        };

        system.update(&config, &mut scene, EYE);
        assert_eq!(scene.visible_count(Layer::Helpers), 0);

        config.spawn_visible = true;
        config.horizontal_spawn_var = 3.0;
        config.vertical_spawn_var = 0.5;
        system.update(&config, &mut scene, EYE);
        assert_eq!(scene.visible_count(Layer::Helpers), 1);
        let (_, helper) = scene
            .objects()
            .find(|(_, o)| o.layer == Layer::Helpers)
            .unwrap();
        assert_eq!(helper.scale, Vec3::new(3.0, 0.5, 3.0));
        assert_eq!(helper.position, SPAWN_ORIGIN);
        assert_eq!(scene.visible_count(Layer::Particles), 0);
    }

    #[test]
    fn clear_unregisters_particle_visuals() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::with_seed(&mut scene, 12);
        let config = ParticleConfig {
            num_new_particles: 20,
            ..Default::default()
        };
        system.update(&config, &mut scene, EYE);
        assert_eq!(scene.count(Layer::Particles), 20);

        system.clear(&mut scene);
        assert!(system.is_empty());
        assert_eq!(scene.count(Layer::Particles), 0);
        assert_eq!(scene.count(Layer::Helpers), 1);
    }
}
