//! Ember - particle emitter with live parameter tuning
//!
//! Usage:
//!   ember [--config <emitter.toml>] [--shader <disc.wgsl>] [--seed <n>] [--width <px>] [--height <px>]

use anyhow::{Context, Result};
use clap::Parser;
use ember_app::{EmberApp, LaunchOptions};
use ember_particles::ParticleConfig;
use ember_scene::ShaderSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Particle emitter and renderer with live parameter tuning")]
struct Args {
    /// Emitter configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// WGSL disc shader exporting `vs_main` and `fs_main`
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Seed for deterministic spawning
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ember=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ParticleConfig::load(path)
            .with_context(|| format!("Failed to load emitter config {}", path.display()))?,
        None => ParticleConfig::default(),
    };

    let shader = match &args.shader {
        Some(path) => ShaderSource::load(path)
            .with_context(|| format!("Failed to load shader {}", path.display()))?,
        None => ember_render::default_disc_shader(),
    };

    tracing::info!(
        num_particles = config.num_particles,
        lifetime = config.lifetime,
        seed = ?args.seed,
        "starting ember"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = EmberApp::new(LaunchOptions {
        config,
        shader,
        seed: args.seed,
        width: args.width.max(1),
        height: args.height.max(1),
    });
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.take_error() {
        return Err(err);
    }
    Ok(())
}
