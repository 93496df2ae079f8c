//! Render statistics panel: FPS counter, frame timing and live particle count
//!
//! Samples are taken once per completed animation tick, so the particle count
//! shown is what the emitter held after that tick's cull.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame rate over a sliding one-second window plus the live particle count
pub struct RenderStats {
    frame_times: VecDeque<Instant>,
    fps: f32,
    last_update: Instant,
    live_particles: usize,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            frame_times: VecDeque::new(),
            fps: 0.0,
            last_update: Instant::now(),
            live_particles: 0,
        }
    }
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a frame was rendered with `live` particles on screen
    pub fn record_frame(&mut self, live: usize) {
        self.record_frame_at(Instant::now(), live);
    }

    fn record_frame_at(&mut self, now: Instant, live: usize) {
        self.frame_times.push_back(now);
        self.live_particles = live;

        // Keep only frames from the last second
        if let Some(cutoff) = now.checked_sub(Duration::from_secs(1)) {
            while self.frame_times.front().is_some_and(|&t| t < cutoff) {
                self.frame_times.pop_front();
            }
        }

        // Update FPS every 250ms
        if now.duration_since(self.last_update).as_millis() > 250 {
            self.fps = self.frame_times.len() as f32;
            self.last_update = now;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Draw the stats UI
    pub fn ui(&self, ui: &mut egui::Ui) {
        ui.monospace(format!("FPS: {:.0}", self.fps));
        if self.fps > 0.0 {
            ui.monospace(format!("Frame: {:.1}ms", 1000.0 / self.fps));
        }
        ui.monospace(format!("Particles: {}", self.live_particles));
    }
}
