//! Frame-by-frame animation driver

use crate::stage::Stage;
use ember_core::Result;
use ember_particles::TickReport;
use ember_scene::Renderer;

/// How the driver asks the host for another frame
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting for the host surface
    Idle,
    /// Ticking once per frame
    Running,
}

/// Runs update, render and reschedule once per host frame.
///
/// A failed tick does not reschedule, so the loop stops there.
pub struct AnimationDriver {
    state: DriverState,
    ticks: u64,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self {
            state: DriverState::Idle,
            ticks: 0,
        }
    }
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Leave `Idle`. Returns false if the driver was already running.
    pub fn start(&mut self) -> bool {
        match self.state {
            DriverState::Idle => {
                self.state = DriverState::Running;
                tracing::info!("animation started");
                true
            }
            DriverState::Running => false,
        }
    }

    /// One frame: update the particles, render, then request the next frame.
    ///
    /// Returns `Ok(None)` without touching anything while idle.
    pub fn tick<R, F>(
        &mut self,
        stage: &mut Stage<R>,
        scheduler: &mut F,
    ) -> Result<Option<TickReport>>
    where
        R: Renderer,
        F: FrameScheduler + ?Sized,
    {
        if self.state == DriverState::Idle {
            return Ok(None);
        }

        let report = stage.update();
        stage.render()?;
        self.ticks += 1;
        scheduler.request_frame();
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;
    use ember_core::EmberError;
    use ember_particles::ParticleConfig;

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn stage() -> Stage<RecordingRenderer> {
        Stage::new(RecordingRenderer::default(), ParticleConfig::default(), Some(7))
    }

    #[test]
    fn idle_tick_does_nothing() {
        let mut driver = AnimationDriver::new();
        let mut stage = stage();
        let mut scheduler = CountingScheduler::default();

        let result = driver.tick(&mut stage, &mut scheduler).unwrap();
        assert!(result.is_none());
        assert_eq!(stage.renderer.frames, 0);
        assert_eq!(scheduler.requests, 0);
        assert!(stage.particles.is_empty());
    }

    #[test]
    fn start_happens_once() {
        let mut driver = AnimationDriver::new();
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.start());
        assert!(!driver.start());
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn running_tick_updates_renders_and_reschedules() {
        let mut driver = AnimationDriver::new();
        let mut stage = stage();
        let mut scheduler = CountingScheduler::default();
        driver.start();

        for _ in 0..3 {
            let report = driver.tick(&mut stage, &mut scheduler).unwrap().unwrap();
            assert_eq!(report.spawned, stage.config.num_new_particles);
        }
        assert_eq!(stage.renderer.frames, 3);
        assert_eq!(scheduler.requests, 3);
        assert_eq!(driver.ticks(), 3);
        assert_eq!(stage.particles.live_count(), 3 * stage.config.num_new_particles);
    }

    #[test]
    fn render_failure_stops_the_loop() {
        let mut driver = AnimationDriver::new();
        let mut stage = stage();
        let mut scheduler = CountingScheduler::default();
        driver.start();
        driver.tick(&mut stage, &mut scheduler).unwrap();

        stage.renderer.fail = true;
        let err = driver.tick(&mut stage, &mut scheduler).unwrap_err();
        assert!(matches!(err, EmberError::Render(_)));
        assert_eq!(scheduler.requests, 1);
        assert_eq!(driver.ticks(), 1);
    }
}
