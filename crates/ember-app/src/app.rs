//! winit application hosting the emitter

use crate::panels::{ControlPanel, PanelActions, RenderStats};
use anyhow::Context;
use ember_core::EmberError;
use ember_particles::ParticleConfig;
use ember_render::{OverlayFrame, RenderContext, SceneRenderer};
use ember_runtime::{AnimationDriver, FrameScheduler, Stage, Viewport};
use ember_scene::ShaderSource;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

/// Everything decided before the window exists
pub struct LaunchOptions {
    pub config: ParticleConfig,
    pub shader: ShaderSource,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
}

/// Redraw requests go through the window
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

pub struct EmberApp {
    options: LaunchOptions,

    window: Option<Arc<Window>>,
    stage: Option<Stage<SceneRenderer>>,
    driver: AnimationDriver,
    viewport: Viewport,

    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    controls: ControlPanel,
    stats: RenderStats,

    error: Option<anyhow::Error>,
}

impl EmberApp {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            options,
            window: None,
            stage: None,
            driver: AnimationDriver::new(),
            viewport: Viewport::new(),
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            controls: ControlPanel::new(),
            stats: RenderStats::new(),
            error: None,
        }
    }

    /// The error that ended the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Ember")
            .with_inner_size(PhysicalSize::new(self.options.width, self.options.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| EmberError::MissingSurface(e.to_string()))?,
        );

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .map_err(EmberError::from)
            .context("Failed to create render context")?;
        let renderer = SceneRenderer::new(render_context, &self.options.shader)
            .map_err(EmberError::from)
            .context("Failed to create scene renderer")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let mut stage = Stage::new(renderer, self.options.config.clone(), self.options.seed);
        let size = window.inner_size();
        self.viewport
            .apply(size.width, size.height, &mut stage.camera, &mut stage.renderer);

        tracing::info!(
            width = size.width,
            height = size.height,
            shader = %self.options.shader.label,
            "window ready"
        );

        self.window = Some(window.clone());
        self.stage = Some(stage);
        self.egui_winit = Some(egui_winit);

        self.driver.start();
        window.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    // Runs the panels, then one driver tick
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(stage) = self.stage.as_mut() else {
            return;
        };

        if let Some(egui_winit) = &mut self.egui_winit {
            let raw_input = egui_winit.take_egui_input(&window);

            let controls = &mut self.controls;
            let stats = &self.stats;
            let mut config = stage.config.clone();
            let mut actions = PanelActions::default();

            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                actions = controls.show(ctx, &mut config);

                egui::TopBottomPanel::bottom("stats_panel")
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| stats.ui(ui));
                    });
            });

            egui_winit.handle_platform_output(&window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            stage.renderer.set_overlay(OverlayFrame {
                paint_jobs,
                textures_delta: full_output.textures_delta,
                pixels_per_point: full_output.pixels_per_point,
            });

            stage.apply_config(config);
            if actions.clear {
                stage.clear_particles();
            }
            if actions.recolor {
                stage.recolor();
            }
        }

        let mut scheduler = WindowScheduler(&window);
        match self.driver.tick(stage, &mut scheduler) {
            Ok(Some(_)) => self.stats.record_frame(stage.particles.live_count()),
            Ok(None) => {}
            Err(e) => {
                let err = anyhow::Error::new(e).context("Animation loop stopped");
                self.fail(event_loop, err);
            }
        }
    }
}

impl ApplicationHandler for EmberApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(stage) = &mut self.stage {
                    self.viewport.apply(
                        new_size.width,
                        new_size.height,
                        &mut stage.camera,
                        &mut stage.renderer,
                    );
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }
}
