//! Emitter parameter panel

use ember_core::Color;
use ember_particles::config::ranges;
use ember_particles::ParticleConfig;

/// Requests raised by the panel, applied by the app after the UI pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PanelActions {
    /// Drop every live particle
    pub clear: bool,
    /// Push the fixed color to live particles
    pub recolor: bool,
}

impl PanelActions {
    /// Whether an edit from `before` to `after` should recolor live particles
    pub fn recolor_needed(before: &ParticleConfig, after: &ParticleConfig) -> bool {
        !after.random_color && (before.random_color || before.color != after.color)
    }
}

/// Binds every `ParticleConfig` field to a widget
pub struct ControlPanel {
    open: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self { open: true }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ctx: &egui::Context, config: &mut ParticleConfig) -> PanelActions {
        let mut actions = PanelActions::default();
        egui::Window::new("Emitter")
            .open(&mut self.open)
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                actions = Self::ui(ui, config);
            });
        actions
    }

    fn ui(ui: &mut egui::Ui, config: &mut ParticleConfig) -> PanelActions {
        let before = config.clone();
        let mut actions = PanelActions::default();

        ui.heading("Motion");
        ui.add(egui::Slider::new(&mut config.gravity, ranges::GRAVITY).text("gravity"));
        ui.add(
            egui::Slider::new(&mut config.horizontal_velocity, ranges::HORIZONTAL_VELOCITY)
                .text("horizontal velocity"),
        );
        ui.add(
            egui::Slider::new(&mut config.vertical_velocity, ranges::VERTICAL_VELOCITY)
                .text("vertical velocity"),
        );

        ui.separator();
        ui.heading("Emission");
        ui.add(
            egui::Slider::new(&mut config.particle_size, ranges::PARTICLE_SIZE)
                .logarithmic(true)
                .text("particle size"),
        );
        ui.add(
            egui::Slider::new(&mut config.num_particles, ranges::NUM_PARTICLES)
                .text("max particles"),
        );
        ui.add(egui::Slider::new(&mut config.lifetime, ranges::LIFETIME).text("lifetime"));
        ui.add(
            egui::Slider::new(&mut config.num_new_particles, ranges::NUM_NEW_PARTICLES)
                .text("new per frame"),
        );

        ui.separator();
        ui.heading("Spawn volume");
        ui.add(
            egui::Slider::new(&mut config.horizontal_spawn_var, ranges::HORIZONTAL_SPAWN_VAR)
                .text("horizontal spread"),
        );
        ui.add(
            egui::Slider::new(&mut config.vertical_spawn_var, ranges::VERTICAL_SPAWN_VAR)
                .text("vertical spread"),
        );
        ui.checkbox(&mut config.spawn_visible, "show spawn volume");

        ui.separator();
        ui.heading("Color");
        ui.checkbox(&mut config.random_color, "random color");
        ui.add_enabled_ui(!config.random_color, |ui| {
            ui.horizontal(|ui| {
                let mut rgb = config.color.to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    config.color = Color::from(rgb);
                }
                ui.label("color");
            });
        });

        ui.separator();
        if ui.button("Clear particles").clicked() {
            actions.clear = true;
        }

        actions.recolor = PanelActions::recolor_needed(&before, config);
        actions
    }
}
