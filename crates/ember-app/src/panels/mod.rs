//! egui panels drawn over the scene

pub mod controls;
pub mod render_stats;

pub use controls::{ControlPanel, PanelActions};
pub use render_stats::RenderStats;
