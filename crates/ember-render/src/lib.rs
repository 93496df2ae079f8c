//! Ember Render - wgpu renderer for particle scenes
//!
//! Draws the retained `ember_scene::Scene` as instanced camera-facing discs
//! plus line outlines for helpers, with an optional egui overlay on top.

mod context;
pub mod disc_pipeline;
mod overlay;
mod scene_renderer;
pub mod wire_pipeline;

pub use context::{RenderContext, RenderError};
pub use disc_pipeline::{DiscInstanceGpu, DiscPipeline};
pub use overlay::{Overlay, OverlayFrame};
pub use scene_renderer::{collect_draw_data, SceneRenderer};
pub use wire_pipeline::{LineVertex, WirePipeline};

use ember_scene::ShaderSource;

/// WGSL text of the built-in disc shader
pub const DEFAULT_DISC_SHADER: &str = include_str!("disc_shader.wgsl");

/// The built-in disc shader, used unless another is supplied
pub fn default_disc_shader() -> ShaderSource {
    ShaderSource::from_static("disc_shader.wgsl", DEFAULT_DISC_SHADER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_shader_wgsl_parses() {
        let module = naga::front::wgsl::parse_str(DEFAULT_DISC_SHADER)
            .expect("disc_shader.wgsl failed to parse");
        let entries: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entries.contains(&"vs_main"));
        assert!(entries.contains(&"fs_main"));
    }

    #[test]
    fn wire_shader_wgsl_parses() {
        let source = include_str!("wire_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("wire_shader.wgsl failed to parse");
    }

    #[test]
    fn default_shader_has_entry_points() {
        assert!(default_disc_shader().check_entry_points().is_ok());
    }
}
