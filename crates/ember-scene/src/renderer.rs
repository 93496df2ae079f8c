//! Renderer contract

use crate::camera::Camera;
use crate::scene::Scene;
use ember_core::Result;

/// A backend that can draw a `Scene` through a `Camera`.
///
/// Implemented by the wgpu renderer; tests substitute recording fakes.
pub trait Renderer {
    /// Draw one frame
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    /// Resize the output buffer
    fn set_output_size(&mut self, width: u32, height: u32);

    /// Current output buffer size in pixels
    fn output_size(&self) -> (u32, u32);
}
