//! Keeps the camera and renderer in step with the host surface size

use ember_scene::{Camera, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    size: Option<(u32, u32)>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied size, if any
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Apply a host size to the camera and renderer.
    ///
    /// Both dimensions are clamped to at least 1 so the aspect ratio stays
    /// finite while the window is minimized. Returns the size actually applied.
    pub fn apply<R: Renderer + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut Camera,
        renderer: &mut R,
    ) -> (u32, u32) {
        let width = width.max(1);
        let height = height.max(1);

        camera.set_aspect(width as f32 / height as f32);
        camera.mark_projection_dirty();
        camera.recompute_projection();
        renderer.set_output_size(width, height);

        if self.size != Some((width, height)) {
            tracing::debug!(width, height, "viewport resized");
        }
        self.size = Some((width, height));
        (width, height)
    }
}
