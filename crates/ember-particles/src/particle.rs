//! A single live particle

use ember_core::{Color, ObjectId, Vec3};
use ember_scene::VisualHandle;

/// One live particle and the scene object that draws it
#[derive(Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Color,
    /// Ticks survived so far
    pub life: u32,
    visual: VisualHandle,
}

impl Particle {
    pub(crate) fn new(position: Vec3, velocity: Vec3, color: Color, visual: VisualHandle) -> Self {
        Self {
            position,
            velocity,
            color,
            life: 0,
            visual,
        }
    }

    pub fn visual(&self) -> &VisualHandle {
        &self.visual
    }

    /// Scene object id of this particle's disc
    pub fn id(&self) -> ObjectId {
        self.visual.id()
    }

    pub(crate) fn into_visual(self) -> VisualHandle {
        self.visual
    }
}
