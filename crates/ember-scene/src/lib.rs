//! Ember Scene - the scene graph surface the particle core renders into
//!
//! - `SceneGraph` - the add/remove/transform contract used by the particle system
//! - `Scene` - in-memory retained-mode implementation of `SceneGraph`
//! - `Camera` - perspective camera with a cached projection
//! - `Renderer` - the render/resize contract implemented by GPU backends
//! - `ShaderSource` - opaque shader text handed to the renderer at startup

mod camera;
mod renderer;
mod scene;
pub mod shader;

pub use camera::Camera;
pub use renderer::Renderer;
pub use scene::{Layer, Scene, SceneGraph, SceneObject, Shape, VisualDesc, VisualHandle};
pub use shader::ShaderSource;
