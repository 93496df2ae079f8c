//! Ember Runtime - animation loop building blocks
//!
//! Provides:
//! - `Stage` - owns the scene, camera, renderer, particles and configuration
//! - `AnimationDriver` - Idle/Running state machine ticking the stage once per frame
//! - `FrameScheduler` - how the driver asks the host for the next frame
//! - `Viewport` - keeps camera aspect and renderer size in step with the host surface

mod driver;
mod stage;
mod viewport;

pub use driver::{AnimationDriver, DriverState, FrameScheduler};
pub use stage::Stage;
pub use viewport::Viewport;
