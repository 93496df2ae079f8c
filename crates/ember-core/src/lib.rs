//! Ember Core - Foundational types for the Ember particle emitter
//!
//! This crate provides the types every other Ember crate depends on:
//! - `ObjectId` - Scene object identifiers
//! - `Vec3`, `Color` - Spatial and color types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{EmberError, Result};
pub use id::ObjectId;
pub use types::{mat4_mul, Color, Vec3};
