//! Shader program source handed to the renderer at startup

use ember_core::{EmberError, Result};
use std::borrow::Cow;
use std::path::Path;

/// Entry points every particle shader must export
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL source for the particle shader program.
///
/// The module reads a per-object `color` and draws a flat disc. Beyond the
/// entry point names the text is opaque to everything but the renderer.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: Cow<'static, str>,
}

impl ShaderSource {
    /// Wrap built-in shader text
    pub fn from_static(label: impl Into<String>, wgsl: &'static str) -> Self {
        Self {
            label: label.into(),
            wgsl: Cow::Borrowed(wgsl),
        }
    }

    /// Read a shader file, labelled by its file name
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let wgsl = std::fs::read_to_string(path)?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "shader".to_string());
        let source = Self {
            label,
            wgsl: Cow::Owned(wgsl),
        };
        source.check_entry_points()?;
        Ok(source)
    }

    /// Fail early when a required entry point is missing
    pub fn check_entry_points(&self) -> Result<()> {
        for entry in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
            if !self.wgsl.contains(&format!("fn {entry}")) {
                return Err(EmberError::Shader(format!(
                    "{}: missing entry point `{entry}`",
                    self.label
                )));
            }
        }
        Ok(())
    }
}
