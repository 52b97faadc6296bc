//! Scene file handling
//!
//! A scene describes a page (viewport and one container), the component
//! options and a list of scroll offsets to replay:
//!
//! ```toml
//! scroll = [0, 390, 500, 1000, 0]
//!
//! [viewport]
//! width = 800
//! height = 600
//!
//! [container]
//! top = 1000
//! height = 400
//! selector = ".js-progress-canvas"
//!
//! [options]
//! title = "Less Sugar More Life"
//! ```

use anyhow::{Context, Result};
use orbit_ring::ProgressCanvasOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level scene (orbit.toml or a .json file)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Scene {
    /// Scroll offsets replayed in order
    #[serde(default)]
    pub scroll: Vec<f32>,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub options: ProgressCanvasOptions,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
    /// Height of one rendered text line
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    600.0
}

fn default_line_height() -> f32 {
    24.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            line_height: default_line_height(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// Document offset of the container's top edge
    #[serde(default = "default_top")]
    pub top: f32,
    #[serde(default = "default_container_height")]
    pub height: f32,
    /// `#id` or `.class` given to the container and used to mount
    #[serde(default = "default_selector")]
    pub selector: String,
}

fn default_top() -> f32 {
    1000.0
}

fn default_container_height() -> f32 {
    400.0
}

fn default_selector() -> String {
    ".js-progress-canvas".to_string()
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            height: default_container_height(),
            selector: default_selector(),
        }
    }
}

impl Scene {
    /// Load a scene; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Scene file {} does not exist", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let scene = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        };
        scene.with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML scene")
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid JSON scene")
    }
}
