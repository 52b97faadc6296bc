//! The 2D drawing surface a render target exposes

use crate::color::Color;
use crate::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Minimal canvas 2D context.
///
/// Mirrors the subset of `CanvasRenderingContext2D` a retained renderer
/// needs: clearing, line cap state and filling a path with a solid color.
pub trait Canvas2d: Send {
    /// Surface width in pixels
    fn width(&self) -> f32;

    /// Surface height in pixels
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn set_line_cap(&mut self, cap: LineCap);

    /// Fill the closed region described by `path`
    fn fill_path(&mut self, path: &Path, color: Color);
}
