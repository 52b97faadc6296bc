//! Paint context - a canvas that records drawing commands

use crate::canvas::{Canvas2d, LineCap};
use crate::color::Color;
use crate::path::Path;
use crate::primitives::Rect;

/// A recorded paint command
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    ClearRect { rect: Rect },
    FillPath {
        path: Path,
        color: Color,
        line_cap: LineCap,
    },
}

/// A [`Canvas2d`] that keeps every command it receives.
///
/// Used as the render target of headless hosts and in tests.
pub struct PaintContext {
    width: f32,
    height: f32,
    line_cap: LineCap,
    commands: Vec<PaintCommand>,
}

impl PaintContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            line_cap: LineCap::default(),
            commands: Vec::new(),
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands recorded since the most recent full-surface clear
    pub fn last_frame(&self) -> &[PaintCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|cmd| matches!(cmd, PaintCommand::ClearRect { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl Canvas2d for PaintContext {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(PaintCommand::ClearRect {
            rect: Rect::new(x, y, width, height),
        });
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.commands.push(PaintCommand::FillPath {
            path: path.clone(),
            color,
            line_cap: self.line_cap,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathBuilder;

    #[test]
    fn last_frame_starts_at_latest_clear() {
        let mut ctx = PaintContext::new(100.0, 100.0);
        let wedge = PathBuilder::new()
            .move_to(50.0, 50.0)
            .arc(50.0, 50.0, 10.0, 0.0, 1.0, false)
            .close()
            .build();

        ctx.clear_rect(0.0, 0.0, 100.0, 100.0);
        ctx.fill_path(&wedge, Color::RED);
        ctx.clear_rect(0.0, 0.0, 100.0, 100.0);
        ctx.set_line_cap(LineCap::Round);
        ctx.fill_path(&wedge, Color::BLUE);

        let frame = ctx.last_frame();
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame[1],
            PaintCommand::FillPath {
                path: wedge,
                color: Color::BLUE,
                line_cap: LineCap::Round,
            }
        );
        assert_eq!(ctx.commands().len(), 4);
    }
}
