//! Circular progress renderer
//!
//! Each frame is a full redraw: clear, border wedge, track wedge, progress
//! wedge. The renderer keeps no state between frames apart from its
//! geometry and palette.

use std::f32::consts::PI;

use orbit_paint::{Canvas2d, Color, LineCap, PathBuilder};

/// Twelve o'clock, in canvas angle convention
pub const START_ANGLE: f32 = 1.5 * PI;

/// Sweep per percentage point
pub const UNIT_ANGLE: f32 = (PI - 0.5 * PI) / 25.0;

/// End angle of the progress wedge for `pct`
pub fn progress_end_angle(pct: f32) -> f32 {
    START_ANGLE + pct * UNIT_ANGLE
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularRenderer {
    pub radius: f32,
    pub border_width: f32,
    pub track_color: Color,
    pub fill_color: Color,
    pub border_color: Color,
}

impl CircularRenderer {
    /// Redraw the ring at `pct` percent
    pub fn render(&self, ctx: &mut dyn Canvas2d, pct: f32) {
        let (width, height) = (ctx.width(), ctx.height());
        let (cx, cy) = (width / 2.0, height / 2.0);

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_line_cap(LineCap::Round);

        // border and track are full circles starting at three o'clock
        let border = self.radius + self.border_width - 1.0;
        self.wedge(ctx, (cx, cy), border, 0.0, 2.0 * PI, self.border_color);
        self.wedge(ctx, (cx, cy), self.radius - 1.0, 0.0, 2.0 * PI, self.track_color);
        self.wedge(
            ctx,
            (cx, cy),
            self.radius,
            START_ANGLE,
            progress_end_angle(pct),
            self.fill_color,
        );
    }

    fn wedge(
        &self,
        ctx: &mut dyn Canvas2d,
        (cx, cy): (f32, f32),
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
    ) {
        let path = PathBuilder::new()
            .move_to(cx, cy)
            .arc(cx, cy, radius.max(0.0), start, end, false)
            .close()
            .build();
        ctx.fill_path(&path, color);
    }
}
