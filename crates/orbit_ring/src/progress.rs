//! Scroll offset to progress percentage

use orbit_core::Interpolator;

/// Maps the global scroll offset onto a 0-100 percentage for a container.
///
/// The animation window is derived from the container's document offset:
/// `start = offset_top / start_fraction` and `end = offset_top / end_fraction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressModel {
    start_fraction: f32,
    end_fraction: f32,
}

impl ProgressModel {
    pub fn new(start_fraction: f32, end_fraction: f32) -> Self {
        Self {
            start_fraction,
            end_fraction,
        }
    }

    /// Scroll window `(start, end)` for a container at `offset_top`.
    ///
    /// A zero or non-finite fraction puts the bound at infinity, which the
    /// interpolator treats as a degenerate range.
    pub fn window(&self, offset_top: f32) -> (f32, f32) {
        (
            safe_div(offset_top, self.start_fraction),
            safe_div(offset_top, self.end_fraction),
        )
    }

    /// Percentage for `scroll_y`, given the container's viewport-relative
    /// top edge at that scroll offset.
    pub fn progress(&self, scroll_y: f32, rect_top: f32) -> f32 {
        let offset_top = rect_top + scroll_y;
        let (start, end) = self.window(offset_top);
        let pct = Interpolator::new([start, end], [0.0, 100.0])
            .clamped(true)
            .apply(scroll_y);
        clamp_percentage(pct)
    }
}

/// Pin a percentage to `[0, 100]`; NaN becomes 0
pub fn clamp_percentage(pct: f32) -> f32 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

fn safe_div(value: f32, fraction: f32) -> f32 {
    let out = value / fraction;
    if out.is_finite() {
        out
    } else {
        f32::INFINITY
    }
}
