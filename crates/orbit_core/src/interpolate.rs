//! Linear range interpolation
//!
//! Maps a scalar from an input range onto an output range, optionally
//! clamping the result to the output bounds. Degenerate input ranges
//! (zero width or non-finite bounds) never produce NaN; they collapse to a
//! step at the start of the input range.

/// A linear mapping from `[a, b]` to `[c, d]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interpolator {
    input: [f32; 2],
    output: [f32; 2],
    clamp: bool,
}

impl Interpolator {
    /// Unclamped mapping of `input` onto `output`
    pub fn new(input: [f32; 2], output: [f32; 2]) -> Self {
        Self {
            input,
            output,
            clamp: false,
        }
    }

    /// Enable or disable clamping to the output range
    pub fn clamped(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn input(&self) -> [f32; 2] {
        self.input
    }

    pub fn output(&self) -> [f32; 2] {
        self.output
    }

    /// True when the input range cannot be divided by
    pub fn is_degenerate(&self) -> bool {
        let [a, b] = self.input;
        !a.is_finite() || !b.is_finite() || a == b
    }

    /// Evaluate the mapping at `x`.
    ///
    /// `apply(a) == c` and `apply(b) == d` hold exactly. A degenerate input
    /// range yields `c` for `x < a` and `d` otherwise. NaN input yields `c`.
    pub fn apply(&self, x: f32) -> f32 {
        let [a, b] = self.input;
        let [c, d] = self.output;

        if x.is_nan() {
            return c;
        }
        if self.is_degenerate() {
            return if x < a { c } else { d };
        }
        if x == a {
            return c;
        }
        if x == b {
            return d;
        }

        let y = c + (x - a) / (b - a) * (d - c);

        // In-range inputs are pinned too so rounding never leaves [c, d].
        let inside = x >= a.min(b) && x <= a.max(b);
        if self.clamp || inside {
            y.clamp(c.min(d), c.max(d))
        } else {
            y
        }
    }
}

/// Build an interpolation function, `interpolate([a, b], [c, d], clamp)(x)`.
pub fn interpolate(input: [f32; 2], output: [f32; 2], clamp: bool) -> impl Fn(f32) -> f32 {
    let interpolator = Interpolator::new(input, output).clamped(clamp);
    move |x| interpolator.apply(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_exactly() {
        let f = Interpolator::new([0.3, 7.1], [0.1, 0.7]);
        assert_eq!(f.apply(0.3), 0.1);
        assert_eq!(f.apply(7.1), 0.7);
    }

    #[test]
    fn in_range_values_stay_within_output() {
        let f = Interpolator::new([-13.0, 29.0], [0.1, 0.3]);
        let mut x = -13.0;
        while x <= 29.0 {
            let y = f.apply(x);
            assert!((0.1..=0.3).contains(&y), "f({x}) = {y}");
            x += 0.37;
        }
    }

    #[test]
    fn reversed_output_range() {
        let f = Interpolator::new([0.0, 10.0], [100.0, 0.0]);
        assert_eq!(f.apply(2.5), 75.0);
        for i in 0..=10 {
            let y = f.apply(i as f32);
            assert!((0.0..=100.0).contains(&y));
        }
    }

    #[test]
    fn clamp_pins_to_nearest_bound() {
        let f = interpolate([100.0, 200.0], [0.0, 100.0], true);
        assert_eq!(f(-50.0), 0.0);
        assert_eq!(f(1e9), 100.0);

        let reversed = interpolate([200.0, 100.0], [0.0, 100.0], true);
        assert_eq!(reversed(250.0), 0.0);
        assert_eq!(reversed(50.0), 100.0);
    }

    #[test]
    fn unclamped_extrapolates() {
        let f = interpolate([0.0, 10.0], [0.0, 100.0], false);
        assert_eq!(f(20.0), 200.0);
        assert_eq!(f(-10.0), -100.0);
    }

    #[test]
    fn degenerate_range_returns_boundary() {
        let f = Interpolator::new([5.0, 5.0], [0.0, 100.0]).clamped(true);
        assert!(f.is_degenerate());
        assert_eq!(f.apply(4.0), 0.0);
        assert_eq!(f.apply(5.0), 100.0);
        assert_eq!(f.apply(6.0), 100.0);

        let inf = Interpolator::new([0.0, f32::INFINITY], [0.0, 100.0]);
        assert!(inf.is_degenerate());
        assert!(!inf.apply(10.0).is_nan());
    }

    #[test]
    fn nan_input_maps_to_start() {
        let f = interpolate([0.0, 10.0], [0.0, 100.0], true);
        assert_eq!(f(f32::NAN), 0.0);
    }
}
