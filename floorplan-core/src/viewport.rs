use serde::{Deserialize, Serialize};

use crate::constants::{RECENTER_DURATION_MS, SCALE_MAX, SCALE_MIN};

/// Pan/zoom applied to the map layers: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewportTransform {
    pub const fn identity() -> Self {
        ViewportTransform {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        ViewportTransform {
            x: self.x + finite_or_zero(dx),
            y: self.y + finite_or_zero(dy),
            k: self.k,
        }
    }

    /// Zoom by `factor` keeping the screen point `(px, py)` fixed. The
    /// resulting scale is clamped to `[SCALE_MIN, SCALE_MAX]`.
    pub fn scale_about(self, px: f64, py: f64, factor: f64) -> Self {
        let k = clamp_scale(self.k * factor);
        let (wx, wy) = self.invert(px, py);
        ViewportTransform {
            x: px - wx * k,
            y: py - wy * k,
            k,
        }
    }

    /// Screen point to map coordinates.
    pub fn invert(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.x) / self.k, (py - self.y) / self.k)
    }

    pub fn interpolate(from: Self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        ViewportTransform {
            x: lerp(from.x, to.x),
            y: lerp(from.y, to.y),
            k: clamp_scale(lerp(from.k, to.k)),
        }
    }

    /// Value for the SVG `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

pub fn clamp_scale(k: f64) -> f64 {
    if k.is_nan() {
        return SCALE_MIN;
    }
    k.clamp(SCALE_MIN, SCALE_MAX)
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Animated return to the identity transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecenterAnimation {
    from: ViewportTransform,
    start_ms: f64,
    duration_ms: f64,
}

impl RecenterAnimation {
    pub fn new(from: ViewportTransform, start_ms: f64) -> Self {
        RecenterAnimation {
            from,
            start_ms,
            duration_ms: RECENTER_DURATION_MS,
        }
    }

    /// Transform at `now_ms` and whether the animation has finished. The
    /// final sample is exactly the identity.
    pub fn sample(&self, now_ms: f64) -> (ViewportTransform, bool) {
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t >= 1.0 || t.is_nan() {
            return (ViewportTransform::identity(), true);
        }
        let eased = ease_cubic_in_out(t.max(0.0));
        (
            ViewportTransform::interpolate(self.from, ViewportTransform::identity(), eased),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let t = ViewportTransform::identity()
            .translate_by(15.0, -5.0)
            .scale_about(100.0, 50.0, 2.0);
        assert_eq!(t.k, 2.0);
        let before = ViewportTransform::identity()
            .translate_by(15.0, -5.0)
            .invert(100.0, 50.0);
        assert_eq!(t.invert(100.0, 50.0), before);
    }

    #[test]
    fn scale_is_clamped_for_any_factor() {
        for factor in [0.0, 1e-9, 0.5, 3.0, 1e9, f64::INFINITY, f64::NAN] {
            let t = ViewportTransform::identity().scale_about(10.0, 10.0, factor);
            assert!((SCALE_MIN..=SCALE_MAX).contains(&t.k), "factor {factor} gave {}", t.k);
        }
        let mut t = ViewportTransform::identity();
        for _ in 0..20 {
            t = t.scale_about(0.0, 0.0, 3.0);
        }
        assert_eq!(t.k, SCALE_MAX);
    }

    #[test]
    fn svg_attribute() {
        let t = ViewportTransform { x: 12.5, y: -3.0, k: 2.0 };
        assert_eq!(t.to_svg(), "translate(12.5,-3) scale(2)");
    }

    #[test]
    fn recenter_ends_at_identity() {
        let from = ViewportTransform { x: 240.0, y: -80.0, k: 6.5 };
        let anim = RecenterAnimation::new(from, 1000.0);
        let (start, done) = anim.sample(1000.0);
        assert_eq!(start, from);
        assert!(!done);
        let (mid, done) = anim.sample(1375.0);
        assert!(!done);
        assert!(mid.k < from.k && mid.k > 1.0);
        let (end, done) = anim.sample(1750.0);
        assert!(done);
        assert!(end.is_identity());
    }
}
