//! Drag / wheel / pinch recognizer that owns the map's viewport transform.
//!
//! The browser shell forwards raw pointer and wheel events; every method
//! returns the transform to render, so rendering is a pure function of the
//! state kept here.

use crate::constants::CLICK_DISTANCE;
use crate::viewport::{RecenterAnimation, ViewportTransform};

/// `WheelEvent.deltaMode` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaMode {
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            0 => DeltaMode::Pixel,
            1 => DeltaMode::Line,
            _ => DeltaMode::Page,
        }
    }

    fn multiplier(self) -> f64 {
        match self {
            DeltaMode::Pixel => 0.002,
            DeltaMode::Line => 0.05,
            DeltaMode::Page => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActivePointer {
    id: i32,
    at: (f64, f64),
    origin: (f64, f64),
}

#[derive(Debug, Default)]
pub struct ViewportController {
    transform: ViewportTransform,
    pointers: Vec<ActivePointer>,
    dragged: bool,
    suppress_click: bool,
    animation: Option<RecenterAnimation>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn pointer_down(&mut self, id: i32, x: f64, y: f64) {
        self.animation = None;
        self.suppress_click = false;
        if self.pointers.is_empty() {
            self.dragged = false;
        }
        self.pointers.retain(|p| p.id != id);
        // Only two pointers take part in a pinch; extra fingers are ignored.
        if self.pointers.len() < 2 {
            self.pointers.push(ActivePointer {
                id,
                at: (x, y),
                origin: (x, y),
            });
        }
        if self.pointers.len() == 2 {
            self.dragged = true;
        }
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64) -> Option<ViewportTransform> {
        let idx = self.pointers.iter().position(|p| p.id == id)?;
        let prev = self.pointers[idx].at;
        self.pointers[idx].at = (x, y);
        let (ox, oy) = self.pointers[idx].origin;
        if (x - ox).hypot(y - oy) > CLICK_DISTANCE {
            self.dragged = true;
        }

        self.transform = match self.pointers.as_slice() {
            [_] => self.transform.translate_by(x - prev.0, y - prev.1),
            [a, b] => {
                let other = if idx == 0 { b.at } else { a.at };
                pinch(self.transform, prev, (x, y), other)
            }
            _ => return None,
        };
        Some(self.transform)
    }

    /// Release a pointer. Returns true when the gesture moved far enough to
    /// swallow the click that the browser fires next.
    pub fn pointer_up(&mut self, id: i32) -> bool {
        self.pointers.retain(|p| p.id != id);
        if self.pointers.is_empty() && self.dragged {
            self.suppress_click = true;
        }
        // The finger left behind after a pinch pans from where it is now.
        for p in &mut self.pointers {
            p.origin = p.at;
        }
        self.suppress_click
    }

    /// Whether a click should be acted upon. Consumes a pending suppression.
    pub fn accept_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }

    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64, mode: DeltaMode) -> ViewportTransform {
        self.animation = None;
        let factor = (-delta_y * mode.multiplier()).exp2();
        self.transform = self.transform.scale_about(x, y, factor);
        self.transform
    }

    pub fn double_click(&mut self, x: f64, y: f64, zoom_out: bool) -> ViewportTransform {
        self.animation = None;
        let factor = if zoom_out { 0.5 } else { 2.0 };
        self.transform = self.transform.scale_about(x, y, factor);
        self.transform
    }

    /// Start animating back to the identity transform.
    pub fn recenter(&mut self, now_ms: f64) {
        self.pointers.clear();
        self.animation = Some(RecenterAnimation::new(self.transform, now_ms));
    }

    /// Advance a running recenter animation. `None` when nothing is animating.
    pub fn tick(&mut self, now_ms: f64) -> Option<ViewportTransform> {
        let anim = self.animation?;
        let (t, done) = anim.sample(now_ms);
        self.transform = t;
        if done {
            self.animation = None;
        }
        Some(t)
    }
}

// Scale by the change in finger distance about the old midpoint, then follow
// the midpoint.
fn pinch(
    t: ViewportTransform,
    moved_from: (f64, f64),
    moved_to: (f64, f64),
    other: (f64, f64),
) -> ViewportTransform {
    let d0 = (moved_from.0 - other.0).hypot(moved_from.1 - other.1);
    let d1 = (moved_to.0 - other.0).hypot(moved_to.1 - other.1);
    let m0 = ((moved_from.0 + other.0) / 2.0, (moved_from.1 + other.1) / 2.0);
    let m1 = ((moved_to.0 + other.0) / 2.0, (moved_to.1 + other.1) / 2.0);
    let scaled = if d0 > f64::EPSILON {
        t.scale_about(m0.0, m0.1, d1 / d0)
    } else {
        t
    };
    scaled.translate_by(m1.0 - m0.0, m1.1 - m0.1)
}
