//! Geometric primitives and the pure gesture math.
//!
//! All functions here are stateless: the recognizer feeds them deltas and
//! baselines, they answer with directions, ratios, and angles.

/// A touch position in logical screen coordinates (y grows downwards).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

/// Direction of a completed swipe, named after the screen edge the finger
/// moved towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Top,
    Bottom,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Top => "top",
            SwipeDirection::Bottom => "bottom",
        }
    }
}

/// Classifies a movement delta into one of the four swipe directions.
///
/// The dominant axis wins; on a tie the movement counts as horizontal.
pub fn swipe_direction(dx: f32, dy: f32) -> SwipeDirection {
    if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else if dy > 0.0 {
        SwipeDirection::Bottom
    } else {
        SwipeDirection::Top
    }
}

/// Zoom ratio of the current two-finger vector `(dx, dy)` against the
/// squared distance captured at multi-touch start.
///
/// Returns `None` when there is no usable baseline (coincident fingers).
pub fn pinch_zoom(dx: f32, dy: f32, baseline_rs: f32) -> Option<f32> {
    if baseline_rs > 0.0 {
        Some(((dx * dx + dy * dy) / baseline_rs).sqrt())
    } else {
        None
    }
}

/// Signed angle in degrees from the baseline vector `(base_dx, base_dy)`
/// to the current vector `(dx, dy)`.
///
/// `base_rs` is the squared magnitude of the baseline vector. Positive
/// angles are clockwise in the y-down screen coordinate system; the result
/// lies in `[-180, 180]`. Returns `None` when either vector is degenerate.
pub fn rotate_angle(dx: f32, dy: f32, base_dx: f32, base_dy: f32, base_rs: f32) -> Option<f32> {
    let mag = ((dx * dx + dy * dy) * base_rs).sqrt();
    if mag <= 0.0 {
        return None;
    }

    let cos = ((dx * base_dx + dy * base_dy) / mag).clamp(-1.0, 1.0);
    let mut angle = cos.acos().to_degrees();

    // Cross product decides the winding from baseline to current.
    if base_dx * dy - base_dy * dx < 0.0 {
        angle = -angle;
    }

    Some(angle)
}
