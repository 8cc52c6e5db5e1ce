//! Per-session touch state.
//!
//! One [`TouchSession`] lives from a touch-down through its matching
//! touch-up; a new touch-down discards whatever the previous session left
//! behind. The range predicates used by tap and double-tap live on
//! [`TapRecord`].

use gestik_core::{Point, TimerId};

/// A touch-down sample used for tap and double-tap comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapRecord {
    pub x: f32,
    pub y: f32,
    pub time_ms: u64,
}

impl TapRecord {
    pub fn new(point: Point, time_ms: u64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            time_ms,
        }
    }

    /// Per-axis distance check: both |Δx| and |Δy| within `max_distance`.
    pub fn within_distance(&self, x: f32, y: f32, max_distance: f32) -> bool {
        (x - self.x).abs() <= max_distance && (y - self.y).abs() <= max_distance
    }

    /// Distance check plus an elapsed-time bound against `time_ms`.
    pub fn within_window(
        &self,
        x: f32,
        y: f32,
        time_ms: u64,
        max_distance: f32,
        max_time_ms: u64,
    ) -> bool {
        self.within_distance(x, y, max_distance)
            && time_ms >= self.time_ms
            && time_ms - self.time_ms <= max_time_ms
    }
}

/// Squared two-finger distance captured at multi-touch start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchBaseline {
    pub rs: f32,
}

/// Two-finger vector captured at multi-touch start, plus its squared
/// magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotateBaseline {
    pub dx: f32,
    pub dy: f32,
    pub rs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Touching,
    MultiTouch,
}

/// State tracked between touch-down and touch-up.
#[derive(Debug)]
pub struct TouchSession {
    pub phase: SessionPhase,
    pub current_tap: Option<TapRecord>,
    /// Survives the session to pair with the next touch-down.
    pub prev_tap: Option<TapRecord>,
    pub tap_candidate: bool,
    pub double_tap_candidate: bool,
    pub pinch_baseline: Option<PinchBaseline>,
    pub rotate_baseline: Option<RotateBaseline>,
    pub press_timer: Option<TimerId>,
    pub single_tap_timer: Option<TimerId>,
}

impl TouchSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            current_tap: None,
            prev_tap: None,
            tap_candidate: false,
            double_tap_candidate: false,
            pinch_baseline: None,
            rotate_baseline: None,
            press_timer: None,
            single_tap_timer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    /// Starts a new lifecycle at `tap`. Candidate flags reset; baselines
    /// and `prev_tap` are managed by the caller.
    pub fn begin(&mut self, tap: TapRecord, multi_touch: bool) {
        self.phase = if multi_touch {
            SessionPhase::MultiTouch
        } else {
            SessionPhase::Touching
        };
        self.current_tap = Some(tap);
        self.tap_candidate = true;
        self.double_tap_candidate = false;
    }

    /// Touch-up reset. The rotate baseline deliberately survives until the
    /// next multi-touch start; only the pinch baseline is cleared here.
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Idle;
        self.tap_candidate = false;
        self.double_tap_candidate = false;
        self.pinch_baseline = None;
    }
}

impl Default for TouchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_distance_is_per_axis() {
        let tap = TapRecord::new(Point::new(100.0, 100.0), 0);
        assert!(tap.within_distance(102.0, 98.0, 2.0));
        // Euclidean distance exceeds 2 but each axis is within bounds.
        assert!(tap.within_distance(101.9, 101.9, 2.0));
        assert!(!tap.within_distance(103.0, 100.0, 2.0));
        assert!(!tap.within_distance(100.0, 97.0, 2.0));
    }

    #[test]
    fn within_window_bounds_elapsed_time() {
        let tap = TapRecord::new(Point::new(0.0, 0.0), 1000);
        assert!(tap.within_window(1.0, 1.0, 1250, 2.0, 250));
        assert!(!tap.within_window(1.0, 1.0, 1251, 2.0, 250));
        // A sample stamped before the tap is never in range.
        assert!(!tap.within_window(1.0, 1.0, 999, 2.0, 250));
    }

    #[test]
    fn begin_sets_phase_and_candidates() {
        let mut session = TouchSession::new();
        session.begin(TapRecord::new(Point::new(5.0, 5.0), 10), false);
        assert_eq!(session.phase, SessionPhase::Touching);
        assert!(session.tap_candidate);
        assert!(session.is_active());

        session.begin(TapRecord::new(Point::new(5.0, 5.0), 20), true);
        assert_eq!(session.phase, SessionPhase::MultiTouch);
    }

    #[test]
    fn finish_clears_pinch_but_not_rotate_baseline() {
        let mut session = TouchSession::new();
        session.begin(TapRecord::new(Point::new(0.0, 0.0), 0), true);
        session.pinch_baseline = Some(PinchBaseline { rs: 100.0 });
        session.rotate_baseline = Some(RotateBaseline {
            dx: 10.0,
            dy: 0.0,
            rs: 100.0,
        });

        session.finish();
        assert_eq!(session.phase, SessionPhase::Idle);
        assert!(session.pinch_baseline.is_none());
        assert!(session.rotate_baseline.is_some());
        assert!(!session.tap_candidate);
    }
}
