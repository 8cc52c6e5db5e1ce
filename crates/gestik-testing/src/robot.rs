//! Robot-style driver for scripted touch sequences.
//!
//! Wires a recognizer to a [`TestClock`] and a [`TimerQueue`], installs an
//! [`EventRecorder`] as the catch-all callback, and offers high-level
//! interaction verbs:
//!
//! ```
//! use gestik_testing::GestureRobot;
//! use gestik_core::GestureKind;
//!
//! let robot = GestureRobot::new();
//! robot.tap(100.0, 100.0);
//! robot.advance(400);
//! assert_eq!(robot.recorder().count(GestureKind::Tap), 1);
//! ```

use std::rc::Rc;

use gestik_core::{GestureSet, Point, TimerQueue};
use gestik_recognizer::{GestureRecognizer, RecognizerOptions};

use crate::clock::TestClock;
use crate::recorder::EventRecorder;

/// Pause the robot inserts between touch-down and touch-up in scripted
/// taps. Short enough for every tap/double-tap window, long enough that
/// swipe velocity checks see a positive duration.
const TAP_CONTACT_MS: u64 = 10;

pub struct GestureRobot {
    recognizer: GestureRecognizer,
    clock: TestClock,
    timers: TimerQueue,
    recorder: EventRecorder,
}

impl GestureRobot {
    /// A robot recognizing every gesture kind. Use
    /// [`GestureRobot::with_options`] to exercise a narrower set or custom
    /// thresholds.
    pub fn new() -> Self {
        Self::with_options(RecognizerOptions::new().with_events(GestureSet::ALL))
    }

    /// Builds the robot around `options`, overriding their clock and
    /// scheduler with deterministic ones and installing the robot's
    /// recorder as the catch-all callback.
    pub fn with_options(options: RecognizerOptions) -> Self {
        let clock = TestClock::new();
        let timers = TimerQueue::new(Rc::new(clock.clone()));
        let recorder = EventRecorder::new();

        let sink = recorder.clone();
        let recognizer = GestureRecognizer::new(
            options
                .with_clock(Rc::new(clock.clone()))
                .with_scheduler(Rc::new(timers.clone()))
                .with_on_event(move |event| sink.record(event)),
        );

        Self {
            recognizer,
            clock,
            timers,
            recorder,
        }
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    pub fn clock(&self) -> &TestClock {
        &self.clock
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Tears the robot down, returning the clock and timer queue so tests
    /// can keep driving time after the recognizer is gone.
    pub fn into_parts(self) -> (TestClock, TimerQueue, EventRecorder) {
        let Self {
            recognizer,
            clock,
            timers,
            recorder,
        } = self;
        drop(recognizer);
        (clock, timers, recorder)
    }

    /// Advances virtual time and fires every timer that came due.
    pub fn advance(&self, ms: u64) {
        self.clock.advance(ms);
        self.timers.run_due();
    }

    // ========================================================================
    // Interaction verbs
    // ========================================================================

    pub fn tap(&self, x: f32, y: f32) {
        let point = [Point::new(x, y)];
        self.recognizer.touch_start(&point);
        self.advance(TAP_CONTACT_MS);
        self.recognizer.touch_end(&point);
    }

    /// Two taps at the same spot, `gap_ms` apart (down-to-down includes
    /// the first tap's contact time).
    pub fn double_tap(&self, x: f32, y: f32, gap_ms: u64) {
        self.tap(x, y);
        self.advance(gap_ms);
        self.tap(x, y);
    }

    /// Touch-down, hold still for `hold_ms`, then lift.
    pub fn press_hold(&self, x: f32, y: f32, hold_ms: u64) {
        let point = [Point::new(x, y)];
        self.recognizer.touch_start(&point);
        self.advance(hold_ms);
        self.recognizer.touch_end(&point);
    }

    /// Straight-line single-finger movement over `duration_ms`, lifting at
    /// the destination.
    pub fn swipe(&self, from: Point, to: Point, duration_ms: u64) {
        self.recognizer.touch_start(&[from]);
        let half = duration_ms / 2;
        self.advance(half);
        let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
        self.recognizer.touch_move(&[mid]);
        self.advance(duration_ms - half);
        self.recognizer.touch_move(&[to]);
        self.recognizer.touch_end(&[to]);
    }

    /// Two-finger gesture: down at `start`, one move to `end`, lift.
    pub fn two_finger(&self, start: [Point; 2], end: [Point; 2]) {
        self.recognizer.touch_start(&start);
        self.advance(20);
        self.recognizer.touch_move(&end);
        self.advance(20);
        self.recognizer.touch_end(&[end[0]]);
    }

    /// Spread two fingers from `base_spread` to `target_spread` around a
    /// common origin, horizontally.
    pub fn pinch(&self, origin: Point, base_spread: f32, target_spread: f32) {
        let start = [origin, Point::new(origin.x + base_spread, origin.y)];
        let end = [origin, Point::new(origin.x + target_spread, origin.y)];
        self.two_finger(start, end);
    }
}

impl Default for GestureRobot {
    fn default() -> Self {
        Self::new()
    }
}
