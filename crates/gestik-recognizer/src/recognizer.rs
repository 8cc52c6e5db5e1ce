//! The gesture state machine.
//!
//! [`GestureRecognizer`] consumes normalized touch batches and emits
//! gesture events through its handler registry. All recognition happens
//! synchronously inside the three input-boundary calls, except for the
//! press and single-tap decisions which race touch-up through the
//! [`Scheduler`] capability.
//!
//! Handlers are invoked only after the engine has finished mutating its
//! state and released its internal borrow, so a subscriber cannot observe
//! (or corrupt) a half-applied transition.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gestik_core::{
    pinch_zoom, rotate_angle, swipe_direction, Clock, GestureConfig, GestureConfigOverrides,
    GestureDetail, GestureEvent, GestureKind, GestureSet, MonotonicClock, Point, Scheduler,
    TimerId, TimerQueue, TouchList,
};
use smallvec::SmallVec;

use crate::registry::{GestureHandler, HandlerId, HandlerRegistry};
use crate::session::{PinchBaseline, RotateBaseline, SessionPhase, TapRecord, TouchSession};

/// Construction options for [`GestureRecognizer`].
///
/// The default clock is monotonic wall time; the default scheduler is a
/// private [`TimerQueue`] nobody pumps, so hosts that want press and
/// single-tap events must pass their own queue (and call
/// [`TimerQueue::run_due`] from their event loop) or another scheduler.
pub struct RecognizerOptions {
    events: GestureSet,
    config: GestureConfigOverrides,
    on_event: Option<GestureHandler>,
    clock: Option<Rc<dyn Clock>>,
    scheduler: Option<Rc<dyn Scheduler>>,
}

impl RecognizerOptions {
    pub fn new() -> Self {
        Self {
            events: GestureSet::default_events(),
            config: GestureConfigOverrides::default(),
            on_event: None,
            clock: None,
            scheduler: None,
        }
    }

    /// Replaces the recognized-gesture set wholesale.
    pub fn with_events(mut self, events: GestureSet) -> Self {
        self.events = events;
        self
    }

    pub fn with_config(mut self, config: GestureConfigOverrides) -> Self {
        self.config = config;
        self
    }

    /// Catch-all callback, invoked after the per-kind handlers for every
    /// enabled gesture.
    pub fn with_on_event(mut self, callback: impl Fn(&GestureEvent) + 'static) -> Self {
        self.on_event = Some(Rc::new(callback));
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner {
    config: GestureConfig,
    enabled: GestureSet,
    registry: HandlerRegistry,
    on_event: Option<GestureHandler>,
    session: TouchSession,
}

/// The gesture recognition engine. One instance tracks one touch session
/// at a time; a new touch-down discards whatever an unfinished session
/// left behind.
///
/// Single-threaded by construction. Dropping the recognizer cancels any
/// pending press or single-tap timer, so no gesture fires after teardown.
pub struct GestureRecognizer {
    inner: Rc<RefCell<Inner>>,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn Scheduler>,
}

impl GestureRecognizer {
    pub fn new(options: RecognizerOptions) -> Self {
        let RecognizerOptions {
            events,
            config,
            on_event,
            clock,
            scheduler,
        } = options;

        let clock = clock.unwrap_or_else(|| Rc::new(MonotonicClock::new()));
        let scheduler =
            scheduler.unwrap_or_else(|| Rc::new(TimerQueue::new(clock.clone())) as Rc<dyn Scheduler>);

        Self {
            inner: Rc::new(RefCell::new(Inner {
                config: GestureConfig::resolve(&config),
                enabled: events,
                registry: HandlerRegistry::new(),
                on_event,
                session: TouchSession::new(),
            })),
            clock,
            scheduler,
        }
    }

    /// The resolved threshold set.
    pub fn config(&self) -> GestureConfig {
        self.inner.borrow().config
    }

    /// The gestures this recognizer emits.
    pub fn enabled_events(&self) -> GestureSet {
        self.inner.borrow().enabled
    }

    pub fn subscribe(
        &self,
        kind: GestureKind,
        handler: impl Fn(&GestureEvent) + 'static,
    ) -> HandlerId {
        self.inner
            .borrow_mut()
            .registry
            .subscribe(kind, Rc::new(handler))
    }

    /// Removes the matching handler, or every handler for `kind` when no
    /// id is given.
    pub fn unsubscribe(&self, kind: GestureKind, id: Option<HandlerId>) {
        self.inner.borrow_mut().registry.unsubscribe(kind, id);
    }

    // ========================================================================
    // Input boundary
    // ========================================================================

    /// A new touch-down. The first point is the primary finger; a second
    /// point makes this a multi-touch session and captures the pinch and
    /// rotate baselines.
    pub fn touch_start(&self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let now = self.clock.now_ms();
        let primary = points[0];

        let press_delay = {
            let mut inner = self.inner.borrow_mut();
            let config = inner.config;
            let enabled = inner.enabled;
            let session = &mut inner.session;

            if session.is_active() {
                log::trace!("touch_start while a session is active; discarding it");
            }
            // A stale press timer must not race the new session.
            if let Some(id) = session.press_timer.take() {
                self.scheduler.cancel(id);
            }

            let multi = points.len() > 1;
            if multi {
                let dx = points[1].x - primary.x;
                let dy = points[1].y - primary.y;
                let rs = dx * dx + dy * dy;
                session.pinch_baseline = Some(PinchBaseline { rs });
                session.rotate_baseline = Some(RotateBaseline { dx, dy, rs });
            }

            let tap = TapRecord::new(primary, now);
            let double_tap_candidate = match session.prev_tap {
                Some(prev) => prev.within_window(
                    tap.x,
                    tap.y,
                    now,
                    config.double_tap.distance,
                    config.double_tap.interval_ms,
                ),
                None => false,
            };
            session.begin(tap, multi);
            session.double_tap_candidate = double_tap_candidate;

            if enabled.contains(GestureKind::Press) {
                Some(config.press.time_ms)
            } else {
                None
            }
        };

        if let Some(delay) = press_delay {
            let weak = Rc::downgrade(&self.inner);
            let id = self
                .scheduler
                .schedule(delay, Box::new(move || Self::fire_press(&weak)));
            self.inner.borrow_mut().session.press_timer = Some(id);
        }

        Self::emit(
            &self.inner,
            GestureEvent::new(GestureKind::PanStart, collect_touches(points)),
        );
    }

    /// Finger movement. Falsifies the tap candidate on travel beyond the
    /// tap distance and, for multi-touch batches, reports pinch and rotate
    /// against the captured baselines.
    pub fn touch_move(&self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let primary = points[0];

        let mut pinch: Option<f32> = None;
        let mut rotate: Option<Option<f32>> = None;
        {
            let mut inner = self.inner.borrow_mut();
            let config = inner.config;
            let enabled = inner.enabled;
            let session = &mut inner.session;

            if points.len() > 1 {
                if session.is_active() {
                    session.phase = SessionPhase::MultiTouch;
                }
                let dx = points[1].x - primary.x;
                let dy = points[1].y - primary.y;
                if enabled.contains(GestureKind::Pinch) {
                    if let Some(baseline) = session.pinch_baseline {
                        if let Some(zoom) = pinch_zoom(dx, dy, baseline.rs) {
                            pinch = Some(zoom);
                        }
                    }
                }
                if enabled.contains(GestureKind::Rotate) {
                    if let Some(baseline) = session.rotate_baseline {
                        rotate = Some(rotate_angle(dx, dy, baseline.dx, baseline.dy, baseline.rs));
                    }
                }
            }

            if session.tap_candidate {
                session.tap_candidate = match session.current_tap {
                    Some(tap) => tap.within_distance(primary.x, primary.y, config.tap.distance),
                    None => false,
                };
            }
        }

        let touches = collect_touches(points);
        if let Some(zoom) = pinch {
            Self::emit(
                &self.inner,
                GestureEvent::with_detail(
                    GestureKind::Pinch,
                    touches.clone(),
                    GestureDetail::Pinch { zoom },
                ),
            );
        }
        if let Some(angle) = rotate {
            Self::emit(
                &self.inner,
                GestureEvent::with_detail(
                    GestureKind::Rotate,
                    touches.clone(),
                    GestureDetail::Rotate { angle },
                ),
            );
        }
        Self::emit(
            &self.inner,
            GestureEvent::new(GestureKind::PanMove, touches),
        );
    }

    /// Touch-up with the lifted points. Runs the detectors in their fixed
    /// order: tap first (the others read its outcome), then double-tap,
    /// the deferred single-tap, swipe, and finally the pan end.
    pub fn touch_end(&self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let now = self.clock.now_ms();
        let primary = points[0];
        let touches = collect_touches(points);

        let mut tap = false;
        let mut double_tap = false;
        let mut swipe: Option<gestik_core::SwipeDirection> = None;
        let mut single_tap_delay: Option<u64> = None;
        let mut cancel: SmallVec<[TimerId; 2]> = SmallVec::new();

        {
            let mut inner = self.inner.borrow_mut();
            let config = inner.config;
            let enabled = inner.enabled;
            let session = &mut inner.session;

            // Tap. Detection always runs even when the kind is disabled:
            // double-tap and single-tap read the outcome.
            if session.tap_candidate {
                session.tap_candidate = match session.current_tap {
                    Some(record) => record.within_window(
                        primary.x,
                        primary.y,
                        now,
                        config.tap.distance,
                        config.tap.time_ms,
                    ),
                    None => false,
                };
            }
            if session.tap_candidate {
                tap = true;
                if let Some(id) = session.press_timer.take() {
                    cancel.push(id);
                }
            }

            // Double-tap. A confirmed pair consumes prev_tap and the
            // pending single-tap; anything else re-seeds prev_tap from
            // this session's tap, confirmed taps only.
            if session.prev_tap.is_some() && session.tap_candidate && session.double_tap_candidate {
                double_tap = true;
                session.prev_tap = None;
                if let Some(id) = session.single_tap_timer.take() {
                    cancel.push(id);
                }
            } else {
                session.prev_tap = if session.tap_candidate {
                    session.current_tap
                } else {
                    None
                };
            }

            // Single-tap: deferred past the double-tap window so a second
            // tap can still cancel it.
            if !double_tap && enabled.contains(GestureKind::SingleTap) && session.tap_candidate {
                if let Some(record) = session.current_tap {
                    let remaining =
                        config.double_tap.interval_ms as i64 + 1 - (now - record.time_ms) as i64;
                    if remaining >= 0 {
                        single_tap_delay = Some(remaining as u64);
                    }
                }
            }

            // Swipe: combined distance-versus-velocity check, unlike the
            // per-axis tap windows.
            if enabled.contains(GestureKind::Swipe) {
                if let Some(record) = session.current_tap {
                    let dx = primary.x - record.x;
                    let dy = primary.y - record.y;
                    if dx.abs() >= config.swipe.distance || dy.abs() >= config.swipe.distance {
                        let dt = (now - record.time_ms) as f32;
                        let floor = dt * config.swipe.velocity;
                        if dt > 0.0 && dx * dx + dy * dy >= floor * floor {
                            swipe = Some(swipe_direction(dx, dy));
                        }
                    }
                }
            }

            session.finish();
        }

        for id in cancel {
            self.scheduler.cancel(id);
        }

        if tap {
            Self::emit(
                &self.inner,
                GestureEvent::new(GestureKind::Tap, touches.clone()),
            );
        }
        if double_tap {
            Self::emit(
                &self.inner,
                GestureEvent::new(GestureKind::DoubleTap, touches.clone()),
            );
        }
        if let Some(delay) = single_tap_delay {
            let weak = Rc::downgrade(&self.inner);
            let snapshot = touches.clone();
            let id = self.scheduler.schedule(
                delay,
                Box::new(move || Self::fire_single_tap(&weak, snapshot)),
            );
            self.inner.borrow_mut().session.single_tap_timer = Some(id);
        }
        if let Some(direction) = swipe {
            Self::emit(
                &self.inner,
                GestureEvent::with_detail(
                    GestureKind::Swipe,
                    touches.clone(),
                    GestureDetail::Swipe { direction },
                ),
            );
        }
        Self::emit(
            &self.inner,
            GestureEvent::new(GestureKind::PanEnd, touches),
        );
    }

    // ========================================================================
    // Timer targets
    // ========================================================================

    /// Press-timer fire. Races `touch_end`: a still-standing tap candidate
    /// becomes a press, and the candidate is consumed so the eventual lift
    /// is not also a tap.
    fn fire_press(inner: &Weak<RefCell<Inner>>) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let fired = {
            let mut inner_mut = inner.borrow_mut();
            let session = &mut inner_mut.session;
            session.press_timer = None;
            if session.tap_candidate {
                session.tap_candidate = false;
                true
            } else {
                false
            }
        };
        if fired {
            Self::emit(&inner, GestureEvent::new(GestureKind::Press, TouchList::new()));
        }
    }

    /// Single-tap-timer fire: no second tap arrived inside the double-tap
    /// window.
    fn fire_single_tap(inner: &Weak<RefCell<Inner>>, touches: TouchList) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        inner.borrow_mut().session.single_tap_timer = None;
        Self::emit(&inner, GestureEvent::new(GestureKind::SingleTap, touches));
    }

    /// Dispatches `event` to the kind's handlers in registration order,
    /// then the catch-all. No-op for kinds outside the enabled set.
    ///
    /// The handler list is snapshotted and the engine borrow released
    /// before any handler runs.
    fn emit(inner: &Rc<RefCell<Inner>>, event: GestureEvent) {
        let (handlers, on_event) = {
            let inner_ref = inner.borrow();
            if !inner_ref.enabled.contains(event.kind) {
                return;
            }
            (
                inner_ref.registry.snapshot(event.kind),
                inner_ref.on_event.clone(),
            )
        };
        for handler in &handlers {
            handler(&event);
        }
        if let Some(callback) = on_event {
            callback(&event);
        }
    }
}

impl Drop for GestureRecognizer {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.session.press_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = inner.session.single_tap_timer.take() {
            self.scheduler.cancel(id);
        }
        inner.registry.clear();
    }
}

fn collect_touches(points: &[Point]) -> TouchList {
    points.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone, Default)]
    struct ManualClock {
        now: Rc<Cell<u64>>,
    }

    impl ManualClock {
        fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }
    }

    fn rig(events: GestureSet) -> (GestureRecognizer, ManualClock, TimerQueue, Rc<RefCell<Vec<GestureKind>>>) {
        let clock = ManualClock::default();
        let timers = TimerQueue::new(Rc::new(clock.clone()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let recognizer = GestureRecognizer::new(
            RecognizerOptions::new()
                .with_events(events)
                .with_clock(Rc::new(clock.clone()))
                .with_scheduler(Rc::new(timers.clone()))
                .with_on_event(move |event| log.borrow_mut().push(event.kind)),
        );
        (recognizer, clock, timers, seen)
    }

    #[test]
    fn empty_batches_are_no_ops() {
        let (recognizer, _clock, timers, seen) = rig(GestureSet::ALL);
        recognizer.touch_start(&[]);
        recognizer.touch_move(&[]);
        recognizer.touch_end(&[]);
        assert!(seen.borrow().is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn overlapping_touch_start_cancels_the_stale_press_timer() {
        let (recognizer, clock, timers, seen) = rig(GestureSet::ALL);

        recognizer.touch_start(&[Point::new(10.0, 10.0)]);
        clock.advance(100);
        // Second touch-down with no touch-up in between discards the
        // first session; its press timer must not fire into the new one.
        recognizer.touch_start(&[Point::new(200.0, 200.0)]);
        assert_eq!(timers.pending_count(), 1);

        clock.advance(200);
        timers.run_due();
        // 300 ms after the first down, only 200 ms after the second: a
        // stale timer would have fired a premature press here.
        assert_eq!(
            seen.borrow().iter().filter(|k| **k == GestureKind::Press).count(),
            0
        );

        clock.advance(51);
        timers.run_due();
        assert_eq!(
            seen.borrow().iter().filter(|k| **k == GestureKind::Press).count(),
            1
        );
    }

    #[test]
    fn press_timer_not_armed_when_press_is_disabled() {
        let (recognizer, _clock, timers, _seen) = rig(GestureSet::new().with(GestureKind::Tap));
        recognizer.touch_start(&[Point::new(0.0, 0.0)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn drop_cancels_pending_timers() {
        let (recognizer, clock, timers, seen) = rig(GestureSet::ALL);

        recognizer.touch_start(&[Point::new(10.0, 10.0)]);
        clock.advance(10);
        recognizer.touch_end(&[Point::new(10.0, 10.0)]);
        // Tap confirmed; the single-tap timer is pending.
        assert_eq!(timers.pending_count(), 1);

        drop(recognizer);
        assert!(timers.is_empty());

        clock.advance(1000);
        timers.run_due();
        let kinds = seen.borrow();
        assert!(!kinds.contains(&GestureKind::SingleTap));
    }

    #[test]
    fn failed_tap_does_not_seed_double_tap() {
        let (recognizer, clock, _timers, seen) = rig(GestureSet::ALL);

        // A moved touch: tap candidate falsified, prev_tap stays empty.
        recognizer.touch_start(&[Point::new(0.0, 0.0)]);
        recognizer.touch_move(&[Point::new(50.0, 0.0)]);
        clock.advance(10);
        recognizer.touch_end(&[Point::new(50.0, 0.0)]);

        clock.advance(50);
        recognizer.touch_start(&[Point::new(50.0, 0.0)]);
        clock.advance(10);
        recognizer.touch_end(&[Point::new(50.0, 0.0)]);

        let kinds = seen.borrow();
        assert!(!kinds.contains(&GestureKind::DoubleTap));
    }
}
