//! Clock and deferred-callback capabilities.
//!
//! The recognizer never reads wall time or arms timers directly; it goes
//! through [`Clock`] and [`Scheduler`] so hosts can drive it from their
//! event loop and tests can substitute a manual clock. The stock
//! implementations are [`MonotonicClock`] and [`TimerQueue`].

use std::cell::RefCell;
use std::rc::Rc;

/// Monotonic time source, read at every input-boundary call.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

/// Production clock: milliseconds since construction.
pub struct MonotonicClock {
    origin: web_time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Token identifying a scheduled callback, for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Deferred single-shot callbacks.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancels a pending callback. Unknown or already-fired ids are a no-op.
    fn cancel(&self, id: TimerId);
}

struct TimerEntry {
    id: TimerId,
    deadline_ms: u64,
    callback: Box<dyn FnOnce()>,
}

struct TimerQueueState {
    next_id: u64,
    pending: Vec<TimerEntry>,
}

/// Host-pumped scheduler: callbacks accumulate until the owner calls
/// [`TimerQueue::run_due`], typically once per event-loop turn. Clones
/// share the same queue.
#[derive(Clone)]
pub struct TimerQueue {
    clock: Rc<dyn Clock>,
    state: Rc<RefCell<TimerQueueState>>,
}

impl TimerQueue {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(TimerQueueState {
                next_id: 0,
                pending: Vec::new(),
            })),
        }
    }

    /// Runs every callback whose deadline has passed, in deadline order
    /// (scheduling order for equal deadlines). Returns how many fired.
    ///
    /// Callbacks run outside the queue borrow, so they may schedule or
    /// cancel freely.
    pub fn run_due(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let now = self.clock.now_ms();
                let mut due: Option<usize> = None;
                for (index, entry) in state.pending.iter().enumerate() {
                    if entry.deadline_ms > now {
                        continue;
                    }
                    let earlier = match due {
                        Some(current) => {
                            let current = &state.pending[current];
                            (entry.deadline_ms, entry.id.0) < (current.deadline_ms, current.id.0)
                        }
                        None => true,
                    };
                    if earlier {
                        due = Some(index);
                    }
                }
                due.map(|index| state.pending.remove(index))
            };
            match next {
                Some(entry) => {
                    (entry.callback)();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().pending.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        state.pending.push(TimerEntry {
            id,
            deadline_ms: self.clock.now_ms() + delay_ms,
            callback,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.state.borrow_mut().pending.retain(|entry| entry.id != id);
    }
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

    #[test]
    fn callbacks_fire_only_after_their_deadline() {
        let clock = ManualClock::default();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        queue.schedule(100, Box::new(move || flag.set(true)));

        clock.advance(99);
        assert_eq!(queue.run_due(), 0);
        assert!(!fired.get());

        clock.advance(1);
        assert_eq!(queue.run_due(), 1);
        assert!(fired.get());
        assert!(queue.is_empty());
    }

    #[test]
    fn due_callbacks_run_in_deadline_order() {
        let clock = ManualClock::default();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        queue.schedule(200, Box::new(move || log.borrow_mut().push("slow")));
        let log = order.clone();
        queue.schedule(50, Box::new(move || log.borrow_mut().push("fast")));

        clock.advance(500);
        assert_eq!(queue.run_due(), 2);
        assert_eq!(*order.borrow(), vec!["fast", "slow"]);
    }

    #[test]
    fn cancel_removes_pending_entry() {
        let clock = ManualClock::default();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        let fired = Rc::new(Cell::new(0u32));

        let count = fired.clone();
        let keep = queue.schedule(10, Box::new(move || count.set(count.get() + 1)));
        let count = fired.clone();
        let drop_id = queue.schedule(10, Box::new(move || count.set(count.get() + 1)));

        queue.cancel(drop_id);
        // Cancelling twice, or after the fact, is harmless.
        queue.cancel(drop_id);
        assert_eq!(queue.pending_count(), 1);

        clock.advance(10);
        assert_eq!(queue.run_due(), 1);
        assert_eq!(fired.get(), 1);
        queue.cancel(keep);
    }

    #[test]
    fn callbacks_may_schedule_more_work() {
        let clock = ManualClock::default();
        let queue = TimerQueue::new(Rc::new(clock.clone()));
        let fired = Rc::new(Cell::new(0u32));

        let inner_queue = queue.clone();
        let count = fired.clone();
        queue.schedule(
            10,
            Box::new(move || {
                count.set(count.get() + 1);
                let count = count.clone();
                inner_queue.schedule(10, Box::new(move || count.set(count.get() + 1)));
            }),
        );

        clock.advance(10);
        assert_eq!(queue.run_due(), 1);
        assert_eq!(queue.pending_count(), 1);

        clock.advance(10);
        assert_eq!(queue.run_due(), 1);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
