//! Recording event sink.

use gestik_core::{GestureEvent, GestureKind};
use std::cell::RefCell;
use std::rc::Rc;

/// Collects every event it sees, for assertions. Usable both as a
/// per-kind handler (via [`EventRecorder::handler`]) and as the catch-all
/// callback. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GestureEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &GestureEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    /// A subscriber callback that records into this buffer.
    pub fn handler(&self) -> impl Fn(&GestureEvent) + 'static {
        let recorder = self.clone();
        move |event| recorder.record(event)
    }

    pub fn events(&self) -> Vec<GestureEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<GestureKind> {
        self.events.borrow().iter().map(|event| event.kind).collect()
    }

    pub fn count(&self, kind: GestureKind) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.kind == kind)
            .count()
    }

    pub fn last(&self) -> Option<GestureEvent> {
        self.events.borrow().last().cloned()
    }

    pub fn last_of(&self, kind: GestureKind) -> Option<GestureEvent> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|event| event.kind == kind)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
