//! Stable-order handler registry.
//!
//! One ordered handler list per gesture kind; dispatch walks the list in
//! registration order. Handlers are identified by the token returned from
//! [`HandlerRegistry::subscribe`], since closures have no usable identity
//! of their own.

use gestik_core::{GestureEvent, GestureKind};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// A subscriber callback. Shared so dispatch can snapshot the list and
/// invoke it without holding any registry borrow.
pub type GestureHandler = Rc<dyn Fn(&GestureEvent)>;

/// Token identifying one subscription, for targeted removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub struct HandlerRegistry {
    handlers: FxHashMap<GestureKind, Vec<(HandlerId, GestureHandler)>>,
    next_id: u64,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Appends `handler` to the list for `kind`.
    pub fn subscribe(&mut self, kind: GestureKind, handler: GestureHandler) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    /// Removes the matching handler, or every handler for `kind` when no
    /// id is given. Unknown ids are a no-op.
    pub fn unsubscribe(&mut self, kind: GestureKind, id: Option<HandlerId>) {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return;
        };
        match id {
            Some(id) => list.retain(|(entry_id, _)| *entry_id != id),
            None => list.clear(),
        }
    }

    /// The handlers for `kind` in registration order, cloned out so the
    /// caller can invoke them without borrowing the registry.
    pub fn snapshot(&self, kind: GestureKind) -> Vec<GestureHandler> {
        self.handlers
            .get(&kind)
            .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, kind: GestureKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestik_core::TouchList;
    use std::cell::RefCell;

    fn marker(order: &Rc<RefCell<Vec<u32>>>, tag: u32) -> GestureHandler {
        let order = order.clone();
        Rc::new(move |_event| order.borrow_mut().push(tag))
    }

    fn dispatch_all(registry: &HandlerRegistry, kind: GestureKind) {
        let event = GestureEvent::new(kind, TouchList::new());
        for handler in registry.snapshot(kind) {
            handler(&event);
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = HandlerRegistry::new();
        registry.subscribe(GestureKind::Tap, marker(&order, 1));
        registry.subscribe(GestureKind::Tap, marker(&order, 2));
        registry.subscribe(GestureKind::Tap, marker(&order, 3));

        dispatch_all(&registry, GestureKind::Tap);
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_handler() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = HandlerRegistry::new();
        registry.subscribe(GestureKind::Tap, marker(&order, 1));
        let middle = registry.subscribe(GestureKind::Tap, marker(&order, 2));
        registry.subscribe(GestureKind::Tap, marker(&order, 3));

        registry.unsubscribe(GestureKind::Tap, Some(middle));
        dispatch_all(&registry, GestureKind::Tap);
        assert_eq!(*order.borrow(), vec![1, 3]);
    }

    #[test]
    fn unsubscribe_without_id_clears_the_kind() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = HandlerRegistry::new();
        registry.subscribe(GestureKind::Tap, marker(&order, 1));
        registry.subscribe(GestureKind::Tap, marker(&order, 2));
        registry.subscribe(GestureKind::Swipe, marker(&order, 9));

        registry.unsubscribe(GestureKind::Tap, None);
        assert_eq!(registry.len(GestureKind::Tap), 0);
        assert_eq!(registry.len(GestureKind::Swipe), 1);

        dispatch_all(&registry, GestureKind::Tap);
        assert!(order.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_unknown_kind_or_id_is_harmless() {
        let mut registry = HandlerRegistry::new();
        registry.unsubscribe(GestureKind::Pinch, None);

        let order = Rc::new(RefCell::new(Vec::new()));
        let id = registry.subscribe(GestureKind::Tap, marker(&order, 1));
        registry.unsubscribe(GestureKind::Tap, Some(id));
        registry.unsubscribe(GestureKind::Tap, Some(id));
        assert!(registry.is_empty());
    }
}
