//! The application store. `State` is only ever replaced through `reduce`,
//! listeners are told about every change.

pub mod action;
pub mod operations;
pub mod reducer;
pub mod selectors;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

pub use action::Action;
pub use operations::{Outcome, OperationResult};
pub use reducer::reduce;
pub use state::{AuthorizationStatus, Failure, FetchKind, State, Ticket};

type Listener = Rc<dyn Fn(&State)>;

#[derive(Default)]
struct Inner {
    state: State,
    listeners: Vec<(String, Listener)>,
}

/// Cheap to clone handle. All clones share the same state.
#[derive(Clone, Default)]
pub struct Store {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("offers", &inner.state.offers.len())
            .field("city", &inner.state.city)
            .field("authorization_status", &inner.state.authorization_status)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Store {
    pub fn new(state: State) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                listeners: Vec::new(),
            })),
        }
    }

    /// Reduce `action` into the state. Listeners are only called if the
    /// state actually changed.
    pub fn dispatch(&self, action: Action) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            let next = reduce(&inner.state, action);
            if next == inner.state {
                return;
            }
            inner.state = next;
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        // listeners may dispatch or select again, so the borrow has to be gone
        let state = self.state();
        for listener in listeners {
            listener(&state);
        }
    }

    pub fn select<T>(&self, selector: impl FnOnce(&State) -> T) -> T {
        selector(&self.inner.borrow().state)
    }

    /// A snapshot of the current state
    pub fn state(&self) -> State {
        self.inner.borrow().state.clone()
    }

    /// Register `listener` under `id`, replacing an earlier one with the same id
    pub fn subscribe(&self, id: impl Into<String>, listener: impl Fn(&State) + 'static) {
        let id = id.into();
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|(existing, _)| existing != &id);
        inner.listeners.push((id, Rc::new(listener)));
    }

    pub fn unsubscribe(&self, id: &str) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(existing, _)| existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::model::mock::make_offer;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_notifies_on_change_only() {
        let store = Store::default();
        let count = Rc::new(Cell::new(0));
        let cloned = count.clone();
        store.subscribe("counter", move |_| cloned.set(cloned.get() + 1));

        store.dispatch(Action::LoadOffers(vec![make_offer(1, "Paris", 100)].into()));
        assert_eq!(count.get(), 1);
        // same data again, nothing changes
        store.dispatch(Action::LoadOffers(vec![make_offer(1, "Paris", 100)].into()));
        assert_eq!(count.get(), 1);

        store.unsubscribe("counter");
        store.dispatch(Action::ClearError);
        store.dispatch(Action::SelectCity("Paris".to_string()));
        store.dispatch(Action::Reset);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscribe_replaces_same_id() {
        let store = Store::default();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let a = first.clone();
        store.subscribe("view", move |_| a.set(a.get() + 1));
        let b = second.clone();
        store.subscribe("view", move |_| b.set(b.get() + 1));

        store.dispatch(Action::SelectCity("Paris".to_string()));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_listener_may_read_and_dispatch() {
        let store = Store::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (inner, cloned) = (store.clone(), seen.clone());
        store.subscribe("reader", move |state| {
            cloned.borrow_mut().push(state.city.clone());
            if inner.select(|s| s.error.is_some()) {
                inner.dispatch(Action::ClearError);
            }
        });
        store.dispatch(Action::SelectCity("Cologne".to_string()));
        assert_eq!(seen.borrow().as_slice(), &[Some("Cologne".to_string())]);
        assert_eq!(store.select(|s| s.city.clone()), Some("Cologne".to_string()));
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(State::default());
        let other = store.clone();
        other.dispatch(Action::SelectCity("Hamburg".to_string()));
        let city = store.select(|s| selectors::get_city(s).map(str::to_string));
        assert_eq!(city, Some("Hamburg".to_string()));
    }
}
