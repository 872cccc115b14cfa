//! Change notifications for embedded sub-values.
//!
//! A value that can change independently of the token list (an embedded,
//! separately edited sub-value) exposes a [`ChangeSource`]. The printer asks
//! the editor to watch it, and every subscription is held as a
//! [`Registration`] that unsubscribes when dropped, so replacing the
//! registration list on reprint releases the previous subscriptions.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct ChangeSource {
    listeners: Rc<RefCell<Listeners>>,
}

impl ChangeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Registration {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        Registration {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Notify every live listener.
    pub fn fire(&self) {
        // Listeners may drop registrations while running.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

impl fmt::Debug for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSource")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[must_use = "dropping a Registration unsubscribes its listener"]
pub struct Registration {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fire_reaches_subscribers() {
        let source = ChangeSource::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _registration = source.subscribe(move || counter.set(counter.get() + 1));

        source.fire();
        source.fire();

        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn dropping_registration_unsubscribes() {
        let source = ChangeSource::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let registration = source.subscribe(move || counter.set(counter.get() + 1));
        assert_eq!(source.listener_count(), 1);

        drop(registration);
        source.fire();

        assert_eq!(source.listener_count(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn registration_outliving_source_is_harmless() {
        let source = ChangeSource::new();
        let registration = source.subscribe(|| {});
        drop(source);
        drop(registration);
    }

    #[test]
    fn clones_share_listeners() {
        let source = ChangeSource::new();
        let alias = source.clone();
        let _registration = source.subscribe(|| {});
        assert_eq!(alias.listener_count(), 1);
    }
}
