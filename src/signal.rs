//! Safe observer primitive: the subject under measurement.
//!
//! A [`Subject`] is a dispatch hub; [`Subject::connect`] registers a handler
//! and returns a [`Connection`] handle. Dropping the handle severs the
//! subscription, and this stays safe in either destruction order: a subject
//! may outlive its connections or vice versa without dangling references.
//!
//! The subject holds only weak references to handler slots; each connection
//! holds the single strong one. Slot lifetime therefore tracks handle
//! lifetime exactly.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Slot<A> = Rc<RefCell<dyn FnMut(&mut A)>>;

/// Dispatch hub for handlers taking a single `&mut A` argument.
pub struct Subject<A> {
    slots: RefCell<Vec<Weak<RefCell<dyn FnMut(&mut A)>>>>,
}

impl<A> Default for Subject<A> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }
}

impl<A> Subject<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. The subscription stays live for as long as the
    /// returned handle does.
    pub fn connect<F>(&self, handler: F) -> Connection<A>
    where
        F: FnMut(&mut A) + 'static,
    {
        let slot: Slot<A> = Rc::new(RefCell::new(handler));
        self.slots.borrow_mut().push(Rc::downgrade(&slot));
        Connection { slot }
    }

    /// Invoke every currently-connected handler exactly once, synchronously.
    ///
    /// The live set is snapshotted up front, so handlers may connect or
    /// disconnect during the broadcast without invalidating the iteration.
    /// Dead slots are pruned as a side effect.
    pub fn broadcast(&self, arg: &mut A) {
        let live: Vec<Slot<A>> = {
            let mut slots = self.slots.borrow_mut();
            slots.retain(|weak| weak.strong_count() > 0);
            slots.iter().filter_map(Weak::upgrade).collect()
        };
        for slot in live {
            (&mut *slot.borrow_mut())(arg);
        }
    }

    /// Number of subscriptions whose handle is still alive.
    pub fn live_connections(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Opaque handle for one live subscription. Dropping it disconnects.
#[must_use = "dropping the connection immediately severs the subscription"]
pub struct Connection<A> {
    #[allow(dead_code)]
    slot: Slot<A>,
}

impl<A> Connection<A> {
    /// Sever the subscription now. Equivalent to dropping the handle.
    pub fn disconnect(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handler(hits: &Rc<Cell<u32>>) -> impl FnMut(&mut u32) + 'static {
        let hits = Rc::clone(hits);
        move |arg: &mut u32| {
            *arg += 1;
            hits.set(hits.get() + 1);
        }
    }

    #[test]
    fn broadcast_invokes_each_handler_once() {
        let subject = Subject::new();
        let hits = Rc::new(Cell::new(0));
        let handles: Vec<_> = (0..5).map(|_| subject.connect(counting_handler(&hits))).collect();

        let mut arg = 0u32;
        subject.broadcast(&mut arg);

        assert_eq!(hits.get(), 5);
        assert_eq!(arg, 5);
        drop(handles);
    }

    #[test]
    fn dropping_the_handle_disconnects() {
        let subject = Subject::new();
        let hits = Rc::new(Cell::new(0));
        let keep = subject.connect(counting_handler(&hits));
        let severed = subject.connect(counting_handler(&hits));

        assert_eq!(subject.live_connections(), 2);
        drop(severed);
        assert_eq!(subject.live_connections(), 1);

        let mut arg = 0u32;
        subject.broadcast(&mut arg);
        assert_eq!(hits.get(), 1);
        drop(keep);
        assert_eq!(subject.live_connections(), 0);
    }

    #[test]
    fn disconnect_consumes_the_handle() {
        let subject: Subject<u32> = Subject::new();
        let handle = subject.connect(|_| {});
        handle.disconnect();
        assert_eq!(subject.live_connections(), 0);
    }

    #[test]
    fn handle_outliving_the_subject_is_safe() {
        let hits = Rc::new(Cell::new(0));
        let handle = {
            let subject = Subject::new();
            subject.connect(counting_handler(&hits))
        };
        // Subject is gone; dropping the orphaned handle must be a no-op.
        drop(handle);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn subject_outliving_all_handles_broadcasts_to_nobody() {
        let subject = Subject::new();
        let hits = Rc::new(Cell::new(0));
        drop(subject.connect(counting_handler(&hits)));

        let mut arg = 0u32;
        subject.broadcast(&mut arg);
        assert_eq!(hits.get(), 0);
        assert_eq!(arg, 0);
    }

    #[test]
    fn handlers_may_disconnect_others_mid_broadcast() {
        let subject: Subject<u32> = Subject::new();
        let victim = Rc::new(RefCell::new(None));

        let victim_ref = Rc::clone(&victim);
        let killer = subject.connect(move |_| {
            victim_ref.borrow_mut().take();
        });
        *victim.borrow_mut() = Some(subject.connect(|arg| *arg += 100));

        let mut arg = 0u32;
        subject.broadcast(&mut arg);
        // Snapshot semantics: the victim was live when the broadcast started,
        // so it still runs this round but is gone for the next one.
        assert_eq!(arg, 100);

        arg = 0;
        subject.broadcast(&mut arg);
        assert_eq!(arg, 0);
        drop(killer);
    }
}
