//! Subscription seam between the identity provider and its observers.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`): the session guard
//! runs on the client's event loop and is re-entered, never blocked, on
//! each notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::AuthState;

/// Callback invoked with each new snapshot.
pub type Listener = Box<dyn FnMut(&AuthState)>;

/// A source of [`AuthState`] snapshots.
///
/// Implemented by the identity provider integration. Listeners must always
/// observe the most recent snapshot.
pub trait AuthStateSource {
    /// Returns the current snapshot.
    fn snapshot(&self) -> AuthState;

    /// Registers `listener`, delivering the current snapshot immediately.
    ///
    /// The listener stays registered until the returned [`Subscription`]
    /// is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Handle keeping a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the action that removes the listener.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribes now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct ChannelInner {
    current: RefCell<AuthState>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    // Ids of the listeners moved out for the current dispatch.
    in_flight: RefCell<Vec<u64>>,
    cancelled: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
    dispatching: Cell<bool>,
    superseded: Cell<bool>,
}

/// An in-process [`AuthStateSource`] fed by [`publish`](Self::publish).
///
/// A snapshot published while listeners are running (for example, from a
/// navigation callback) does not interleave with the current delivery: the
/// remaining listeners skip the stale snapshot and every listener is then
/// called with the newest one.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use session_integrity::session::{AuthState, AuthStateChannel, AuthStateSource};
///
/// let channel = AuthStateChannel::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// let _sub = channel.subscribe(Box::new(move |s: &AuthState| sink.borrow_mut().push(s.loading)));
///
/// channel.publish(AuthState::signed_out());
/// assert_eq!(*seen.borrow(), vec![true, false]);
/// ```
#[derive(Clone)]
pub struct AuthStateChannel {
    inner: Rc<ChannelInner>,
}

impl AuthStateChannel {
    /// Creates a channel in the loading state.
    pub fn new() -> Self {
        Self::with_state(AuthState::loading())
    }

    /// Creates a channel starting from `state`.
    pub fn with_state(state: AuthState) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                current: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
                in_flight: RefCell::new(Vec::new()),
                cancelled: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                dispatching: Cell::new(false),
                superseded: Cell::new(false),
            }),
        }
    }

    /// Number of registered listeners.
    ///
    /// Accurate during a dispatch too: listeners currently being notified
    /// and listeners added by them are both counted, unsubscribed ones are
    /// not.
    pub fn listener_count(&self) -> usize {
        let cancelled = self.inner.cancelled.borrow();
        let in_flight = self.inner.in_flight.borrow();
        let listeners = self.inner.listeners.borrow();

        in_flight
            .iter()
            .copied()
            .chain(listeners.iter().map(|(id, _)| *id))
            .filter(|id| !cancelled.contains(id))
            .count()
    }

    /// Replaces the current snapshot and notifies listeners.
    pub fn publish(&self, state: AuthState) {
        *self.inner.current.borrow_mut() = state;

        if self.inner.dispatching.get() {
            self.inner.superseded.set(true);
            return;
        }

        self.inner.dispatching.set(true);
        loop {
            self.inner.superseded.set(false);
            let snapshot = self.inner.current.borrow().clone();

            // Listeners are moved out so they can publish, subscribe or
            // unsubscribe while running.
            let mut running = std::mem::take(&mut *self.inner.listeners.borrow_mut());
            *self.inner.in_flight.borrow_mut() = running.iter().map(|(id, _)| *id).collect();
            for (id, listener) in running.iter_mut() {
                if self.inner.superseded.get() {
                    break;
                }
                if self.inner.cancelled.borrow().contains(id) {
                    continue;
                }
                listener(&snapshot);
            }

            let added = std::mem::take(&mut *self.inner.listeners.borrow_mut());
            running.extend(added);
            let cancelled = std::mem::take(&mut *self.inner.cancelled.borrow_mut());
            running.retain(|(id, _)| !cancelled.contains(id));
            *self.inner.listeners.borrow_mut() = running;
            self.inner.in_flight.borrow_mut().clear();

            if !self.inner.superseded.get() {
                break;
            }
        }
        self.inner.dispatching.set(false);
    }

    fn remove(inner: &Weak<ChannelInner>, id: u64) {
        let Some(inner) = inner.upgrade() else {
            return;
        };

        if inner.dispatching.get() {
            inner.cancelled.borrow_mut().push(id);
        } else {
            inner.listeners.borrow_mut().retain(|(i, _)| *i != id);
        }
    }
}

impl Default for AuthStateChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStateSource for AuthStateChannel {
    fn snapshot(&self) -> AuthState {
        self.inner.current.borrow().clone()
    }

    fn subscribe(&self, mut listener: Listener) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let snapshot = self.snapshot();
        listener(&snapshot);

        self.inner.listeners.borrow_mut().push((id, listener));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || AuthStateChannel::remove(&weak, id))
    }
}

impl fmt::Debug for AuthStateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStateChannel")
            .field("current", &*self.inner.current.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
