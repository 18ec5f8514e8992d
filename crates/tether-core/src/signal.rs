#![forbid(unsafe_code)]

//! Signals: connection registries with synchronous fan-out dispatch.
//!
//! # Design
//!
//! A [`Signal`] owns a registry of connections keyed by [`SlotKey`], ordered by
//! key. Keys come from a per-signal counter, so key order is connection order.
//! Every operation takes `&self`; the registry sits behind a `RefCell` and no
//! borrow is ever held while user code runs (callbacks, or drops of owned
//! slots and their captured state).
//!
//! # Invariants
//!
//! 1. Every key in the registry is below [`Signal::next_key`] and was issued by
//!    this signal's counter.
//! 2. Keys are strictly increasing in connect order and never reused;
//!    [`Signal::clear`] keeps the counter, [`Signal::take`] resets the source.
//! 3. A slot connected here has its back-reference pointing at this registry
//!    under the same key.
//! 4. `emit` visits ascending keys, each at most once, and only keys that
//!    were present when it started and are still present when reached.
//!
//! # Concurrency
//!
//! Single-threaded by construction: `Signal` and [`Slot`] are neither `Send`
//! nor `Sync`. Callbacks may connect, disconnect, clear, or emit on the same
//! signal while it is dispatching.
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//! assert_send::<tether_core::Signal<i32>>();
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::connection::Connection;
use crate::error::{SignalError, SignalResult};
use crate::key::SlotKey;
// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::{debug, trace};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace};
use crate::slot::{Link, Slot};

/// Connection table shared between a [`Signal`] and the back-references of
/// its slots.
pub(crate) struct Registry<A: 'static> {
    connections: BTreeMap<SlotKey, Connection<A>>,
    /// Last key issued; `0` when none has been issued yet.
    issued: u64,
}

impl<A: 'static> Registry<A> {
    fn new() -> Self {
        Self {
            connections: BTreeMap::new(),
            issued: 0,
        }
    }

    fn issue_key(&mut self) -> SlotKey {
        self.issued += 1;
        SlotKey::new(self.issued)
    }

    pub(crate) fn connection_mut(&mut self, key: SlotKey) -> Option<&mut Connection<A>> {
        self.connections.get_mut(&key)
    }
}

/// Remove the connection for `key`, sever it, and drop an owned slot.
///
/// Returns whether a connection was removed. The registry borrow is released
/// before the slot is dropped.
pub(crate) fn release<A: 'static>(registry: &RefCell<Registry<A>>, key: SlotKey) -> bool {
    let removed = registry.borrow_mut().connections.remove(&key);
    let Some(conn) = removed else {
        return false;
    };
    debug!(
        message = "signal.disconnect",
        key = key.raw(),
        owned = conn.owns_slot()
    );
    drop(conn.sever());
    true
}

/// An event source that dispatches `A` to every connected [`Slot`].
///
/// `A` is the argument list: `()` for none, a plain type for one argument,
/// a tuple for several.
///
/// # Example
///
/// ```
/// use tether_core::{Signal, Slot};
///
/// let first = Signal::<i32>::new();
/// let second = Signal::<i32>::new();
/// let slot = Slot::new(|_: i32| {});
///
/// first.connect(&slot);
/// second.connect(&slot);
/// assert!(first.is_empty());
/// assert!(slot.is_connected_to(&second));
/// ```
pub struct Signal<A: 'static> {
    registry: Rc<RefCell<Registry<A>>>,
}

impl<A: 'static> Signal<A> {
    /// Create a signal with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
        }
    }

    /// Connect a caller-owned slot.
    ///
    /// The slot must stay alive for as long as it should receive events;
    /// dropping it disconnects it. If the slot is already connected here its
    /// existing key is returned. If it is connected to another signal it is
    /// disconnected there first.
    pub fn connect(&self, slot: &Slot<A>) -> SlotKey {
        if let Some(key) = self.key_of(slot) {
            return key;
        }
        self.migrate(slot);

        let key = self.registry.borrow_mut().issue_key();
        let conn = Connection::borrowed(key, slot.cell());
        self.registry.borrow_mut().connections.insert(key, conn);
        slot.cell().attach(self.link(key));
        debug!(message = "signal.connect", key = key.raw(), owned = false);
        key
    }

    /// Connect a slot that may be absent.
    ///
    /// `None` yields [`SlotKey::NONE`] and creates nothing.
    pub fn connect_opt(&self, slot: Option<&Slot<A>>) -> SlotKey {
        slot.map_or(SlotKey::NONE, |slot| self.connect(slot))
    }

    /// Connect a slot by value. The signal owns it from now on and drops it
    /// when the connection is released.
    ///
    /// A slot already connected here keeps its key and its place in dispatch
    /// order; the signal just takes ownership of it. A slot connected to
    /// another signal is disconnected there first and gets a fresh key.
    pub fn connect_owned(&self, slot: Slot<A>) -> SlotKey {
        if let Some(key) = self.key_of(&slot) {
            let mut registry = self.registry.borrow_mut();
            if let Some(conn) = registry.connection_mut(key) {
                let displaced = conn.adopt(slot);
                drop(registry);
                debug!(message = "signal.connect", key = key.raw(), owned = true);
                drop(displaced);
                return key;
            }
        }
        self.migrate(&slot);

        let key = self.registry.borrow_mut().issue_key();
        slot.cell().attach(self.link(key));
        self.registry
            .borrow_mut()
            .connections
            .insert(key, Connection::owned(key, slot));
        debug!(message = "signal.connect", key = key.raw(), owned = true);
        key
    }

    /// Connect a closure. Shorthand for `connect_owned(Slot::new(f))`.
    pub fn connect_fn(&self, f: impl Fn(A) + 'static) -> SlotKey {
        self.connect_owned(Slot::new(f))
    }

    /// Checked [`connect_opt`](Self::connect_opt).
    ///
    /// # Errors
    ///
    /// [`SignalError::NullSlot`] when `slot` is `None`.
    pub fn try_connect(&self, slot: Option<&Slot<A>>) -> SignalResult<SlotKey> {
        slot.map(|slot| self.connect(slot))
            .ok_or(SignalError::NullSlot)
    }

    /// Remove the connection for `key`. Unknown keys are ignored.
    pub fn disconnect(&self, key: SlotKey) {
        release(&self.registry, key);
    }

    /// Checked [`disconnect`](Self::disconnect).
    ///
    /// # Errors
    ///
    /// [`SignalError::UnknownKey`] when `key` is not in the registry.
    pub fn try_disconnect(&self, key: SlotKey) -> SignalResult<()> {
        if release(&self.registry, key) {
            Ok(())
        } else {
            Err(SignalError::UnknownKey(key))
        }
    }

    /// Disconnect `slot` if it is connected to this signal.
    pub fn disconnect_slot(&self, slot: &Slot<A>) {
        if let Some(key) = self.key_of(slot) {
            release(&self.registry, key);
        }
    }

    /// Checked [`disconnect_slot`](Self::disconnect_slot). Returns the key the
    /// slot was connected under.
    ///
    /// # Errors
    ///
    /// [`SignalError::ForeignSlot`] when `slot` is not connected here.
    pub fn try_disconnect_slot(&self, slot: &Slot<A>) -> SignalResult<SlotKey> {
        let key = self.key_of(slot).ok_or(SignalError::ForeignSlot)?;
        release(&self.registry, key);
        Ok(key)
    }

    /// Disconnect everything. The key counter is kept.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut self.registry.borrow_mut().connections);
        if drained.is_empty() {
            return;
        }
        debug!(message = "signal.clear", count = drained.len());
        for conn in drained.into_values() {
            drop(conn.sever());
        }
    }

    /// Invoke every connected callback, in ascending key order, each with its
    /// own clone of `args`.
    ///
    /// The set of keys to visit is fixed before the first callback runs.
    /// Connections removed during dispatch are skipped; connections added
    /// during dispatch are not visited by this call. A slot with no callback
    /// is skipped.
    pub fn emit(&self, args: A)
    where
        A: Clone,
    {
        let keys = self.keys();
        trace!(message = "signal.emit", recipients = keys.len());

        for key in keys {
            let cell = self
                .registry
                .borrow()
                .connections
                .get(&key)
                .and_then(Connection::cell);
            let Some(callback) = cell.and_then(|cell| cell.callback()) else {
                continue;
            };
            callback(args.clone());
        }
    }

    /// Move every connection and the key counter into a new signal.
    ///
    /// Slots connected here report the returned signal as their owner
    /// afterwards. `self` is left empty with its counter reset, as if newly
    /// created. `std::mem::take` does the same.
    #[must_use = "dropping the returned signal disconnects every slot"]
    pub fn take(&mut self) -> Self {
        let fresh = Rc::new(RefCell::new(Registry::new()));
        let registry = std::mem::replace(&mut self.registry, fresh);
        debug!(
            message = "signal.take",
            count = registry.borrow().connections.len()
        );
        Self { registry }
    }

    /// Number of live connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().connections.len()
    }

    /// Whether there are no connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().connections.is_empty()
    }

    /// Whether `key` names a live connection.
    #[must_use]
    pub fn contains(&self, key: SlotKey) -> bool {
        self.registry.borrow().connections.contains_key(&key)
    }

    /// Live keys in ascending (dispatch) order.
    #[must_use]
    pub fn keys(&self) -> Vec<SlotKey> {
        self.registry
            .borrow()
            .connections
            .values()
            .map(Connection::key)
            .collect()
    }

    /// The key the next successful connect will return.
    #[must_use]
    pub fn next_key(&self) -> SlotKey {
        SlotKey::new(self.registry.borrow().issued + 1)
    }

    /// Whether the connection under `key` holds a signal-owned slot.
    #[must_use]
    pub fn owns(&self, key: SlotKey) -> bool {
        self.registry
            .borrow()
            .connections
            .get(&key)
            .is_some_and(Connection::owns_slot)
    }

    pub(crate) fn registry(&self) -> &Rc<RefCell<Registry<A>>> {
        &self.registry
    }

    fn link(&self, key: SlotKey) -> Link<A> {
        Link {
            registry: Rc::downgrade(&self.registry),
            key,
        }
    }

    /// The slot's key if it is connected to this signal.
    fn key_of(&self, slot: &Slot<A>) -> Option<SlotKey> {
        slot.cell()
            .link()
            .filter(|link| link.points_at(&self.registry))
            .map(|link| link.key)
    }

    /// Release whatever connection `slot` currently has.
    fn migrate(&self, slot: &Slot<A>) {
        if slot.is_connected() {
            debug!(message = "signal.connect.migrate", from_key = slot.key().raw());
            slot.disconnect();
        }
    }
}

impl<A: 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Drop for Signal<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<A: 'static> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Signal")
            .field("connections", &registry.connections.len())
            .field("next_key", &SlotKey::new(registry.issued + 1))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
