#![forbid(unsafe_code)]

//! Callback holders.
//!
//! A [`Slot`] wraps one optional callback and remembers at most one active
//! connection. Slots can be connected to a [`Signal`] by reference, leaving
//! the caller in charge of their lifetime, or handed over by value, in which
//! case the signal owns and eventually drops them.
//!
//! # Invariants
//!
//! 1. A slot is connected to at most one signal at any time.
//! 2. `slot.is_connected()` iff exactly one registry holds a connection to
//!    this slot's storage under `slot.key()`.
//! 3. Cloning never duplicates a connection.
//! 4. Dropping a connected slot disconnects it.
//!
//! # Moving
//!
//! A slot's storage sits behind a shared handle, so ordinary Rust moves of a
//! `Slot` value (and `std::mem::swap`) keep the connection intact.
//! [`Slot::take`] is the explicit hand-off: the returned slot gets the
//! callback and the connection, the registry entry is repointed at it, and the
//! source is left empty. Slots owned by a signal are never reachable from
//! user code, so a registry-owned slot cannot be moved out from under its
//! registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::key::SlotKey;
// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::{debug, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, warn};
use crate::signal::{self, Registry, Signal};

/// Shared, type-erased callback.
pub(crate) type Callback<A> = Rc<dyn Fn(A)>;

/// Back-reference from a slot to the registry holding its connection.
pub(crate) struct Link<A: 'static> {
    pub(crate) registry: Weak<RefCell<Registry<A>>>,
    pub(crate) key: SlotKey,
}

impl<A: 'static> Clone for Link<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
            key: self.key,
        }
    }
}

impl<A: 'static> Link<A> {
    pub(crate) fn points_at(&self, registry: &Rc<RefCell<Registry<A>>>) -> bool {
        std::ptr::eq(self.registry.as_ptr(), Rc::as_ptr(registry))
    }
}

/// Storage behind a [`Slot`] handle.
///
/// Registries reference this, never the handle, so the handle itself can be
/// moved freely.
pub(crate) struct SlotCell<A: 'static> {
    callback: RefCell<Option<Callback<A>>>,
    link: RefCell<Option<Link<A>>>,
}

impl<A: 'static> SlotCell<A> {
    fn new(callback: Option<Callback<A>>) -> Self {
        Self {
            callback: RefCell::new(callback),
            link: RefCell::new(None),
        }
    }

    pub(crate) fn callback(&self) -> Option<Callback<A>> {
        self.callback.borrow().clone()
    }

    /// Swap in a new callback; the old one is dropped after the borrow ends.
    fn replace_callback(&self, callback: Option<Callback<A>>) {
        let previous = self.callback.replace(callback);
        drop(previous);
    }

    pub(crate) fn link(&self) -> Option<Link<A>> {
        self.link.borrow().clone()
    }

    pub(crate) fn attach(&self, link: Link<A>) {
        self.link.replace(Some(link));
    }

    pub(crate) fn detach(&self) {
        self.link.replace(None);
    }
}

/// A named callback holder, connectable to at most one [`Signal`].
///
/// `A` is the signal's argument list: `()` for none, a plain type for one
/// argument, a tuple for several.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tether_core::{Signal, Slot};
///
/// let total = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&total);
/// let slot = Slot::new(move |x: i32| sink.set(sink.get() + x));
///
/// let signal = Signal::new();
/// let key = signal.connect(&slot);
/// signal.emit(5);
/// assert_eq!(total.get(), 5);
///
/// signal.disconnect(key);
/// signal.emit(5);
/// assert_eq!(total.get(), 5);
/// ```
pub struct Slot<A: 'static> {
    cell: Rc<SlotCell<A>>,
}

impl<A: 'static> Slot<A> {
    /// A slot with no callback. Dispatch to it is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cell: Rc::new(SlotCell::new(None)),
        }
    }

    /// A slot wrapping a closure.
    #[must_use]
    pub fn new(f: impl Fn(A) + 'static) -> Self {
        Self {
            cell: Rc::new(SlotCell::new(Some(Rc::new(f)))),
        }
    }

    /// A slot bound to a method on a shared receiver.
    ///
    /// The receiver is held weakly: once the last `Rc` to it is dropped,
    /// invoking the slot does nothing.
    #[must_use]
    pub fn from_method<T, F>(target: &Rc<T>, method: F) -> Self
    where
        T: 'static,
        F: Fn(&T, A) + 'static,
    {
        let slot = Self::empty();
        slot.set_method(target, method);
        slot
    }

    /// A slot bound to a method on a mutable receiver.
    ///
    /// The receiver is held weakly. Invocation is skipped when the receiver
    /// has been dropped or is already borrowed (for instance when the method
    /// itself re-emits the signal this slot is connected to).
    #[must_use]
    pub fn from_method_mut<T, F>(target: &Rc<RefCell<T>>, method: F) -> Self
    where
        T: 'static,
        F: Fn(&mut T, A) + 'static,
    {
        let slot = Self::empty();
        slot.set_method_mut(target, method);
        slot
    }

    /// Replace the callback. The connection is left untouched.
    pub fn set_callback(&self, f: impl Fn(A) + 'static) {
        self.cell.replace_callback(Some(Rc::new(f)));
    }

    /// Replace the callback with a method bound to a shared receiver.
    pub fn set_method<T, F>(&self, target: &Rc<T>, method: F)
    where
        T: 'static,
        F: Fn(&T, A) + 'static,
    {
        let target = Rc::downgrade(target);
        self.set_callback(move |args| match target.upgrade() {
            Some(target) => method(target.as_ref(), args),
            None => debug!(message = "slot.bound_target_dropped"),
        });
    }

    /// Replace the callback with a method bound to a mutable receiver.
    pub fn set_method_mut<T, F>(&self, target: &Rc<RefCell<T>>, method: F)
    where
        T: 'static,
        F: Fn(&mut T, A) + 'static,
    {
        let target = Rc::downgrade(target);
        self.set_callback(move |args| {
            let Some(target) = target.upgrade() else {
                debug!(message = "slot.bound_target_dropped");
                return;
            };
            match target.try_borrow_mut() {
                Ok(mut receiver) => method(&mut *receiver, args),
                Err(_) => warn!(message = "slot.bound_target_busy"),
            };
        });
    }

    /// Remove the callback, keeping the connection.
    pub fn clear_callback(&self) {
        self.cell.replace_callback(None);
    }

    /// Whether a callback is set.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.cell.callback.borrow().is_some()
    }

    /// Invoke the callback directly, bypassing any signal.
    ///
    /// Does nothing when no callback is set.
    pub fn invoke(&self, args: A) {
        if let Some(callback) = self.cell.callback() {
            callback(args);
        }
    }

    /// Whether this slot is connected to some signal.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.cell.link.borrow().is_some()
    }

    /// The key of the active connection, or [`SlotKey::NONE`].
    #[must_use]
    pub fn key(&self) -> SlotKey {
        self.cell
            .link
            .borrow()
            .as_ref()
            .map_or(SlotKey::NONE, |link| link.key)
    }

    /// Whether this slot is connected to `signal` specifically.
    #[must_use]
    pub fn is_connected_to(&self, signal: &Signal<A>) -> bool {
        self.cell
            .link
            .borrow()
            .as_ref()
            .is_some_and(|link| link.points_at(signal.registry()))
    }

    /// Disconnect from whichever signal holds this slot.
    ///
    /// Idempotent; does nothing when not connected.
    pub fn disconnect(&self) {
        let Some(link) = self.cell.link() else {
            return;
        };
        if let Some(registry) = link.registry.upgrade() {
            signal::release(&registry, link.key);
        }
        self.cell.detach();
    }

    /// Move the callback and the connection into a new slot.
    ///
    /// The registry entry is repointed at the returned slot, which is
    /// caller-owned from then on. `self` is left with no callback and no
    /// connection. Nothing is deallocated as part of the hand-off.
    #[must_use = "dropping the returned slot disconnects it"]
    pub fn take(&mut self) -> Self {
        let dest = Self::empty();
        dest.cell.replace_callback(self.cell.callback.take());

        let Some(link) = self.cell.link.take() else {
            return dest;
        };
        let Some(registry) = link.registry.upgrade() else {
            return dest;
        };
        let repointed = registry
            .borrow_mut()
            .connection_mut(link.key)
            .map(|conn| conn.repoint(&dest.cell));
        if let Some(displaced) = repointed {
            debug!(message = "slot.take", key = link.key.raw());
            dest.cell.attach(link);
            drop(displaced);
        }
        dest
    }

    pub(crate) fn cell(&self) -> &Rc<SlotCell<A>> {
        &self.cell
    }
}

impl<A: 'static> Default for Slot<A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A: 'static> Clone for Slot<A> {
    /// Same callback, no connection.
    fn clone(&self) -> Self {
        Self {
            cell: Rc::new(SlotCell::new(self.cell.callback())),
        }
    }

    /// Copy the callback only; `self` keeps its own connection.
    fn clone_from(&mut self, source: &Self) {
        self.cell.replace_callback(source.cell.callback());
    }
}

impl<A: 'static> Drop for Slot<A> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<A: 'static> fmt::Debug for Slot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("has_callback", &self.has_callback())
            .field("key", &self.key())
            .finish()
    }
}
