#![forbid(unsafe_code)]

//! The edge record between a signal's registry and one slot.
//!
//! A [`Connection`] lives only inside a registry map and is never handed to
//! users. It knows its key and how the slot is held:
//!
//! - [`SlotTarget::Owned`]: the registry took the slot by value and drops it
//!   exactly once, when the connection is severed.
//! - [`SlotTarget::Borrowed`]: the caller owns the slot; the registry holds a
//!   weak handle and only clears the slot's back-reference.
//!
//! The rest of the crate talks to a connection through two capabilities:
//! [`Connection::sever`] and [`Connection::repoint`].
//!
//! # Invariants
//!
//! 1. A severed connection leaves its slot with no back-reference.
//! 2. `sever()` returns the slot iff the connection owned it; the caller
//!    drops it after every registry borrow has been released.
//! 3. A repointed connection is always `Borrowed`.

use std::rc::{Rc, Weak};

use crate::key::SlotKey;
use crate::slot::{Slot, SlotCell};

/// How a connection holds its slot.
pub(crate) enum SlotTarget<A: 'static> {
    /// Registry-owned slot created by `connect_owned`.
    Owned(Slot<A>),
    /// Caller-owned slot.
    Borrowed(Weak<SlotCell<A>>),
}

/// One registry entry.
pub(crate) struct Connection<A: 'static> {
    key: SlotKey,
    target: SlotTarget<A>,
}

impl<A: 'static> Connection<A> {
    pub(crate) fn owned(key: SlotKey, slot: Slot<A>) -> Self {
        Self {
            key,
            target: SlotTarget::Owned(slot),
        }
    }

    pub(crate) fn borrowed(key: SlotKey, cell: &Rc<SlotCell<A>>) -> Self {
        Self {
            key,
            target: SlotTarget::Borrowed(Rc::downgrade(cell)),
        }
    }

    pub(crate) fn key(&self) -> SlotKey {
        self.key
    }

    /// Whether the registry is responsible for dropping the slot.
    pub(crate) fn owns_slot(&self) -> bool {
        matches!(self.target, SlotTarget::Owned(_))
    }

    /// Strong handle to the slot storage, if it is still alive.
    pub(crate) fn cell(&self) -> Option<Rc<SlotCell<A>>> {
        match &self.target {
            SlotTarget::Owned(slot) => Some(Rc::clone(slot.cell())),
            SlotTarget::Borrowed(weak) => weak.upgrade(),
        }
    }

    /// Retarget this connection at a different slot storage.
    ///
    /// The new target is caller-owned, so the connection becomes `Borrowed`.
    /// A previously owned slot is handed back for the caller to drop outside
    /// the registry borrow.
    #[must_use = "a displaced owned slot must be dropped outside the registry borrow"]
    pub(crate) fn repoint(&mut self, cell: &Rc<SlotCell<A>>) -> Option<Slot<A>> {
        let previous = std::mem::replace(
            &mut self.target,
            SlotTarget::Borrowed(Rc::downgrade(cell)),
        );
        match previous {
            SlotTarget::Owned(slot) => {
                slot.cell().detach();
                Some(slot)
            }
            SlotTarget::Borrowed(_) => None,
        }
    }

    /// Take ownership of `slot` under this connection's key.
    ///
    /// The back-reference is left as is. A different previously owned slot
    /// is handed back for the caller to drop outside the registry borrow.
    #[must_use = "a displaced owned slot must be dropped outside the registry borrow"]
    pub(crate) fn adopt(&mut self, slot: Slot<A>) -> Option<Slot<A>> {
        match std::mem::replace(&mut self.target, SlotTarget::Owned(slot)) {
            SlotTarget::Owned(previous) => {
                previous.cell().detach();
                Some(previous)
            }
            SlotTarget::Borrowed(_) => None,
        }
    }

    /// Clear the slot's back-reference and release the connection.
    #[must_use = "an owned slot must be dropped outside the registry borrow"]
    pub(crate) fn sever(self) -> Option<Slot<A>> {
        match self.target {
            SlotTarget::Owned(slot) => {
                slot.cell().detach();
                Some(slot)
            }
            SlotTarget::Borrowed(weak) => {
                if let Some(cell) = weak.upgrade() {
                    cell.detach();
                }
                None
            }
        }
    }
}
