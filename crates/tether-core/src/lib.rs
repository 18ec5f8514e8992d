#![forbid(unsafe_code)]

//! Core: signals, slots, and the connections between them.
//!
//! A [`Signal`] fires an event with a fixed argument type to every connected
//! [`Slot`]. Either side can end the connection on its own: disconnecting by
//! key, disconnecting the slot, dropping the slot, or dropping the signal all
//! leave both ends consistent.
//!
//! # Ownership
//!
//! - [`Signal::connect`] borrows the slot. The caller keeps it alive; dropping
//!   it disconnects it.
//! - [`Signal::connect_owned`] takes the slot by value. The signal drops it on
//!   disconnect, [`Signal::clear`], or when the signal itself is dropped.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tether_core::{Signal, Slot, SlotKey};
//!
//! let clicks = Rc::new(Cell::new(0u32));
//! let on_click = Signal::<(u16, u16)>::new();
//!
//! let counter = Rc::clone(&clicks);
//! let key = on_click.connect_fn(move |(_x, _y)| counter.set(counter.get() + 1));
//! assert_ne!(key, SlotKey::NONE);
//!
//! on_click.emit((3, 4));
//! on_click.emit((5, 6));
//! assert_eq!(clicks.get(), 2);
//! ```
//!
//! # Features
//!
//! - `tracing`: emit structured `tracing` events for connection lifecycle and
//!   dispatch.
//! - `tracing-json`: `tracing` plus `tracing-subscriber` with its JSON
//!   formatter.

mod connection;
pub mod error;
pub mod key;
mod logging;
pub mod signal;
pub mod slot;

pub use error::{SignalError, SignalResult};
pub use key::SlotKey;
pub use signal::Signal;
pub use slot::Slot;
