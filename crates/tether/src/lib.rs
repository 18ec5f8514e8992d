#![forbid(unsafe_code)]

//! Tether public facade crate.
//!
//! Re-exports the signal/slot primitives from `tether-core` behind a stable
//! surface.
//!
//! ```
//! use tether::prelude::*;
//!
//! let signal: Signal<&'static str> = Signal::new();
//! let slot = Slot::new(|name: &'static str| assert_eq!(name, "ready"));
//! let key: SlotKey = signal.connect(&slot);
//! signal.emit("ready");
//! signal.disconnect(key);
//! ```

pub use tether_core::{Signal, SignalError, SignalResult, Slot, SlotKey};

pub mod prelude {
    pub use tether_core as core;
    pub use tether_core::{Signal, SignalError, SignalResult, Slot, SlotKey};
}
