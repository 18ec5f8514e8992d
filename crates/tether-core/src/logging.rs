#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature enabled this re-exports the `tracing` event
//! macros. Without it, no-op macros of the same names are exported at the
//! crate root and call sites import them from there:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::debug;
//! #[cfg(not(feature = "tracing"))]
//! use crate::debug;
//! ```
//!
//! Events use dotted message names and structured fields, e.g.
//! `debug!(message = "signal.connect", key = key.raw(), owned = false)`.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}
