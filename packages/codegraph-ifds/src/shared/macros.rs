//! Shared macros for the crate
//!
//! `hot_trace!` logs from the solver's inner loop. Without the `trace` feature
//! the call sits behind `if false`, so its arguments are still type-checked
//! but the event is compiled out.

#[cfg(not(feature = "trace"))]
macro_rules! hot_trace {
    ($($arg:tt)*) => {
        if false {
            ::tracing::trace!($($arg)*);
        }
    };
}

#[cfg(feature = "trace")]
macro_rules! hot_trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}
