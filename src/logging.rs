//! Logging shim: forwards to the `log` facade when the `log` feature is
//! enabled, otherwise the macros expand to nothing.

#[cfg(feature = "log")]
pub(crate) use ::log::{debug, trace, warn};

#[cfg(not(feature = "log"))]
macro_rules! __discard {
    ($($arg:tt)+) => {
        if false {
            let _ = core::format_args!($($arg)+);
        }
    };
}

#[cfg(not(feature = "log"))]
pub(crate) use {__discard as debug, __discard as trace, __discard as warn};
