//! Logging macros that forward to the `tracing` crate.
//!
//! Each level is switched on by a cargo feature of this crate (`log_info`,
//! `log_warnings`, `log_errors`, `log_debug`). A disabled level still type
//! checks its arguments but never emits, so callers do not get unused
//! variable warnings when a level is compiled out.

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}

#[cfg(feature = "log_info")]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        $crate::__private::tracing::info!($($t)*)
    };
}

#[cfg(not(feature = "log_info"))]
#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        if false {
            $crate::__private::tracing::info!($($t)*)
        }
    };
}

#[cfg(feature = "log_warnings")]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        $crate::__private::tracing::warn!($($t)*)
    };
}

#[cfg(not(feature = "log_warnings"))]
#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        if false {
            $crate::__private::tracing::warn!($($t)*)
        }
    };
}

#[cfg(feature = "log_debug")]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        $crate::__private::tracing::debug!($($t)*)
    };
}

#[cfg(not(feature = "log_debug"))]
#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        if false {
            $crate::__private::tracing::debug!($($t)*)
        }
    };
}

#[cfg(feature = "log_errors")]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        $crate::__private::tracing::error!($($t)*)
    };
}

#[cfg(not(feature = "log_errors"))]
#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        if false {
            $crate::__private::tracing::error!($($t)*)
        }
    };
}
