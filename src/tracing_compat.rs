//! Optional tracing integration.
//!
//! With the `tracing-integration` feature the macros below are the `tracing`
//! crate's own. Without it they expand to nothing, so logging costs nothing in
//! builds that do not want it.

#[cfg(feature = "tracing-integration")]
pub(crate) use tracing::{debug, info, trace, warn};

// Distinct names keep `warn` from colliding with the built-in lint attribute.
#[cfg(not(feature = "tracing-integration"))]
mod noop {
    macro_rules! noop_debug {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! noop_info {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! noop_trace {
        ($($arg:tt)*) => {{}};
    }
    macro_rules! noop_warn {
        ($($arg:tt)*) => {{}};
    }
    pub(crate) use {noop_debug, noop_info, noop_trace, noop_warn};
}

#[cfg(not(feature = "tracing-integration"))]
pub(crate) use noop::{
    noop_debug as debug, noop_info as info, noop_trace as trace, noop_warn as warn,
};
