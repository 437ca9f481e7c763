//! Conditional tracing events (compile to nothing without the `tracing`
//! feature).

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        // Evaluate the values to keep call sites warning-free, discard them.
        { let _ = ($($value,)+); }
    };
}

pub(crate) use trace_event;
