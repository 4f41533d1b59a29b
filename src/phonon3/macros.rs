/// `warn!`, but only the first time this particular callsite is reached.
macro_rules! warn_once {
    ($($arg:tt)*) => {{
        static ONCE: ::std::sync::Once = ::std::sync::Once::new();
        ONCE.call_once(|| warn!($($arg)*));
    }};
}

/// Return a `DimensionMismatch` unless the condition holds.
macro_rules! ensure_dims {
    ($cond:expr, $($fmt:tt)+) => {
        if !$cond {
            return Err($crate::error::InteractionError::DimensionMismatch(format!($($fmt)+)).into());
        }
    };
}
