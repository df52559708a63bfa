/// Construct an `SError` from a format string, capturing the call stack.
///
/// # Forms
///
/// ```ignore
/// // Formatted message:
/// errorf!("port {} already in use", port)
///
/// // Embedding another error: message is "<formatted>: <cause>",
/// // and `cause` stays reachable through `source()`:
/// errorf!(wrap = io_err, "binding port {}", port)
/// ```
///
/// Each call captures the stack of its own call site, so the result is not
/// meant to be kept in a `static`. Use [`new`](crate::new) for that.
#[macro_export]
macro_rules! errorf {
    // ── Embedding a cause ─────────────────────────────────────
    (wrap = $cause:expr, $($arg:tt)+) => {
        $crate::SError::from_wrapped($cause, ::std::format!($($arg)+))
    };

    // ── Plain message ─────────────────────────────────────────
    ($($arg:tt)+) => {
        $crate::SError::from_message(::std::format!($($arg)+))
    };
}

/// Early-return an `errorf!` error if a condition is false.
///
/// ```ignore
/// ensure!(user_id > 0, "bad user id {}", user_id);
/// ```
///
/// The error is converted with `.into()`, so the enclosing function may
/// return `SResult<T>` or any error type an `SError` converts into.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err($crate::errorf!($($arg)+).into());
        }
    };
}
