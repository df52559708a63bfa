use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::capture::{self, Stack};
use crate::chain;
use crate::convert;
use crate::message::Message;
use crate::{BoxError, Frame};

/// Stacked Error: an error annotated with the call stack of its origin.
///
/// An `SError` wraps a cause and shares one captured [`Stack`] with every
/// other `SError` in the same causal chain:
///
/// - **Display** is exactly the cause's display. Annotating never changes
///   the message.
/// - **source()** is the cause, so `is`, `find` and any chain walker see
///   straight through the annotation.
/// - **Frames** come from the earliest capture in the chain. Re-annotating
///   further up the call stack reuses that capture instead of taking a new one.
///
/// ```
/// fn open() -> Result<(), serror::SError> {
///     Err(serror::errorf!("config file {} missing", "app.toml"))
/// }
///
/// let err = open().unwrap_err();
/// assert_eq!(err.to_string(), "config file app.toml missing");
/// assert!(serror::details(&err).starts_with("{config file app.toml missing}"));
/// ```
pub struct SError {
    cause: BoxError,
    stack: Arc<Stack>,
}

// ── Constructors ──────────────────────────────────────────────────

impl SError {
    /// Annotate `err` with a stack.
    ///
    /// If `err` is already an `SError` it is returned as is, and so is an
    /// `SError` that was carried through an `io::Error`. If an `SError` sits
    /// deeper in its causal chain, that capture is reused. Otherwise the
    /// current call stack is captured, starting at the caller.
    #[inline(never)]
    pub fn trace<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let boxed: BoxError = err.into();
        let cause = match boxed.downcast::<SError>() {
            Ok(traced) => return *traced,
            Err(cause) => cause,
        };
        let cause = match cause.downcast::<io::Error>() {
            Ok(io_err) => match convert::unbox_io(*io_err) {
                Ok(traced) => return traced,
                Err(io_err) => Box::new(io_err) as BoxError,
            },
            Err(cause) => cause,
        };
        Self::annotate(cause)
    }

    /// Error from an already formatted message. Backs `errorf!`.
    #[doc(hidden)]
    #[inline(never)]
    pub fn from_message(text: String) -> Self {
        Self::annotate(Box::new(Message::new(text)))
    }

    /// Error whose message is `"<context>: <cause>"` and whose source is
    /// `cause`. Backs `errorf!(wrap = ..)`.
    #[doc(hidden)]
    #[inline(never)]
    pub fn from_wrapped<E>(cause: E, context: String) -> Self
    where
        E: Into<BoxError>,
    {
        Self::annotate(Box::new(Message::wrap(context, cause.into())))
    }

    /// Build an `SError` from a cause and an explicit stack, skipping capture.
    ///
    /// Frames are taken as given, innermost first.
    pub fn from_parts<E>(cause: E, stack: Stack) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            cause: cause.into(),
            stack: Arc::new(stack),
        }
    }

    #[inline(never)]
    pub(crate) fn annotate(cause: BoxError) -> Self {
        let stack = match chain::unwrap_prev(cause.as_ref()) {
            Some(prev) => Arc::clone(&prev.stack),
            None => Arc::new(capture::capture()),
        };
        Self { cause, stack }
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl SError {
    /// The wrapped error.
    #[inline]
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Consume the annotation and return the wrapped error.
    pub fn into_cause(self) -> BoxError {
        self.cause
    }

    /// Captured frames, innermost first. Resolved on first call.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        self.stack.frames()
    }

    /// The captured stack.
    #[inline]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// True if both errors carry the same capture.
    pub fn shares_stack(&self, other: &SError) -> bool {
        Arc::ptr_eq(&self.stack, &other.stack)
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl Error for SError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref() as &(dyn Error + 'static))
    }
}

// ── Display ───────────────────────────────────────────────────────

impl fmt::Display for SError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

// ── Debug ─────────────────────────────────────────────────────────

impl fmt::Debug for SError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SError")
            .field("cause", &self.cause)
            .field("stack", &self.stack)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new, Sentinel};

    static ERR_GONE: Sentinel = new("gone");

    fn injected() -> Stack {
        Stack::from_frames(vec![
            Frame::new("src/store.rs", "app::store::get", 12),
            Frame::new("src/api.rs", "app::api::handle", 40),
        ])
    }

    #[test]
    fn display_is_cause_display() {
        let err = SError::from_parts(ERR_GONE.clone(), injected());
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn source_is_cause() {
        let err = SError::from_parts(ERR_GONE.clone(), injected());
        let src = err.source().expect("SError always has a source");
        assert_eq!(src.downcast_ref::<Sentinel>(), Some(&ERR_GONE));
    }

    #[test]
    fn trace_of_traced_is_identity() {
        let first = SError::from_parts(ERR_GONE.clone(), injected());
        let frames = first.frames().to_vec();
        let again = SError::trace(first);
        assert_eq!(again.frames(), frames.as_slice());
        assert_eq!(again.cause().to_string(), "gone");
    }

    #[test]
    fn annotate_reuses_nested_stack() {
        let inner = SError::from_parts(ERR_GONE.clone(), injected());
        let wrapped = SError::from_wrapped(inner, "lookup failed".to_string());
        assert_eq!(wrapped.to_string(), "lookup failed: gone");
        assert_eq!(wrapped.frames(), injected().frames());

        let nested = wrapped
            .cause()
            .source()
            .and_then(|e| e.downcast_ref::<SError>())
            .expect("nested SError reachable through the message");
        assert!(wrapped.shares_stack(nested));
    }

    #[test]
    fn into_cause_unwraps() {
        let err = SError::from_parts(ERR_GONE.clone(), injected());
        let cause = err.into_cause();
        assert_eq!(cause.downcast_ref::<Sentinel>(), Some(&ERR_GONE));
    }

    #[test]
    fn debug_mentions_cause() {
        let err = SError::from_parts(ERR_GONE.clone(), injected());
        let s = format!("{:?}", err);
        assert!(s.contains("SError"), "got: {}", s);
        assert!(s.contains("gone"), "got: {}", s);
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<SError>();
    }
}
