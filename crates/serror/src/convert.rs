use std::fmt;
use std::io;

use crate::message::{Panic, Sentinel};
use crate::{find, BoxError, SError, SResult};

/// Annotate an error with a stack. See [`SError::trace`].
#[inline(never)]
pub fn trace<E>(err: E) -> SError
where
    E: Into<BoxError>,
{
    SError::trace(err)
}

/// Nil-safe [`trace`]: `None` in, `None` out.
#[inline(never)]
pub fn trace_opt<E>(err: Option<E>) -> Option<SError>
where
    E: Into<BoxError>,
{
    match err {
        Some(err) => Some(SError::trace(err)),
        None => None,
    }
}

/// Take back an `SError` that an `io::Result` layer boxed as its payload.
///
/// Any other `io::Error` is handed back untouched.
pub(crate) fn unbox_io(err: io::Error) -> Result<SError, io::Error> {
    if !err.get_ref().is_some_and(|inner| inner.is::<SError>()) {
        return Err(err);
    }
    let kind = err.kind();
    match err.into_inner() {
        Some(inner) => match inner.downcast::<SError>() {
            Ok(traced) => Ok(*traced),
            Err(inner) => Err(io::Error::new(kind, inner)),
        },
        None => Err(io::Error::from(kind)),
    }
}

// ── From<io::Error> ───────────────────────────────────────────────

impl From<io::Error> for SError {
    /// Lets `?` annotate io errors on the way out. An `SError` that went
    /// through an `io::Error` comes back with its original stack.
    #[inline(never)]
    fn from(err: io::Error) -> Self {
        SError::trace(err)
    }
}

// ── Into<io::Error> ───────────────────────────────────────────────

impl From<SError> for io::Error {
    /// Wrap the `SError` as a custom io::Error. The kind of the first
    /// `io::Error` in the chain is kept, `Other` otherwise.
    fn from(err: SError) -> Self {
        let kind = find::<io::Error>(&err)
            .map(io::Error::kind)
            .unwrap_or(io::ErrorKind::Other);
        io::Error::new(kind, err)
    }
}

impl From<Sentinel> for SError {
    #[inline(never)]
    fn from(err: Sentinel) -> Self {
        SError::trace(err)
    }
}

impl From<Panic> for SError {
    #[inline(never)]
    fn from(err: Panic) -> Self {
        SError::trace(err)
    }
}

// ── ResultExt: annotation on Results ──────────────────────────────

/// Extension trait for annotating the error branch of any `Result`.
///
/// `Ok` values pass through untouched, which makes these safe in a plain
/// `return` or behind `?`:
///
/// ```
/// use serror::{ResultExt, SResult};
///
/// fn read_config(path: &str) -> SResult<String> {
///     std::fs::read_to_string(path).wrap_err(format!("reading {}", path))
/// }
///
/// let err = read_config("/definitely/not/here.toml").unwrap_err();
/// assert!(err.to_string().starts_with("reading /definitely/not/here.toml: "));
/// ```
pub trait ResultExt<T> {
    /// Annotate the error with a stack.
    fn trace(self) -> SResult<T>;

    /// Annotate the error and prefix its message: `"<context>: <error>"`.
    fn wrap_err<C>(self, context: C) -> SResult<T>
    where
        C: fmt::Display;

    /// Like `wrap_err`, with the context built only on error.
    fn with_wrap_err<C, F>(self, context: F) -> SResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline(never)]
    fn trace(self) -> SResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(SError::trace(err)),
        }
    }

    #[inline(never)]
    fn wrap_err<C>(self, context: C) -> SResult<T>
    where
        C: fmt::Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(SError::from_wrapped(err, context.to_string())),
        }
    }

    #[inline(never)]
    fn with_wrap_err<C, F>(self, context: F) -> SResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(SError::from_wrapped(err, context().to_string())),
        }
    }
}
