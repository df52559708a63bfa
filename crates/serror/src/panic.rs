//! Turning panic payloads into errors.
//!
//! ```
//! let res = serror::catch(|| -> u32 { panic!("bad input") });
//! let err = res.unwrap_err();
//! assert_eq!(err.to_string(), "panic: bad input");
//! ```
//!
//! The panic hook still runs before the payload reaches us, so the usual
//! `thread '..' panicked at` line is printed unless the caller installs its
//! own hook.

use std::any::Any;
use std::io;
use std::panic::{self, UnwindSafe};

use crate::message::{Panic, Sentinel};
use crate::{BoxError, SError, SResult};

/// Convert the value returned by `catch_unwind` into an error.
///
/// `None` stays `None`. Payloads that are already errors (`SError`, a boxed
/// error, `io::Error`, [`Sentinel`], [`Panic`]) are traced; an `SError` payload keeps its original
/// stack. `&str` and `String` payloads become [`Panic`]; anything else becomes
/// a `Panic` with the text `Box<dyn Any>`.
#[inline(never)]
pub fn recover(payload: Option<Box<dyn Any + Send>>) -> Option<SError> {
    match payload {
        Some(payload) => Some(from_payload(payload)),
        None => None,
    }
}

/// Run `f`, converting a panic into an `Err`.
#[inline(never)]
pub fn catch<F, R>(f: F) -> SResult<R>
where
    F: FnOnce() -> R + UnwindSafe,
{
    match panic::catch_unwind(f) {
        Ok(value) => Ok(value),
        Err(payload) => Err(from_payload(payload)),
    }
}

#[inline(never)]
fn from_payload(payload: Box<dyn Any + Send>) -> SError {
    let payload = match payload.downcast::<SError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return SError::trace(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<io::Error>() {
        Ok(err) => return SError::trace(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Sentinel>() {
        Ok(err) => return SError::trace(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Panic>() {
        Ok(err) => return SError::trace(*err),
        Err(payload) => payload,
    };

    let text = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    };

    tracing::debug!(payload = %text, "recovered panic");
    SError::annotate(Box::new(Panic::new(text)))
}
