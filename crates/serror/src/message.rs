//! Leaf error types: sentinels, formatted messages, panic payloads.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::BoxError;

/// A plain error with a fixed message and no stack.
///
/// Meant for well-known values kept in `static`s and compared with
/// [`is`](crate::is). Two sentinels are equal when their messages are equal.
///
/// ```
/// use serror::Sentinel;
///
/// static ERR_NO_ROWS: Sentinel = serror::new("sql: no rows in result set");
///
/// let err = serror::trace(ERR_NO_ROWS.clone());
/// assert!(serror::is(&err, &ERR_NO_ROWS));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{text}")]
pub struct Sentinel {
    text: Cow<'static, str>,
}

impl Sentinel {
    /// Const constructor for statics.
    pub const fn new(text: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
        }
    }

    /// Sentinel from a runtime string.
    pub fn owned(text: impl Into<String>) -> Self {
        Self {
            text: Cow::Owned(text.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Returns a plain error that formats as `text`. No stack is captured.
///
/// Use this for errors stored in statics; use [`errorf!`](crate::errorf)
/// everywhere else.
pub const fn new(text: &'static str) -> Sentinel {
    Sentinel::new(text)
}

/// The error a non-error panic payload turns into. Formats as `panic: <payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("panic: {payload}")]
pub struct Panic {
    payload: String,
}

impl Panic {
    pub(crate) fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The payload's text, without the `panic: ` prefix.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Message built by `errorf!`, optionally linked to the error it embeds.
pub(crate) struct Message {
    text: String,
    source: Option<BoxError>,
}

impl Message {
    pub(crate) fn new(text: String) -> Self {
        Self { text, source: None }
    }

    /// `"<context>: <cause>"`, with `cause` kept as the source.
    pub(crate) fn wrap(context: impl fmt::Display, cause: BoxError) -> Self {
        Self {
            text: format!("{}: {}", context, cause),
            source: Some(cause),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Message");
        d.field("text", &self.text);
        if let Some(src) = &self.source {
            d.field("source", src);
        }
        d.finish()
    }
}

impl StdError for Message {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
