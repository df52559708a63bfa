//! Rendering for logs and diagnostics.
//!
//! Three shapes of the same information:
//!
//! ```text
//! details   {boom} {src/a.rs:3:app::inner} {src/b.rs:9:app::outer}
//!
//! stack     boom
//!
//!           app::inner
//!                   src/a.rs:3
//!           app::outer
//!                   src/b.rs:9
//!
//! fields    error=boom details={boom} {src/a.rs:3:app::inner} ...
//! ```
//!
//! Frames always come from the nearest `SError` in the chain; foreign errors
//! render as their message alone.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Write};

use tracing::Level;

use crate::chain::{self, unwrap_prev};

/// One-line diagnostic: `{message}` followed by one `{file:line:function}`
/// group per frame, innermost first.
pub fn details(err: &(dyn Error + 'static)) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(out, "{{{}}}", err);
    for frame in chain::frames(err) {
        let _ = write!(out, " {{{}}}", frame);
    }
    out
}

/// Multi-line stack dump. An error with no annotation renders as its message.
pub fn stack(err: &(dyn Error + 'static)) -> String {
    let mut out = String::new();
    let _ = write_stack(&mut out, err);
    out
}

/// Write the `stack` dump into a caller-supplied buffer.
pub fn write_stack<W>(w: &mut W, err: &(dyn Error + 'static)) -> fmt::Result
where
    W: Write + ?Sized,
{
    let traced = match unwrap_prev(err) {
        Some(traced) => traced,
        None => return write!(w, "{}", err),
    };

    write!(w, "{}\n\n", err)?;
    for frame in traced.frames() {
        writeln!(w, "{}", frame.function)?;
        writeln!(w, "\t{}:{}", frame.file, frame.line)?;
    }
    Ok(())
}

// ── Structured logging ────────────────────────────────────────────

/// The two fields a log record needs to carry an error: `error` and `details`.
///
/// ```
/// let err = serror::errorf!("disk full");
/// let fields = serror::log_fields(&err);
/// assert_eq!(fields.error, "disk full");
/// fields.emit(tracing::Level::WARN);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogFields {
    pub error: String,
    pub details: String,
}

impl LogFields {
    /// Key/value pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("error", self.error.as_str()), ("details", self.details.as_str())].into_iter()
    }

    pub fn into_map(self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("error", self.error), ("details", self.details)])
    }

    /// Emit one `tracing` event carrying both fields at `level`.
    pub fn emit(&self, level: Level) {
        let (error, details) = (&self.error, &self.details);
        if level == Level::ERROR {
            tracing::error!(error = %error, details = %details);
        } else if level == Level::WARN {
            tracing::warn!(error = %error, details = %details);
        } else if level == Level::INFO {
            tracing::info!(error = %error, details = %details);
        } else if level == Level::DEBUG {
            tracing::debug!(error = %error, details = %details);
        } else {
            tracing::trace!(error = %error, details = %details);
        }
    }
}

/// Fields for a structured log call.
pub fn log_fields(err: &(dyn Error + 'static)) -> LogFields {
    LogFields {
        error: err.to_string(),
        details: details(err),
    }
}

/// `LogFields` as a single grouped value.
///
/// `Display` renders `error="..." details="..."`, so it drops into any
/// `tracing` macro as a `%` field. [`span`](LogValue::span) groups the two
/// fields under one span instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogValue {
    fields: LogFields,
}

impl LogValue {
    pub fn fields(&self) -> &LogFields {
        &self.fields
    }

    /// An `error`-level span named `error` carrying both fields.
    pub fn span(&self) -> tracing::Span {
        tracing::error_span!(
            "error",
            error = %self.fields.error,
            details = %self.fields.details
        )
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error={:?} details={:?}",
            self.fields.error, self.fields.details
        )
    }
}

impl From<LogFields> for LogValue {
    fn from(fields: LogFields) -> Self {
        Self { fields }
    }
}

/// Grouped log value for an error.
pub fn log_value(err: &(dyn Error + 'static)) -> LogValue {
    LogValue::from(log_fields(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use crate::{Frame, SError, Stack};

    fn boom() -> SError {
        SError::from_parts(
            crate::new("boom"),
            Stack::from_frames(vec![
                Frame::new("src/a.rs", "app::inner", 3),
                Frame::new("src/b.rs", "app::outer", 9),
            ]),
        )
    }

    #[test]
    fn details_with_frames() {
        assert_eq!(
            details(&boom()),
            "{boom} {src/a.rs:3:app::inner} {src/b.rs:9:app::outer}"
        );
    }

    #[test]
    fn details_without_annotation() {
        let err = io::Error::new(io::ErrorKind::Other, "plain");
        assert_eq!(details(&err), "{plain}");
    }

    #[test]
    fn details_group_count_matches_frames() {
        let err = boom();
        let groups = details(&err).matches(" {").count();
        assert_eq!(groups, err.frames().len());
    }

    #[test]
    fn stack_dump_layout() {
        assert_eq!(
            stack(&boom()),
            "boom\n\napp::inner\n\tsrc/a.rs:3\napp::outer\n\tsrc/b.rs:9\n"
        );
    }

    #[test]
    fn stack_of_plain_error_is_message() {
        let err = io::Error::new(io::ErrorKind::Other, "plain");
        assert_eq!(stack(&err), "plain");
    }

    #[test]
    fn write_stack_into_buffer() {
        let mut buf = String::from(">> ");
        write_stack(&mut buf, &boom()).unwrap();
        assert!(buf.starts_with(">> boom\n\n"), "got: {:?}", buf);
    }

    #[test]
    fn log_fields_two_entries() {
        let fields = log_fields(&boom());
        assert_eq!(fields.error, "boom");
        assert_eq!(fields.details, details(&boom()));

        let keys: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["error", "details"]);

        let map = fields.into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["error"], "boom");
    }

    #[test]
    fn log_value_display() {
        let value = log_value(&boom());
        assert_eq!(value.fields().error, "boom");
        assert_eq!(
            value.to_string(),
            r#"error="boom" details="{boom} {src/a.rs:3:app::inner} {src/b.rs:9:app::outer}""#
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured_output(f: impl FnOnce()) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(out.clone())
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn emit_carries_both_fields() {
        let logged = captured_output(|| log_fields(&boom()).emit(Level::ERROR));
        assert!(logged.contains("ERROR"), "got: {}", logged);
        assert!(logged.contains("error=boom"), "got: {}", logged);
        assert!(logged.contains("details={boom} {src/a.rs:3:app::inner}"), "got: {}", logged);
    }

    #[test]
    fn span_groups_fields() {
        let logged = captured_output(|| {
            let span = log_value(&boom()).span();
            let _entered = span.enter();
            tracing::info!("handling failure");
        });
        assert!(logged.contains("handling failure"), "got: {}", logged);
        assert!(logged.contains("error=boom"), "got: {}", logged);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn log_fields_serialize() {
        let json = serde_json::to_value(log_fields(&boom())).unwrap();
        assert_eq!(json["error"], "boom");
        assert!(json["details"].as_str().unwrap().starts_with("{boom}"));
    }
}
