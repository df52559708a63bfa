//! A single entry of a captured call stack.
//!
//! Frames are plain values: the source file, the demangled function path
//! and the line number, as reported by the debug info of the running binary.
//!
//! ```text
//! {src/db.rs:42:app::db::query}      <- Details form  ({file:line:function})
//!
//! app::db::query                     <- Stack form
//!         src/db.rs:42
//! ```

use std::fmt;

/// One frame of a captured call stack.
///
/// `line` is `0` when the debug info carried a symbol but no line table entry.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl Frame {
    /// Build a frame by hand.
    ///
    /// ```
    /// use serror::Frame;
    /// let frame = Frame::new("src/db.rs", "app::db::query", 42);
    /// assert_eq!(frame.to_string(), "src/db.rs:42:app::db::query");
    /// ```
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// Convert a resolved symbol. Returns `None` when the symbol has no name.
    pub(crate) fn from_symbol(symbol: &backtrace::Symbol) -> Option<Self> {
        let name = symbol.name()?;
        Some(Self {
            // `{:#}` drops the trailing `::h<hash>` of legacy mangling.
            function: format!("{:#}", name),
            file: symbol
                .filename()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            line: symbol.lineno().unwrap_or(0),
        })
    }
}

/// `file:line:function`, the form used inside `details` groups.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.function)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("function", &self.function)
            .field("location", &format_args!("{}:{}", self.file, self.line))
            .finish()
    }
}
