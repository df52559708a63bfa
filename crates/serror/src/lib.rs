//! # serror — Stacked Error
//!
//! Error values annotated with the call stack of their origin, plus the
//! chain-walking and rendering helpers needed to log them.
//!
//! ## Design
//!
//! [`SError`] wraps any `Error + Send + Sync + 'static` and shares a single
//! captured [`Stack`] with every other `SError` in the same causal chain:
//!
//! - **Capture once.** The first annotation in a chain records the stack.
//!   Every later [`trace`] up the call stack reuses it, so the original
//!   failure site is never lost and snapshots never pile up.
//! - **Transparent.** `Display` is the cause's message, `source()` is the
//!   cause. [`is`] and [`find`] match sentinels and concrete types as if no
//!   annotation had happened, even across foreign wrappers.
//! - **Lazy.** Capture records raw instruction pointers; symbols are resolved
//!   the first time the frames are rendered.
//!
//! ## Quick Start
//!
//! ```rust
//! use serror::{errorf, ResultExt, SResult, Sentinel};
//!
//! static ERR_NO_ROWS: Sentinel = serror::new("sql: no rows in result set");
//!
//! fn query() -> SResult<u64> {
//!     Err(errorf!(wrap = ERR_NO_ROWS.clone(), "cannot query"))
//! }
//!
//! fn handler() -> SResult<u64> {
//!     query().trace()
//! }
//!
//! let err = handler().unwrap_err();
//! assert_eq!(err.to_string(), "cannot query: sql: no rows in result set");
//! assert!(serror::is(&err, &ERR_NO_ROWS));
//!
//! // {cannot query: sql: no rows in result set} {src/lib.rs:12:doc::query} ...
//! println!("{}", serror::details(&err));
//! // Multi-line dump, one function + file:line per frame.
//! println!("{}", serror::stack(&err));
//! // error=... details=... as one tracing event.
//! serror::log_fields(&err).emit(tracing::Level::ERROR);
//! ```
//!
//! ## Feature Flags
//!
//! | Flag    | Effect |
//! |---------|--------|
//! | `serde` | Derives `Serialize` on [`Frame`] and [`LogFields`] |
//!
//! Capture can also be switched off or bounded at runtime with
//! [`set_capture_enabled`] and [`set_max_frames`].

mod frame;
mod config;
mod capture;
mod message;
mod error;
mod chain;
mod render;
mod panic;
#[macro_use]
mod macros;
mod convert;

// ── Public API ────────────────────────────────────────────────────

pub use frame::Frame;
pub use config::{capture_enabled, max_frames, set_capture_enabled, set_max_frames, DEFAULT_MAX_FRAMES};
pub use capture::Stack;
pub use message::{new, Panic, Sentinel};
pub use error::SError;
pub use chain::{chain, find, frames, is, root_cause, unwrap, Chain};
pub use render::{details, log_fields, log_value, stack, write_stack, LogFields, LogValue};
pub use panic::{catch, recover};
pub use convert::{trace, trace_opt, ResultExt};

/// The boxed error every annotation wraps.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience Result alias.
pub type SResult<T> = Result<T, SError>;
