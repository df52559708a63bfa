//! Call-stack capture.
//!
//! ```text
//! capture()                      errorf! / trace (fresh annotation only)
//!     │  backtrace::trace        raw instruction pointers, cheap
//!     ▼
//! Stack { ips, frames: OnceLock }
//!     │  first frames() call     backtrace::resolve per ip, once
//!     ▼
//! [Frame]                        machinery frames dropped from the front,
//!                                runtime frames dropped from the back
//! ```
//!
//! Resolution is deferred because most errors are handled without ever being
//! rendered. A `Stack` is shared through `Arc` by every `SError` in one causal
//! chain.

use std::ffi::c_void;
use std::fmt;
use std::sync::OnceLock;

use crate::config;
use crate::Frame;

/// Path fragments of the functions that sit between the user's call site and
/// the unwinder. Leading frames matching any of these are dropped.
///
/// `FromResidual` is the `?` operator calling `From<io::Error> for SError`.
const MACHINERY: &[&str] = &[
    "backtrace::",
    "serror::capture::",
    "serror::error::",
    "serror::convert::",
    "serror::panic::",
    "core::ops::try_trait::FromResidual",
];

/// The runtime calls `main` and every test body through this shim. Frames
/// from here outward belong to the runtime.
const SHORT_BACKTRACE_MARKER: &str = "__rust_begin_short_backtrace";

/// A captured call stack.
pub struct Stack {
    ips: Vec<usize>,
    frames: OnceLock<Vec<Frame>>,
}

impl Stack {
    /// A stack with no frames.
    pub fn empty() -> Self {
        Self {
            ips: Vec::new(),
            frames: OnceLock::from(Vec::new()),
        }
    }

    /// A stack with pre-resolved frames, innermost first.
    ///
    /// Used when the frames come from somewhere other than the unwinder,
    /// e.g. deterministic frames in tests or frames shipped across a process
    /// boundary.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            ips: Vec::new(),
            frames: OnceLock::from(frames),
        }
    }

    /// The resolved frames, innermost (most recent call) first.
    pub fn frames(&self) -> &[Frame] {
        self.frames.get_or_init(|| resolve(&self.ips))
    }

    /// True if there are no frames to show.
    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Stack");
        d.field("ips", &self.ips.len());
        match self.frames.get() {
            Some(frames) => d.field("frames", &frames.len()),
            None => d.field("frames", &"<unresolved>"),
        };
        d.finish()
    }
}

/// Record the current thread's call stack.
///
/// Never inlined so that it always shows up as its own machinery frame.
#[inline(never)]
pub(crate) fn capture() -> Stack {
    if !config::capture_enabled() {
        return Stack::empty();
    }

    let limit = config::max_frames();
    let mut ips = Vec::with_capacity(limit.min(64));
    backtrace::trace(|frame| {
        ips.push(frame.ip() as usize);
        ips.len() < limit
    });

    tracing::trace!(ips = ips.len(), "captured call stack");

    Stack {
        ips,
        frames: OnceLock::new(),
    }
}

fn resolve(ips: &[usize]) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(ips.len());
    let mut leading = true;

    'ips: for &ip in ips {
        // One ip can resolve to several symbols when calls were inlined;
        // backtrace reports them innermost first.
        let mut symbols = Vec::new();
        backtrace::resolve(ip as *mut c_void, |symbol| {
            if let Some(frame) = Frame::from_symbol(symbol) {
                symbols.push(frame);
            }
        });

        for frame in symbols {
            if frame.function.contains(SHORT_BACKTRACE_MARKER) {
                break 'ips;
            }
            if leading && is_machinery(&frame.function) {
                continue;
            }
            leading = false;
            frames.push(frame);
        }
    }

    frames
}

fn is_machinery(function: &str) -> bool {
    !function.contains("::tests::") && MACHINERY.iter().any(|m| function.contains(m))
}
