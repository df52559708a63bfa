//! Process-wide capture settings.
//!
//! Two knobs, both atomics read on every fresh capture:
//!
//! | Setting           | Default | Effect                                          |
//! |-------------------|---------|-------------------------------------------------|
//! | `capture_enabled` | `true`  | `false` makes every new capture empty           |
//! | `max_frames`      | `256`   | Upper bound on instruction pointers per capture |
//!
//! ```
//! serror::set_max_frames(64);
//! assert_eq!(serror::max_frames(), 64);
//! serror::set_max_frames(serror::DEFAULT_MAX_FRAMES);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Default bound on captured frames.
pub const DEFAULT_MAX_FRAMES: usize = 256;

static CAPTURE_ENABLED: AtomicBool = AtomicBool::new(true);
static MAX_FRAMES: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_FRAMES);

/// Check whether new annotations capture the call stack.
#[inline]
pub fn capture_enabled() -> bool {
    CAPTURE_ENABLED.load(Ordering::Relaxed)
}

/// Turn stack capture on or off for the whole process.
///
/// Errors created while capture is off still wrap their cause and render
/// normally, they just carry no frames. Existing errors are unaffected.
pub fn set_capture_enabled(enabled: bool) {
    CAPTURE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Current bound on captured frames.
#[inline]
pub fn max_frames() -> usize {
    MAX_FRAMES.load(Ordering::Relaxed)
}

/// Set the bound on captured frames. Values below 1 are clamped to 1.
pub fn set_max_frames(limit: usize) {
    MAX_FRAMES.store(limit.max(1), Ordering::Relaxed);
}
