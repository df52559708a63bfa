//! serror demo
//!
//! Builds a three-level failing call chain with a foreign wrapper in the
//! middle, then prints every rendering of the resulting error and logs it.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=debug` - Standard `tracing-subscriber` filter; `trace` also
//!   shows the crate's own capture events.

use std::fmt;

use serror::{errorf, ResultExt, SError, SResult, Sentinel};
use tracing::Level;
use tracing_subscriber::EnvFilter;

static ERR_NO_ROWS: Sentinel = serror::new("sql: no rows in result set");

/// Stands in for an error type from another crate.
#[derive(Debug)]
struct PoolError {
    conn: u32,
    cause: SError,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection #{}: {}", self.conn, self.cause)
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[inline(never)]
fn query(user: u32) -> SResult<String> {
    Err(errorf!(wrap = ERR_NO_ROWS.clone(), "cannot load user {}", user))
}

#[inline(never)]
fn checkout(user: u32) -> Result<String, PoolError> {
    query(user).map_err(|cause| PoolError { conn: 7, cause })
}

#[inline(never)]
fn handle(user: u32) -> SResult<String> {
    checkout(user).trace()
}

// RUST_LOG=trace cargo run -p serror-trace-demo
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== serror demo ===\n");

    let err = match handle(42) {
        Ok(name) => {
            println!("unexpected success: {}", name);
            return;
        }
        Err(err) => err,
    };

    println!("message : {}", err);
    println!("is(no rows): {}", serror::is(&err, &ERR_NO_ROWS));
    println!("frames  : {}", err.frames().len());
    println!("\n--- details ---\n{}", serror::details(&err));
    println!("\n--- stack ---\n{}", serror::stack(&err));

    println!("--- log ---");
    serror::log_fields(&err).emit(Level::ERROR);

    let value = serror::log_value(&err);
    let span = value.span();
    let _entered = span.enter();
    tracing::warn!(user = 42, "request failed");

    match serror::catch(|| -> u32 { panic!("worker state corrupted") }) {
        Ok(_) => println!("no panic"),
        Err(err) => println!("\nrecovered: {}", serror::details(&err)),
    }
}
