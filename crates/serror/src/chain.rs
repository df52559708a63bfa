//! Causal-chain walking and the `is` / `find` / `unwrap` predicates.
//!
//! Every function here takes `&(dyn Error + 'static)`; `&SError`,
//! `&io::Error` and `&*boxed` all coerce to it.

use std::error::Error;
use std::io;
use std::iter::FusedIterator;

use crate::{Frame, SError};

/// Iterator over a causal chain: `err`, `err.source()`, and so on.
///
/// A custom `io::Error` steps into its payload. `io::Error::source()` skips
/// the payload and reports the payload's own source instead.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
            Some(inner) => Some(inner as &(dyn Error + 'static)),
            None => current.source(),
        };
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Walk the causal chain starting at (and including) `err`.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// The last error in the chain.
pub fn root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    chain(err).last().unwrap_or(err)
}

/// Nearest `SError` in the chain, `err` itself included.
///
/// Foreign wrappers in between are walked through as long as they report
/// their inner error from `source()`.
pub(crate) fn unwrap_prev<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a SError> {
    chain(err).find_map(|e| e.downcast_ref::<SError>())
}

/// Frames of the nearest `SError` in the chain, or an empty slice.
pub fn frames<'a>(err: &'a (dyn Error + 'static)) -> &'a [Frame] {
    match unwrap_prev(err) {
        Some(traced) => traced.frames(),
        None => &[],
    }
}

/// One step down the chain. Same as `err.source()`.
#[inline]
pub fn unwrap<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    err.source()
}

/// True if any error in the chain is a `T` equal to `target`.
///
/// ```
/// static ERR_NO_ROWS: serror::Sentinel = serror::new("sql: no rows in result set");
///
/// let err = serror::errorf!(wrap = ERR_NO_ROWS.clone(), "cannot query");
/// assert!(serror::is(&err, &ERR_NO_ROWS));
/// assert!(!serror::is(&err, &serror::new("sql: tx done")));
/// ```
pub fn is<T>(err: &(dyn Error + 'static), target: &T) -> bool
where
    T: Error + PartialEq + 'static,
{
    chain(err).any(|e| e.downcast_ref::<T>() == Some(target))
}

/// First error in the chain that is a `T`.
///
/// Finds a concrete type anywhere in the chain, annotations included.
pub fn find<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    chain(err).find_map(|e| e.downcast_ref::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io;

    use crate::{new, Sentinel, Stack};

    static ERR_NO_ROWS: Sentinel = new("sql: no rows in result set");

    /// A foreign wrapper, the way a third-party crate would write one.
    #[derive(Debug)]
    struct QueryError {
        inner: Box<dyn Error + Send + Sync>,
    }

    impl fmt::Display for QueryError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "query failed: {}", self.inner)
        }
    }

    impl Error for QueryError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self.inner.as_ref() as &(dyn Error + 'static))
        }
    }

    /// A foreign error that hides its cause.
    #[derive(Debug)]
    struct Opaque;

    impl fmt::Display for Opaque {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("opaque")
        }
    }

    impl Error for Opaque {}

    fn stacked(cause: impl Into<crate::BoxError>) -> SError {
        SError::from_parts(
            cause,
            Stack::from_frames(vec![Frame::new("src/db.rs", "app::db::query", 7)]),
        )
    }

    #[test]
    fn chain_lists_every_link() {
        let err = QueryError {
            inner: Box::new(stacked(ERR_NO_ROWS.clone())),
        };
        let messages: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "query failed: sql: no rows in result set",
                "sql: no rows in result set",
                "sql: no rows in result set",
            ]
        );
    }

    #[test]
    fn root_cause_is_last() {
        let err = QueryError {
            inner: Box::new(stacked(ERR_NO_ROWS.clone())),
        };
        let root = root_cause(&err);
        assert_eq!(root.downcast_ref::<Sentinel>(), Some(&ERR_NO_ROWS));
        assert!(root_cause(&Opaque).is::<Opaque>());
    }

    #[test]
    fn unwrap_prev_walks_through_foreign_wrappers() {
        let err = QueryError {
            inner: Box::new(QueryError {
                inner: Box::new(stacked(ERR_NO_ROWS.clone())),
            }),
        };
        let traced = unwrap_prev(&err).expect("SError two levels down");
        assert_eq!(traced.frames()[0].function, "app::db::query");
        assert_eq!(frames(&err).len(), 1);
    }

    #[test]
    fn unwrap_prev_none_without_annotation() {
        let err = QueryError {
            inner: Box::new(ERR_NO_ROWS.clone()),
        };
        assert!(unwrap_prev(&err).is_none());
        assert!(frames(&err).is_empty());
        assert!(frames(&Opaque).is_empty());
    }

    #[test]
    fn is_matches_through_annotation() {
        let err = stacked(QueryError {
            inner: Box::new(ERR_NO_ROWS.clone()),
        });
        assert!(is(&err, &ERR_NO_ROWS));
        assert!(!is(&err, &Sentinel::new("sql: tx done")));
    }

    #[test]
    fn is_stops_at_opaque_errors() {
        let err = stacked(Opaque);
        assert!(!is(&err, &ERR_NO_ROWS));
    }

    #[test]
    fn find_locates_concrete_type() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = stacked(QueryError {
            inner: Box::new(io_err),
        });
        let found = find::<io::Error>(&err).expect("io::Error in chain");
        assert_eq!(found.kind(), io::ErrorKind::NotFound);
        assert!(find::<QueryError>(&err).is_some());
        assert!(find::<SError>(&err).is_some());
        assert!(find::<Opaque>(&err).is_none());
    }

    #[test]
    fn chain_steps_into_io_payload() {
        let io_err = io::Error::new(io::ErrorKind::Other, stacked(ERR_NO_ROWS.clone()));
        let err = QueryError {
            inner: Box::new(io_err),
        };
        assert_eq!(frames(&err)[0].function, "app::db::query");
        assert!(find::<SError>(&err).is_some());
        assert!(is(&err, &ERR_NO_ROWS));
    }

    #[test]
    fn unwrap_is_one_step() {
        let err = stacked(ERR_NO_ROWS.clone());
        let next = unwrap(&err).expect("cause");
        assert!(next.is::<Sentinel>());
        assert!(unwrap(next).is_none());
    }
}
