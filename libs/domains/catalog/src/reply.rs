//! The uniform three-state result container used by every engine operation.
//!
//! Expected "no data" conditions are not errors here: an operation that
//! completes with nothing to return is [`Reply::Empty`], and only genuinely
//! exceptional conditions (store unreachable, execution fault) become
//! [`Reply::Failure`]. Callers branch on [`Reply::is_success`] /
//! [`Reply::is_failure`] instead of pattern-matching every call site.

use crate::error::CatalogError;

/// Outcome of a catalog engine operation.
///
/// - `Success(value)`: the operation produced a usable value (which may be
///   an explicitly empty collection);
/// - `Empty`: the operation completed and found nothing; not an error;
/// - `Failure(error)`: the operation did not complete as intended.
///
/// `Success` can never carry a "null" payload: absence is expressed through
/// `Empty` or an explicit empty collection, never through a nullable value.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Reply<T> {
    Success(T),
    Empty,
    Failure(CatalogError),
}

impl<T> Reply<T> {
    pub fn success(value: T) -> Self {
        Reply::Success(value)
    }

    pub fn empty() -> Self {
        Reply::Empty
    }

    pub fn fail(error: impl Into<CatalogError>) -> Self {
        Reply::Failure(error.into())
    }

    /// True for completed operations: `Success` and `Empty` alike.
    /// This is the truthiness callers branch on; a `Failure` is always falsy.
    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }

    /// True only for `Success`: the operation completed with a payload.
    pub fn has_value(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Reply::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CatalogError> {
        match self {
            Reply::Failure(error) => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Success(value) => Reply::Success(f(value)),
            Reply::Empty => Reply::Empty,
            Reply::Failure(error) => Reply::Failure(error),
        }
    }

    /// Collapse into a `Result` at the HTTP boundary, where `Empty`
    /// becomes a not-found error.
    pub fn into_result(self) -> Result<T, CatalogError> {
        match self {
            Reply::Success(value) => Ok(value),
            Reply::Empty => Err(CatalogError::NotFound),
            Reply::Failure(error) => Err(error),
        }
    }
}

impl<T> Reply<Vec<T>> {
    /// Wrap a row set fetched from a collaborator: zero rows is a completed
    /// operation with nothing to return, not a failure.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Reply::Empty
        } else {
            Reply::Success(rows)
        }
    }
}

impl<T> From<CatalogError> for Reply<T> {
    fn from(error: CatalogError) -> Self {
        Reply::Failure(error)
    }
}
