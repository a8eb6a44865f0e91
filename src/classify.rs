//! Family predicates.
//!
//! Pure type tests: none of them allocate, render, or panic.

use std::error::Error as StdError;

use crate::cause::Cause;
use crate::http_error::HttpError;

/// `true` for a nested [`HttpError`], however it was attached.
pub fn is_http_error(cause: &Cause) -> bool {
    match cause {
        Cause::Http(_) => true,
        Cause::Other(e) => e.is::<HttpError>(),
        Cause::Database(_) | Cause::Validation(_) => false,
    }
}

/// `true` for errors raised by the data-access layer.
pub fn is_orm_error(cause: &Cause) -> bool {
    matches!(cause, Cause::Database(_))
}

/// `true` for errors raised by schema validation.
pub fn is_validation_error(cause: &Cause) -> bool {
    matches!(cause, Cause::Validation(_))
}

/// Recovers an [`HttpError`] from an opaque error at the response boundary.
///
/// Only the value itself is inspected, not its `source()` chain: a wrapper
/// around an `HttpError` is a foreign error.
pub fn as_http_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a HttpError> {
    err.downcast_ref::<HttpError>()
}
