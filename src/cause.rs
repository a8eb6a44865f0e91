//! Chained causes and how each family renders itself.
//!
//! A [`Cause`] is decided once, when it is attached, and it fixes which
//! renderer runs later:
//!
//! 1. [`Cause::Http`]: the nested error's full plain-text body
//! 2. [`Cause::Database`]: the data-access layer's own summary
//! 3. [`Cause::Validation`]: the validation formatter
//! 4. [`Cause::Other`]: the error's `Display` message
//!
//! Boxed errors are routed through [`Cause::from`], which recovers an
//! [`HttpError`] hidden in a `Box<dyn Error>` so it still takes the first
//! path.

use std::error::Error as StdError;

use crate::http_error::HttpError;
use crate::validation::{self, Violation, Violations};

/// A type-erased, thread-safe error.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Produces the string an error contributes as somebody else's cause.
pub trait RenderCause {
    fn render_cause(&self) -> String;
}

/// Errors raised by the data-access layer.
///
/// The database client lives outside this crate. Implement this on its error
/// type to get a curated summary instead of the driver's raw message.
///
/// ```rust
/// use httpfault::{Cause, DatabaseError, RenderCause};
///
/// #[derive(Debug)]
/// struct QueryFailed;
///
/// impl std::fmt::Display for QueryFailed {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("duplicate key value violates unique constraint \"users_pkey\"")
///     }
/// }
///
/// impl std::error::Error for QueryFailed {}
///
/// impl DatabaseError for QueryFailed {
///     fn response(&self) -> String {
///         "a user with this id already exists".to_owned()
///     }
/// }
///
/// let cause = Cause::database(QueryFailed);
/// assert_eq!(cause.render_cause(), "a user with this id already exists");
/// ```
pub trait DatabaseError: StdError + Send + Sync + 'static {
    /// Human-readable summary safe to place in a response body.
    fn response(&self) -> String;
}

/// Errors raised by schema validation.
///
/// Only [`violations`](ValidationError::violations) is required; the default
/// [`format`](ValidationError::format) renders them the same way
/// [`Violations`] does.
pub trait ValidationError: StdError + Send + Sync + 'static {
    /// Every constraint that failed, with the path of the offending field.
    fn violations(&self) -> Vec<Violation>;

    fn format(&self) -> String {
        validation::format(&self.violations())
    }
}

impl RenderCause for dyn DatabaseError {
    fn render_cause(&self) -> String {
        self.response()
    }
}

impl RenderCause for dyn ValidationError {
    fn render_cause(&self) -> String {
        self.format()
    }
}

/// The immediate cause of an [`HttpError`].
#[derive(Debug)]
pub enum Cause {
    Http(Box<HttpError>),
    Database(Box<dyn DatabaseError>),
    Validation(Box<dyn ValidationError>),
    Other(BoxError),
}

impl Cause {
    pub fn database(err: impl DatabaseError) -> Self {
        Self::Database(Box::new(err))
    }

    pub fn validation(err: impl ValidationError) -> Self {
        Self::Validation(Box::new(err))
    }

    /// Wraps any other error. An `HttpError` passed here still becomes
    /// [`Cause::Http`].
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::from(err.into())
    }

    /// The cause as a plain `std::error::Error`, for `source()` chains.
    pub fn as_error(&self) -> &(dyn StdError + 'static) {
        match self {
            Self::Http(e) => &**e,
            Self::Database(e) => &**e,
            Self::Validation(e) => &**e,
            Self::Other(e) => &**e,
        }
    }
}

impl RenderCause for Cause {
    fn render_cause(&self) -> String {
        match self {
            Self::Http(e) => e.render_cause(),
            Self::Database(e) => e.render_cause(),
            Self::Validation(e) => e.render_cause(),
            Self::Other(e) => match e.downcast_ref::<HttpError>() {
                Some(http) => http.render_cause(),
                None => e.to_string(),
            },
        }
    }
}

impl From<HttpError> for Cause {
    fn from(err: HttpError) -> Self {
        Self::Http(Box::new(err))
    }
}

impl From<Violations> for Cause {
    fn from(err: Violations) -> Self {
        Self::Validation(Box::new(err))
    }
}

impl From<BoxError> for Cause {
    fn from(err: BoxError) -> Self {
        match err.downcast::<HttpError>() {
            Ok(http) => Self::Http(http),
            Err(other) => Self::Other(other),
        }
    }
}

impl From<std::io::Error> for Cause {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Cause {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
