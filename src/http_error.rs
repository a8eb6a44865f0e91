//! The HTTP error value, its builder, and the two factories.
//!
//! An [`HttpError`] is always either a client error (`4xx`) or a server error
//! (`5xx`). The status code is checked against the registry when the value is
//! built, so rendering never has to cope with a bad code.
//!
//! ```rust
//! use httpfault::{client_error, server_error, HttpError};
//!
//! let missing = client_error(404, "missing").unwrap();
//! assert_eq!(missing.response_body_text(), "404 Not Found: missing\n\t");
//!
//! // server errors hide their cause unless asked not to
//! let hidden = HttpError::server(503, "upstream unavailable")
//!     .cause(missing)
//!     .build()
//!     .unwrap();
//! assert_eq!(hidden.response_body_json().cause, "");
//!
//! assert!(server_error(404, "wrong class").is_err());
//! assert!(client_error(999, "not registered").is_err());
//! ```

use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use serde::Serialize;

use crate::cause::{Cause, RenderCause};
use crate::error::{ErrorClass, StatusError};
use crate::status::Status;

/// `Result` alias for request-handling code.
pub type HttpResult<T> = Result<T, HttpError>;

/// JSON response body.
///
/// Serialises as `{"error":true,"message":"…","cause":"…"}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResponseBody {
    pub error: bool,
    pub message: String,
    pub cause: String,
}

/// A client or server error carrying a registered status code.
#[derive(Debug)]
pub struct HttpError {
    status: Status,
    class: ErrorClass,
    message: String,
    display_cause: bool,
    cause: Option<Cause>,
    location: &'static Location<'static>,
    backtrace: Backtrace,
}

impl HttpError {
    /// Base constructor. The class is taken from the code's first digit.
    ///
    /// # Errors
    ///
    /// [`StatusError::Unknown`] if `code` is not registered,
    /// [`StatusError::NotAnError`] if it is not a `4xx` or `5xx` code.
    #[track_caller]
    pub fn new(
        code: u16,
        message: impl Into<String>,
        display_cause: bool,
    ) -> Result<Self, StatusError> {
        let (status, class) = validate(code, None)?;
        Ok(Self::assemble(status, class, message.into(), display_cause, None))
    }

    /// Starts a client error (`4xx`). Causes are shown by default.
    pub fn client(code: u16, message: impl Into<String>) -> HttpErrorBuilder {
        HttpErrorBuilder::new(code, ErrorClass::Client, message.into())
    }

    /// Starts a server error (`5xx`). Causes are hidden by default.
    pub fn server(code: u16, message: impl Into<String>) -> HttpErrorBuilder {
        HttpErrorBuilder::new(code, ErrorClass::Server, message.into())
    }

    /// `400 Bad Request` with client defaults.
    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::assemble(Status::BadRequest, ErrorClass::Client, message.into(), true, None)
    }

    /// `500 Internal Server Error` with server defaults.
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::assemble(Status::InternalServerError, ErrorClass::Server, message.into(), false, None)
    }

    /// `500 Internal Server Error` with a cause, hidden by default.
    #[track_caller]
    pub fn internal_caused_by(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        let cause = Some(cause.into());
        Self::assemble(Status::InternalServerError, ErrorClass::Server, message.into(), false, cause)
    }

    #[track_caller]
    fn assemble(
        status: Status,
        class: ErrorClass,
        message: String,
        display_cause: bool,
        cause: Option<Cause>,
    ) -> Self {
        Self {
            status,
            class,
            message,
            display_cause,
            cause,
            location: Location::caller(),
            backtrace: Backtrace::capture(),
        }
    }

    /// `"<code> <reason>: <message>\n\t<cause>"`
    pub fn response_body_text(&self) -> String {
        format!(
            "{} {}: {}\n\t{}",
            self.status.code(),
            self.status.reason(),
            self.message,
            self.cause_string(),
        )
    }

    pub fn response_body_json(&self) -> ResponseBody {
        ResponseBody {
            error: true,
            message: self.message.clone(),
            cause: self.cause_string(),
        }
    }

    pub fn error_code(&self) -> u16 {
        self.status.code()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn class(&self) -> ErrorClass {
        self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn display_cause(&self) -> bool {
        self.display_cause
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn is_client_error(&self) -> bool {
        self.class == ErrorClass::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.class == ErrorClass::Server
    }

    /// Where the error was built: the caller of the factory or of
    /// [`HttpErrorBuilder::build`].
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Captured according to `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Empty unless the cause is both present and allowed to be shown.
    fn cause_string(&self) -> String {
        match &self.cause {
            Some(cause) if self.display_cause => cause.render_cause(),
            _ => String::new(),
        }
    }
}

impl RenderCause for HttpError {
    fn render_cause(&self) -> String {
        self.response_body_text()
    }
}

/// `404 Not Found: missing`
impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(Cause::as_error)
    }
}

/// Builder for [`HttpError`].
///
/// Obtain via [`HttpError::client`] or [`HttpError::server`]. The cause is
/// fixed when [`build`](Self::build) runs; an error never gains one later.
#[must_use]
#[derive(Debug)]
pub struct HttpErrorBuilder {
    code: u16,
    class: ErrorClass,
    message: String,
    cause: Option<Cause>,
    display_cause: Option<bool>,
}

impl HttpErrorBuilder {
    fn new(code: u16, class: ErrorClass, message: String) -> Self {
        Self { code, class, message, cause: None, display_cause: None }
    }

    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Same as [`cause`](Self::cause), but a `None` leaves the error without one.
    pub fn maybe_cause<C: Into<Cause>>(mut self, cause: Option<C>) -> Self {
        self.cause = cause.map(Into::into);
        self
    }

    /// Overrides the class default.
    pub fn display_cause(mut self, display: bool) -> Self {
        self.display_cause = Some(display);
        self
    }

    /// # Errors
    ///
    /// [`StatusError::Unknown`] for unregistered codes,
    /// [`StatusError::NotAnError`] for codes outside `4xx`/`5xx`, and
    /// [`StatusError::WrongClass`] when the digit does not match the class
    /// the builder was started with.
    #[track_caller]
    pub fn build(self) -> Result<HttpError, StatusError> {
        let (status, class) = validate(self.code, Some(self.class))?;
        let display_cause = self.display_cause.unwrap_or(class.displays_cause_by_default());
        Ok(HttpError::assemble(status, class, self.message, display_cause, self.cause))
    }
}

fn validate(code: u16, expected: Option<ErrorClass>) -> Result<(Status, ErrorClass), StatusError> {
    let status = Status::try_from(code)?;
    let class = ErrorClass::from_digit(status.class_digit()).ok_or(StatusError::NotAnError(code))?;
    match expected {
        Some(expected) if expected != class => Err(StatusError::WrongClass { code, expected }),
        _ => Ok((status, class)),
    }
}

/// Builds a client error with default cause display (shown).
///
/// `400` is the conventional default code; pass it explicitly.
///
/// # Errors
///
/// See [`HttpErrorBuilder::build`].
#[track_caller]
pub fn client_error(code: u16, message: impl Into<String>) -> Result<HttpError, StatusError> {
    HttpError::client(code, message).build()
}

/// Builds a server error with default cause display (hidden).
///
/// `500` is the conventional default code; pass it explicitly.
///
/// # Errors
///
/// See [`HttpErrorBuilder::build`].
#[track_caller]
pub fn server_error(code: u16, message: impl Into<String>) -> Result<HttpError, StatusError> {
    HttpError::server(code, message).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violations;

    #[test]
    fn client_defaults() {
        let err = client_error(400, "bad input").unwrap();
        assert_eq!(err.error_code(), 400);
        assert_eq!(err.class(), ErrorClass::Client);
        assert!(err.display_cause());
        assert!(err.cause().is_none());
    }

    #[test]
    fn server_defaults() {
        let err = server_error(500, "boom").unwrap();
        assert_eq!(err.status(), Status::InternalServerError);
        assert!(err.is_server_error());
        assert!(!err.display_cause());
    }

    #[test]
    fn base_constructor_infers_class() {
        assert_eq!(HttpError::new(409, "conflict", false).unwrap().class(), ErrorClass::Client);
        assert_eq!(HttpError::new(502, "gateway", true).unwrap().class(), ErrorClass::Server);
        assert_eq!(HttpError::new(302, "found", true).unwrap_err(), StatusError::NotAnError(302));
        assert_eq!(HttpError::new(999, "nope", true).unwrap_err(), StatusError::Unknown(999));
    }

    #[test]
    fn wrong_class_is_rejected() {
        assert_eq!(
            client_error(500, "x").unwrap_err(),
            StatusError::WrongClass { code: 500, expected: ErrorClass::Client },
        );
        assert_eq!(
            server_error(404, "x").unwrap_err(),
            StatusError::WrongClass { code: 404, expected: ErrorClass::Server },
        );
    }

    #[test]
    fn unknown_beats_wrong_class() {
        assert_eq!(client_error(420, "x").unwrap_err(), StatusError::Unknown(420));
        assert_eq!(server_error(200, "x").unwrap_err(), StatusError::NotAnError(200));
    }

    #[test]
    fn text_and_json_share_the_cause_string() {
        let err = HttpError::client(422, "invalid payload")
            .cause(Cause::other("missing field `name`"))
            .build()
            .unwrap();
        assert_eq!(
            err.response_body_text(),
            "422 Unprocessable Content: invalid payload\n\tmissing field `name`",
        );
        assert_eq!(
            err.response_body_json(),
            ResponseBody {
                error: true,
                message: "invalid payload".to_owned(),
                cause: "missing field `name`".to_owned(),
            },
        );
    }

    #[test]
    fn hidden_cause_renders_empty() {
        let err = HttpError::client(400, "bad input")
            .cause(Violations::default().push(["email"], "Invalid email"))
            .display_cause(false)
            .build()
            .unwrap();
        assert_eq!(err.response_body_text(), "400 Bad Request: bad input\n\t");
        assert!(err.source().is_some());
    }

    #[test]
    fn server_cause_can_be_opted_in() {
        let err = HttpError::server(503, "cache down")
            .cause(Cause::other("redis: connection reset"))
            .display_cause(true)
            .build()
            .unwrap();
        assert_eq!(err.response_body_json().cause, "redis: connection reset");
    }

    #[test]
    fn maybe_cause_none_has_no_cause() {
        let err = HttpError::client(404, "missing").maybe_cause(None::<HttpError>).build().unwrap();
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn builder_carries_the_message() {
        let err = HttpError::server(503, "upstream unavailable").build().unwrap();
        assert_eq!(err.message(), "upstream unavailable");
        assert_eq!(err.response_body_text(), "503 Service Unavailable: upstream unavailable\n\t");
    }

    #[test]
    fn display_is_status_and_message() {
        assert_eq!(client_error(404, "missing").unwrap().to_string(), "404 Not Found: missing");
    }

    #[test]
    fn location_points_at_the_caller() {
        let line = line!() + 1;
        let err = client_error(404, "missing").unwrap();
        assert_eq!(err.location().file(), file!());
        assert_eq!(err.location().line(), line);
    }

    #[test]
    fn json_serialises_with_fixed_keys() {
        let body = serde_json::to_string(&HttpError::bad_request("nope").response_body_json()).unwrap();
        assert_eq!(body, r#"{"error":true,"message":"nope","cause":""}"#);
    }
}
