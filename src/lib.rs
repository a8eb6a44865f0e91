//! # httpfault
//!
//! A strict HTTP error taxonomy for Rust services.
//! Client errors explain themselves. Server errors keep quiet.
//!
//! ## The contract
//!
//! Every [`HttpError`] is either a client error (`4xx`) or a server error
//! (`5xx`), and its status code is checked against the IANA registry the
//! moment it is built. An error with code `999`, or a "server error" with
//! code `404`, cannot exist.
//!
//! Each error renders two ways:
//!
//! - **text**: `"404 Not Found: missing\n\t<cause>"`
//! - **JSON**: `{"error":true,"message":"missing","cause":"<cause>"}`
//!
//! The cause segment is empty unless the error has a cause *and* is allowed
//! to show it. Client errors show causes by default, server errors hide them.
//! How a cause renders depends on its family, see [`Cause`].
//!
//! What this crate intentionally leaves to others:
//!
//! - **Routing and transport**: bring your own server; [`Response`] converts
//!   into `http::Response<Full<Bytes>>`
//! - **Database access and schema validation**: implement [`DatabaseError`]
//!   or [`ValidationError`] on their error types
//!
//! ## Quick start
//!
//! ```rust
//! use http::HeaderMap;
//! use httpfault::{client_error, ErrorHandler, HttpError, HttpResult, Status, Violations};
//!
//! fn create_outlay(amount: &str) -> HttpResult<&'static str> {
//!     if amount.parse::<f64>().is_err() {
//!         let violations = Violations::default().push(["amount"], "Expected number");
//!         return Err(HttpError::client(400, "invalid outlay")
//!             .cause(violations)
//!             .build()
//!             .expect("400 is a client error"));
//!     }
//!     Ok("created")
//! }
//!
//! let err = create_outlay("ten").unwrap_err();
//! assert_eq!(
//!     err.response_body_text(),
//!     "400 Bad Request: invalid outlay\n\tValidation error: Expected number at \"amount\"",
//! );
//!
//! // the terminal stage: any error in, a response out
//! let res = ErrorHandler::new().handle(&err, &HeaderMap::new());
//! assert_eq!(res.status_code(), Status::BadRequest);
//!
//! # let _ = client_error(404, "missing");
//! ```

mod cause;
mod classify;
mod error;
mod handler;
mod http_error;
mod response;
mod status;
mod validation;

pub use cause::{BoxError, Cause, DatabaseError, RenderCause, ValidationError};
pub use classify::{as_http_error, is_http_error, is_orm_error, is_validation_error};
pub use error::{ErrorClass, StatusError};
pub use handler::{BodyFormat, ErrorHandler};
pub use http_error::{
    HttpError, HttpErrorBuilder, HttpResult, ResponseBody, client_error, server_error,
};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use status::Status;
pub use validation::{PathSegment, Violation, Violations};
