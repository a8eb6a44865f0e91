//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] is what every error ends up as. It converts into a plain
//! `http::Response<Full<Bytes>>`, so it can be returned from any hyper-based
//! service without this crate knowing about the server.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http_body_util::Full;
use tracing::warn;

use crate::http_error::HttpError;
use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// The two body encodings an error is rendered in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Json, // application/json
    Text, // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use httpfault::{Response, Status};
///
/// Response::json(br#"{"id":1}"#.to_vec());
/// Response::text("hello");
/// Response::status(Status::NoContent);
///
/// Response::builder()
///     .status(Status::Created)
///     .header("location", "/users/42")
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    body: Bytes,
    headers: HeaderMap,
    status: Status,
}

impl Response {
    /// `200 OK` — `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Bytes::new(), headers: HeaderMap::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: Status::Ok }
    }

    /// The error's JSON body, sent with the error's status.
    pub fn error_json(err: &HttpError) -> Self {
        match serde_json::to_vec(&err.response_body_json()) {
            Ok(bytes) => Self::builder().status(err.status()).json(bytes),
            Err(e) => {
                warn!(error = %e, "failed to serialise error body");
                Self::status(err.status())
            }
        }
    }

    /// The error's plain-text body, sent with the error's status.
    pub fn error_text(err: &HttpError) -> Self {
        Self::builder().status(err.status()).text(err.response_body_text())
    }

    pub fn status_code(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into the type hyper services return.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status.into();
        *res.headers_mut() = self.headers;
        res
    }
}

impl From<Response> for http::Response<Full<Bytes>> {
    fn from(res: Response) -> Self {
        res.into_inner()
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method.
#[must_use]
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    /// Adds a header. Names or values that are not valid HTTP are dropped
    /// with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => warn!(header = name, "dropping invalid response header"),
        }
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(ContentType::Json, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        let body: String = body.into();
        self.finish(ContentType::Text, Bytes::from(body))
    }

    fn finish(mut self, content_type: ContentType, body: Bytes) -> Response {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        Response { body, headers: self.headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Request handlers return `HttpResult<T>`; the error side renders as JSON
/// with the error's status:
///
/// ```rust
/// use httpfault::{client_error, HttpResult, IntoResponse, Response, Status};
///
/// fn get_user(id: &str) -> HttpResult<Response> {
///     if id != "42" {
///         return Err(client_error(404, format!("no user {id}")).unwrap());
///     }
///     Ok(Response::json(br#"{"id":"42"}"#.to_vec()))
/// }
///
/// assert_eq!(get_user("7").into_response().status_code(), Status::NotFound);
/// ```
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly: `return Status::NoContent`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response { Response::error_json(&self) }
}

impl<T: IntoResponse> IntoResponse for Result<T, HttpError> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_error::client_error;

    fn content_type(res: &Response) -> &str {
        res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or("")
    }

    #[test]
    fn error_json_uses_status_and_body() {
        let res = client_error(404, "missing").unwrap().into_response();
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(content_type(&res), "application/json");
        assert_eq!(res.body(), br#"{"error":true,"message":"missing","cause":""}"#);
    }

    #[test]
    fn error_text_uses_plain_body() {
        let res = Response::error_text(&client_error(409, "taken").unwrap());
        assert_eq!(res.status_code(), Status::Conflict);
        assert_eq!(content_type(&res), "text/plain; charset=utf-8");
        assert_eq!(res.body(), b"409 Conflict: taken\n\t");
    }

    #[test]
    fn ok_result_passes_through() {
        let ok: Result<&'static str, HttpError> = Ok("fine");
        let res = ok.into_response();
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"fine");
    }

    #[test]
    fn invalid_header_is_dropped() {
        let res = Response::builder().header("bad header", "x").header("x-id", "7").text("");
        assert!(res.headers().get("x-id").is_some());
        assert_eq!(res.headers().len(), 2);
    }

    #[test]
    fn into_inner_keeps_everything() {
        let res = Response::builder()
            .status(Status::Created)
            .header("location", "/users/42")
            .json(b"{}".to_vec())
            .into_inner();
        assert_eq!(res.status(), http::StatusCode::CREATED);
        assert_eq!(res.headers()["location"], "/users/42");
    }
}
