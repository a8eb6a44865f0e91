//! The terminal error handler.
//!
//! Every error a request produces ends here and leaves as a well-formed
//! response:
//!
//! ```text
//! handler returns Err(e)
//!        ↓
//! e is an HttpError?  ── yes ──→ status = e.error_code(), body = e rendered
//!        │ no
//!        ↓
//! HttpError::internal(fallback) with e as a hidden cause ──→ 500
//! ```
//!
//! Every error the handler renders is logged here. The only other log lines
//! are the `warn!`s in [`Response`] building, for a dropped invalid header
//! or a body that failed to serialise. The error values themselves never log.

use std::error::Error as StdError;
use std::future::Future;

use http::HeaderMap;
use http::header::ACCEPT;
use tracing::{debug, error, warn};

use crate::cause::{BoxError, Cause};
use crate::classify::as_http_error;
use crate::error::ErrorClass;
use crate::http_error::HttpError;
use crate::response::{IntoResponse, Response};

const DEFAULT_FALLBACK: &str = "Internal Server Error";

/// Which body an error response carries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BodyFormat {
    /// `{"error":true,"message":…,"cause":…}`
    #[default]
    Json,
    /// `"<code> <reason>: <message>\n\t<cause>"`
    Text,
    /// Text when the `Accept` header weighs `text/plain` above
    /// `application/json` (`q` values and `*` ranges count), JSON otherwise.
    Negotiate,
}

impl BodyFormat {
    fn resolve(self, headers: &HeaderMap) -> Self {
        match self {
            Self::Negotiate => negotiate(headers),
            fixed => fixed,
        }
    }
}

fn negotiate(headers: &HeaderMap) -> BodyFormat {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return BodyFormat::Json;
    };
    let ranges: Vec<MediaRange<'_>> = accept.split(',').filter_map(MediaRange::parse).collect();
    let text = preference(&ranges, "text", "plain");
    let json = preference(&ranges, "application", "json");
    match (text, json) {
        (Some(text), Some(json)) if text.weight > json.weight => BodyFormat::Text,
        // equal weights: the explicitly listed type that comes first wins
        (Some(text), Some(json))
            if text.weight == json.weight && text.exact && (!json.exact || text.index < json.index) =>
        {
            BodyFormat::Text
        }
        (Some(_), None) => BodyFormat::Text,
        _ => BodyFormat::Json,
    }
}

/// One entry of an `Accept` header, e.g. `text/*;q=0.5`.
struct MediaRange<'a> {
    kind: &'a str,
    subtype: &'a str,
    weight: f32,
}

impl<'a> MediaRange<'a> {
    fn parse(entry: &'a str) -> Option<Self> {
        let mut params = entry.split(';');
        let (kind, subtype) = params.next()?.trim().split_once('/')?;
        let mut weight = 1.0;
        for param in params {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    weight = value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q))?;
                }
            }
        }
        Some(Self { kind: kind.trim(), subtype: subtype.trim(), weight })
    }

    /// 2 for an exact match, 1 for `kind/*`, 0 for `*/*`.
    fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        match (self.kind, self.subtype) {
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => Some(2),
            (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
            ("*", "*") => Some(0),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
struct Preference {
    weight: f32,
    index: usize,
    exact: bool,
}

/// Weight the client gives `kind/subtype`, taken from the most specific
/// matching range. `None` when nothing matches or the match has `q=0`.
fn preference(ranges: &[MediaRange<'_>], kind: &str, subtype: &str) -> Option<Preference> {
    let (index, specificity, range) = ranges
        .iter()
        .enumerate()
        .filter_map(|(index, range)| Some((index, range.specificity(kind, subtype)?, range)))
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))?;
    (range.weight > 0.0).then_some(Preference { weight: range.weight, index, exact: specificity == 2 })
}

/// Renders any error as a [`Response`].
///
/// ```rust
/// use http::HeaderMap;
/// use httpfault::{client_error, BodyFormat, ErrorHandler, Status};
///
/// let handler = ErrorHandler::new().format(BodyFormat::Text);
///
/// let res = handler.handle(&client_error(404, "no such outlay").unwrap(), &HeaderMap::new());
/// assert_eq!(res.status_code(), Status::NotFound);
/// assert_eq!(res.body(), b"404 Not Found: no such outlay\n\t");
///
/// let io = std::io::Error::other("disk full");
/// let res = handler.handle(&io, &HeaderMap::new());
/// assert_eq!(res.status_code(), Status::InternalServerError);
/// ```
#[derive(Clone, Debug)]
pub struct ErrorHandler {
    format: BodyFormat,
    fallback_message: String,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self { format: BodyFormat::default(), fallback_message: DEFAULT_FALLBACK.to_owned() }
    }

    /// Body format for every response this handler produces.
    pub fn format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }

    /// Message of the `500` that foreign errors are coerced to.
    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Renders `err`. `headers` are the request headers, used only by
    /// [`BodyFormat::Negotiate`].
    pub fn handle(&self, err: &(dyn StdError + 'static), headers: &HeaderMap) -> Response {
        match as_http_error(err) {
            Some(http) => {
                log(http);
                self.render(http, headers)
            }
            None => {
                warn!(error = %err, "unclassified error reached the error handler");
                self.render(&self.coerce(err), headers)
            }
        }
    }

    /// Awaits a fallible handler and turns either outcome into a response.
    ///
    /// `E` may be anything convertible into a boxed error: an `HttpError`
    /// keeps its status, everything else becomes a `500`.
    pub async fn recover<F, T, E>(&self, headers: &HeaderMap, fut: F) -> Response
    where
        F: Future<Output = Result<T, E>>,
        T: IntoResponse,
        E: Into<BoxError>,
    {
        match fut.await {
            Ok(ok) => ok.into_response(),
            Err(err) => {
                let err: BoxError = err.into();
                self.handle(&*err, headers)
            }
        }
    }

    fn coerce(&self, err: &(dyn StdError + 'static)) -> HttpError {
        HttpError::internal_caused_by(self.fallback_message.clone(), Cause::other(err.to_string()))
    }

    fn render(&self, err: &HttpError, headers: &HeaderMap) -> Response {
        match self.format.resolve(headers) {
            BodyFormat::Text => Response::error_text(err),
            BodyFormat::Json | BodyFormat::Negotiate => Response::error_json(err),
        }
    }
}

impl Default for ErrorHandler {
    fn default() -> Self { Self::new() }
}

fn log(err: &HttpError) {
    let status = err.error_code();
    match err.class() {
        ErrorClass::Server => error!(status, error = %err, location = %err.location(), "request failed"),
        ErrorClass::Client => debug!(status, error = %err, "request rejected"),
    }
}
