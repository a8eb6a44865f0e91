use std::error::Error;
use std::fmt;

use http::HeaderMap;
use httpfault::{
    Cause, DatabaseError, ErrorClass, ErrorHandler, HttpError, Status, StatusError, Violations,
    client_error, is_http_error, server_error,
};

#[derive(Debug)]
struct QueryFailed;

impl fmt::Display for QueryFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ERROR: relation \"outlays\" does not exist")
    }
}

impl Error for QueryFailed {}

impl DatabaseError for QueryFailed {
    fn response(&self) -> String {
        "query failed".to_owned()
    }
}

fn codes_with_digit(digit: u16) -> impl Iterator<Item = u16> {
    Status::ALL.iter().filter(move |s| s.class_digit() == digit).map(|s| s.code())
}

#[test]
fn every_registered_4xx_builds_a_client_error() {
    for code in codes_with_digit(4) {
        let err = client_error(code, "m").unwrap();
        assert_eq!(err.error_code(), code);
        assert_eq!(err.class(), ErrorClass::Client);
    }
}

#[test]
fn every_registered_5xx_builds_a_server_error() {
    for code in codes_with_digit(5) {
        let err = server_error(code, "m").unwrap();
        assert_eq!(err.error_code(), code);
        assert_eq!(err.class(), ErrorClass::Server);
    }
}

#[test]
fn non_error_classes_are_rejected_everywhere() {
    for digit in 1..=3 {
        for code in codes_with_digit(digit) {
            assert!(client_error(code, "m").is_err(), "{code}");
            assert!(server_error(code, "m").is_err(), "{code}");
            assert_eq!(HttpError::new(code, "m", true).unwrap_err(), StatusError::NotAnError(code));
        }
    }
}

#[test]
fn unregistered_codes_are_rejected_regardless_of_digit() {
    for code in [419, 499, 509, 599, 999] {
        assert_eq!(client_error(code, "m").unwrap_err(), StatusError::Unknown(code));
        assert_eq!(server_error(code, "m").unwrap_err(), StatusError::Unknown(code));
        assert_eq!(HttpError::new(code, "m", true).unwrap_err(), StatusError::Unknown(code));
    }
}

#[test]
fn plain_client_error_text() {
    assert_eq!(client_error(404, "missing").unwrap().response_body_text(), "404 Not Found: missing\n\t");
}

#[test]
fn opted_in_database_cause_renders_its_response() {
    let err = HttpError::server(500, "db down")
        .cause(Cause::database(QueryFailed))
        .display_cause(true)
        .build()
        .unwrap();
    assert_eq!(err.response_body_json().cause, "query failed");
}

#[test]
fn database_cause_hidden_by_default_on_server_errors() {
    let err = HttpError::server(500, "db down").cause(Cause::database(QueryFailed)).build().unwrap();
    assert_eq!(err.response_body_json().cause, "");
    assert_eq!(err.response_body_text(), "500 Internal Server Error: db down\n\t");
}

#[test]
fn validation_cause_is_formatted() {
    let violations = Violations::default().push(["items", "0"], "Required");
    let raw = violations.iter().next().map(|v| v.message.clone()).unwrap();
    let err = HttpError::client(400, "bad input").cause(violations).build().unwrap();

    let text = err.response_body_text();
    assert!(text.contains(r#"Validation error: Required at "items.0""#), "{text}");
    assert!(!text.ends_with(&format!("\t{raw}")));
}

#[test]
fn nested_http_error_renders_its_full_text() {
    let inner = client_error(404, "inner").unwrap();
    let outer = HttpError::client(400, "outer").cause(inner).build().unwrap();

    assert_eq!(outer.response_body_text(), "400 Bad Request: outer\n\t404 Not Found: inner\n\t");
    assert_eq!(outer.response_body_json().cause, "404 Not Found: inner\n\t");
    assert!(is_http_error(outer.cause().unwrap()));
}

#[test]
fn chain_is_one_level_deep_per_error() {
    let innermost = HttpError::server(503, "pool exhausted")
        .cause(Cause::other("timed out after 30s"))
        .build()
        .unwrap();
    let middle = HttpError::client(409, "conflict").cause(innermost).build().unwrap();
    let outer = HttpError::client(400, "outer").cause(middle).build().unwrap();

    // the 503 hides its own cause even when nested inside errors that show theirs
    assert_eq!(
        outer.response_body_text(),
        "400 Bad Request: outer\n\t409 Conflict: conflict\n\t503 Service Unavailable: pool exhausted\n\t",
    );
}

#[test]
fn rendering_is_idempotent() {
    let err = HttpError::client(422, "invalid")
        .cause(Violations::default().push(["total"], "Expected number, received string"))
        .build()
        .unwrap();
    assert_eq!(err.response_body_text(), err.response_body_text());
    assert_eq!(err.response_body_json(), err.response_body_json());
}

#[test]
fn source_chain_exposes_the_cause() {
    let err = HttpError::server(502, "bad gateway")
        .cause(Cause::database(QueryFailed))
        .build()
        .unwrap();
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "ERROR: relation \"outlays\" does not exist");
}

#[test]
fn terminal_handler_never_leaks_foreign_detail() {
    let res = ErrorHandler::new().handle(&QueryFailed, &HeaderMap::new());
    assert_eq!(res.status_code(), Status::InternalServerError);
    let body = std::str::from_utf8(res.body()).unwrap();
    assert!(!body.contains("outlays"), "{body}");

    let res = res.into_inner();
    assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
}
