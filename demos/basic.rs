//! Minimal httpfault example: a hyper service whose errors all go through
//! one `ErrorHandler`.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/outlays/42
//!   curl -i http://localhost:3000/outlays/7
//!   curl -i -H 'accept: text/plain' 'http://localhost:3000/outlays?amount=ten'
//!   curl -i http://localhost:3000/reports

use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::Full;
use httpfault::{
    BodyFormat, BoxError, ErrorHandler, HttpError, HttpResult, Response, Violations, client_error,
};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    let errors = ErrorHandler::new().format(BodyFormat::Negotiate);
    info!("listening on http://localhost:3000");

    loop {
        let (stream, peer) = listener.accept().await?;
        let errors = errors.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let errors = errors.clone();
                async move { Ok::<_, Infallible>(serve(&errors, req).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(TokioIo::new(stream), svc).await {
                error!(peer = %peer, "connection error: {e}");
            }
        });
    }
}

async fn serve(errors: &ErrorHandler, req: hyper::Request<Incoming>) -> http::Response<Full<Bytes>> {
    let headers = req.headers().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().unwrap_or("").to_owned();

    let res = match path.as_str() {
        "/outlays" => errors.recover(&headers, async { create_outlay(&query) }).await,
        "/reports" => errors.recover(&headers, build_report()).await,
        p => match p.strip_prefix("/outlays/") {
            Some(id) => errors.recover(&headers, async { get_outlay(id) }).await,
            None => errors.handle(&reject(404, format!("no route for {p}")), &headers),
        },
    };

    res.into_inner()
}

// A bad status code here is a bug in the handler, reported as a 500.
fn reject(code: u16, message: impl Into<String>) -> HttpError {
    client_error(code, message).unwrap_or_else(|e| HttpError::internal(e.to_string()))
}

// GET /outlays/:id
fn get_outlay(id: &str) -> HttpResult<Response> {
    if id != "42" {
        return Err(reject(404, format!("outlay {id} does not exist")));
    }
    Ok(Response::json(br#"{"id":"42","amount":12.5}"#.to_vec()))
}

// POST /outlays?amount=…
fn create_outlay(query: &str) -> HttpResult<Response> {
    let amount = query.strip_prefix("amount=").unwrap_or("");
    if amount.parse::<f64>().is_err() {
        let violations = Violations::default().push(["amount"], "Expected number, received string");
        return HttpError::client(400, "invalid outlay")
            .cause(violations)
            .build()
            .map_or_else(|e| Err(HttpError::internal(e.to_string())), Err);
    }
    Ok(Response::builder().status(httpfault::Status::Created).json(b"{}".to_vec()))
}

// Foreign error: leaves as an opaque 500.
async fn build_report() -> Result<Response, std::io::Error> {
    Err(std::io::Error::other("/var/reports: no space left on device"))
}
