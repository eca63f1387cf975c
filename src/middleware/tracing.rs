//! Request tracing
//!
//! Built on tower-http's `TraceLayer`: every request gets a span carrying
//! method, path and client address, and its completion is logged at a level
//! chosen by the response status.

use axum::http::{Request, Response};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;

use super::rate_limiter::client_ip;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            client_ip = ?client_ip(request.headers()),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let duration_ms = latency.as_millis() as u64;

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), duration_ms, "Request completed with error");
        } else if status.is_client_error() {
            tracing::warn!(status = %status.as_u16(), duration_ms, "Request completed with client error");
        } else {
            tracing::info!(status = %status.as_u16(), duration_ms, "Request completed");
        }
    }
}

pub type RequestTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, DefaultOnRequest, LogResponse>;

/// Layer logging every request with its status and latency
pub fn request_tracing() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(LogResponse)
}
