//! Rate limiting for the credential endpoints
//!
//! Signup and login are the only routes that run bcrypt on attacker-chosen
//! input, so they get a per-client token bucket.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap, net::SocketAddr, sync::Arc, time::Duration, time::Instant,
};
use tokio::sync::Mutex;

use crate::error::ApiError;

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_take(&mut self, refill_per_second: f64, capacity: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_per_second).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Per-client token buckets
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    refill_per_second: f64,
    capacity: f64,
}

impl RateLimiter {
    /// Allow `requests_per_second` sustained, with bursts of twice that
    pub fn new(requests_per_second: u32) -> Self {
        let refill_per_second = f64::from(requests_per_second.max(1));
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            refill_per_second,
            capacity: refill_per_second * 2.0,
        }
    }

    /// Take one token for `client`; false when the bucket is empty
    pub async fn check(&self, client: &str) -> bool {
        let mut buckets = self.buckets.lock().await;

        buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::full(self.capacity))
            .try_take(self.refill_per_second, self.capacity)
    }

    /// Drop buckets idle for longer than `max_age`
    pub async fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.buckets
            .lock()
            .await
            .retain(|_, bucket| now.duration_since(bucket.last_update) < max_age);
    }

    /// Periodically drop idle buckets until the process exits
    pub async fn run_cleanup(self, every: Duration) {
        loop {
            tokio::time::sleep(every).await;
            self.cleanup(every).await;
        }
    }
}

/// Client identifier from proxy headers
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .filter(|ip| !ip.is_empty())
}

/// Bucket key for a request: proxy headers first, then the peer address.
///
/// The proxy headers are taken at face value, so a deployment exposed without
/// a proxy that overwrites them lets clients pick their own bucket. Requests
/// with neither (no `ConnectInfo`, as in router tests) share one bucket.
fn client_key(request: &Request) -> String {
    client_ip(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting clients that exhausted their bucket
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    if !limiter.check(&client).await {
        tracing::warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");

        let mut response = ApiError::TooManyRequests.into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        return response;
    }

    next.run(request).await
}
