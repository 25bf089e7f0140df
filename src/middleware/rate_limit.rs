use std::time::{Duration, Instant};

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::ApiError;

/// Sentinel client key used when no forwarded address is available
const UNKNOWN_CLIENT: &str = "unknown";

/// Sweep threshold: once the map holds this many keys, expired windows are
/// dropped before inserting new ones.
const SWEEP_THRESHOLD: usize = 10_000;

struct WindowCounter {
    window_start: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identifier. Entry-level
/// locking in the map keeps counters consistent under concurrent requests.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    counters: DashMap<String, WindowCounter>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            counters: DashMap::new(),
        }
    }

    /// Whether the caller identified by `client_key` may proceed
    pub fn allow(&self, client_key: &str) -> bool {
        let now = Instant::now();

        if self.counters.len() > SWEEP_THRESHOLD {
            self.clear_expired();
        }

        let mut allowed = true;
        self.counters
            .entry(client_key.to_string())
            .and_modify(|counter| {
                if now.duration_since(counter.window_start) >= self.window {
                    counter.window_start = now;
                    counter.count = 1;
                    allowed = 1 <= self.max_requests;
                } else if counter.count < self.max_requests {
                    counter.count += 1;
                } else {
                    allowed = false;
                }
            })
            .or_insert_with(|| {
                allowed = 1 <= self.max_requests;
                WindowCounter {
                    window_start: now,
                    count: 1,
                }
            });
        allowed
    }

    /// Remove counters whose window has elapsed
    pub fn clear_expired(&self) {
        let now = Instant::now();
        self.counters
            .retain(|_, counter| now.duration_since(counter.window_start) < self.window);
    }
}

/// Client identifier from the first forwarded-IP hop. Spoofable unless a
/// trusted reverse proxy overwrites the header; requests without one share
/// the sentinel key.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

static LIMITER: Lazy<RateLimiter> = Lazy::new(|| {
    let api = &crate::config::config().api;
    RateLimiter::new(
        api.rate_limit_requests,
        Duration::from_secs(api.rate_limit_window_secs),
    )
});

/// Rate-limit layer applied to the API router. A no-op when disabled in config.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    if crate::config::config().api.enable_rate_limiting {
        let key = client_key(request.headers());
        if !LIMITER.allow(&key) {
            tracing::warn!("rate limit exceeded for client {}", key);
            return Err(ApiError::too_many_requests("Too many requests"));
        }
    }
    Ok(next.run(request).await)
}
