use super::AppState;
use crate::config::RateLimitConfig;
use crate::error::{AgrocastError, Result};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Client tables larger than this get expired windows pruned
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    /// Whole seconds until the window resets
    pub retry_after_secs: u64,
}

impl Decision {
    fn apply_headers(&self, headers: &mut HeaderMap) {
        let pairs = [
            ("x-ratelimit-limit", self.limit.to_string()),
            ("x-ratelimit-remaining", self.remaining.to_string()),
            ("x-ratelimit-reset", self.reset_at.timestamp().to_string()),
        ];
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
    }
}

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    enabled: bool,
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            limit: config.requests,
            window: Duration::seconds(config.window_secs as i64),
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: &str, now: DateTime<Utc>) -> Result<Decision> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| AgrocastError::LockPoisoned)?;

        if clients.len() > PRUNE_THRESHOLD {
            clients.retain(|_, w| w.reset_at > now);
        }

        let window = clients.entry(client.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });
        if now > window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window;
        }

        let allowed = window.count < self.limit;
        if allowed {
            window.count += 1;
        }

        let retry_after_secs = (window.reset_at - now).num_seconds().max(0) as u64;
        Ok(Decision {
            allowed,
            limit: self.limit,
            remaining: self.limit - window.count,
            reset_at: window.reset_at,
            retry_after_secs,
        })
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limiter = &state.rate_limiter;
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let client = client_key(&request);
    let decision = match limiter.check(&client, Utc::now()) {
        Ok(d) => d,
        Err(e) => return e.into_response(),
    };

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        AgrocastError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        }
        .into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            requests,
            window_secs,
        })
    }

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let limiter = limiter(3, 60);
        let now = Utc::now();

        for expected_remaining in [2, 1, 0] {
            let d = limiter.check("10.0.0.1", now).unwrap();
            assert!(d.allowed);
            assert_eq!(d.remaining, expected_remaining);
        }

        let blocked = limiter.check("10.0.0.1", now + Duration::seconds(5)).unwrap();
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
        assert_eq!(blocked.retry_after_secs, 55);
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = limiter(1, 60);
        let now = Utc::now();
        assert!(limiter.check("a", now).unwrap().allowed);
        assert!(!limiter.check("a", now).unwrap().allowed);
        assert!(limiter.check("b", now).unwrap().allowed);
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = limiter(1, 60);
        let now = Utc::now();
        assert!(limiter.check("a", now).unwrap().allowed);
        assert!(!limiter.check("a", now + Duration::seconds(60)).unwrap().allowed);

        let later = limiter.check("a", now + Duration::seconds(61)).unwrap();
        assert!(later.allowed);
        assert_eq!(later.reset_at, now + Duration::seconds(121));
    }

    #[test]
    fn headers_are_written() {
        let limiter = limiter(10, 60);
        let now = Utc::now();
        let decision = limiter.check("a", now).unwrap();

        let mut headers = HeaderMap::new();
        decision.apply_headers(&mut headers);
        assert_eq!(headers["x-ratelimit-limit"], "10");
        assert_eq!(headers["x-ratelimit-remaining"], "9");
        assert_eq!(
            headers["x-ratelimit-reset"],
            (now + Duration::seconds(60)).timestamp().to_string().as_str()
        );
    }
}
