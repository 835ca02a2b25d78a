//! Per-client rate limiting for the unauthenticated auth endpoints.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
};

use crate::app::AppState;
use crate::error::ApiError;

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// One governor bucket per `(route, client ip)` pair.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    per_minute: u32,
    trusted_proxies: Vec<IpAddr>,
}

impl RateLimiterState {
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(FALLBACK_PER_MINUTE));
        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            per_minute,
            trusted_proxies: Vec::new(),
        }
    }

    /// Peers whose `X-Forwarded-For` header is believed.
    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = proxies;
        self
    }

    /// `Err(retry_after_secs)` once the client has used up its quota.
    pub fn check(&self, route: &str, client: &str) -> Result<(), u64> {
        let key = format!("{route}:{client}");
        self.limiter.check_key(&key).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }

    /// Drops buckets that have refilled completely.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("per_minute", &self.per_minute)
            .field("trusted_proxies", &self.trusted_proxies)
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

/// The peer address, or the first `X-Forwarded-For` entry when the peer is
/// a trusted proxy.
fn client_ip(req: &Request<Body>, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
    else {
        return "unknown".to_string();
    };

    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        .unwrap_or(peer)
        .to_string()
}

pub async fn auth_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req, &state.rate_limiter.trusted_proxies);
    if let Err(retry_after) = state.rate_limiter.check(req.uri().path(), &ip) {
        tracing::warn!(client_ip = %ip, path = %req.uri().path(), "Auth rate limit exceeded");
        return ApiError::RateLimited(retry_after).into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion_per_client() {
        let state = RateLimiterState::new(2);

        assert!(state.check("/api/login", "10.0.0.1").is_ok());
        assert!(state.check("/api/login", "10.0.0.1").is_ok());
        let retry = state.check("/api/login", "10.0.0.1").unwrap_err();
        assert!(retry >= 1);
    }

    #[test]
    fn test_clients_and_routes_independent() {
        let state = RateLimiterState::new(1);

        assert!(state.check("/api/login", "10.0.0.1").is_ok());
        assert!(state.check("/api/login", "10.0.0.2").is_ok());
        assert!(state.check("/api/register", "10.0.0.1").is_ok());
        assert!(state.check("/api/login", "10.0.0.1").is_err());
    }

    #[test]
    fn test_zero_limit_falls_back() {
        let state = RateLimiterState::new(0);
        assert!(state.check("/api/login", "10.0.0.1").is_ok());
    }

    const PROXY: [u8; 4] = [10, 0, 0, 1];

    fn from_peer(peer: [u8; 4], forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 4000))));
        req
    }

    #[test]
    fn test_client_ip_ignores_forwarded_for_from_untrusted_peer() {
        let req = from_peer([192, 168, 1, 5], Some("203.0.113.9"));
        assert_eq!(client_ip(&req, &[]), "192.168.1.5");
        assert_eq!(client_ip(&req, &[IpAddr::from(PROXY)]), "192.168.1.5");
    }

    #[test]
    fn test_client_ip_uses_forwarded_for_behind_trusted_proxy() {
        let trusted = [IpAddr::from(PROXY)];

        let req = from_peer(PROXY, Some("203.0.113.9, 10.0.0.1"));
        assert_eq!(client_ip(&req, &trusted), "203.0.113.9");

        let garbage = from_peer(PROXY, Some("not-an-ip"));
        assert_eq!(client_ip(&garbage, &trusted), "10.0.0.1");

        let missing = from_peer(PROXY, None);
        assert_eq!(client_ip(&missing, &trusted), "10.0.0.1");
    }

    #[test]
    fn test_client_ip_without_peer() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req, &[]), "unknown");
    }

    #[test]
    fn test_spoofed_header_shares_bucket_with_peer() {
        let state = RateLimiterState::new(1);
        let first = client_ip(&from_peer([192, 168, 1, 5], Some("1.1.1.1")), &[]);
        let second = client_ip(&from_peer([192, 168, 1, 5], Some("2.2.2.2")), &[]);

        assert!(state.check("/api/login", &first).is_ok());
        assert!(state.check("/api/login", &second).is_err());
    }
}
