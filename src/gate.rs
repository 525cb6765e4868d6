//! Access gate in front of every `/api` route.
//!
//! Runs the shared-secret check first and the per-key rate check second; a
//! failure in either short-circuits with 401 or 429 and the handler never runs.

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::cache::fingerprint;
use crate::error::GatewayError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL, UNAUTHORIZED_TOTAL};
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

// bucket used when neither a key nor a peer address is known
pub const ANONYMOUS_KEY: &str = "anon";

/// Byte-for-byte secret comparison. With no secret configured every caller passes.
pub fn verify_secret(secret: Option<&str>, provided: Option<&[u8]>) -> Result<(), GatewayError> {
    match secret {
        None => Ok(()),
        Some(secret) if provided == Some(secret.as_bytes()) => Ok(()),
        Some(_) => Err(GatewayError::Unauthorized),
    }
}

pub fn client_key(provided: Option<&[u8]>, peer: Option<SocketAddr>) -> String {
    match (provided, peer) {
        (Some(value), _) => String::from_utf8_lossy(value).into_owned(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => ANONYMOUS_KEY.to_string(),
    }
}

/// Both checks, in order. The limiter is only consulted once the secret passed.
pub fn authorize(
    secret: Option<&str>,
    limiter: &RateLimiter,
    provided: Option<&[u8]>,
    peer: Option<SocketAddr>,
) -> Result<(), GatewayError> {
    verify_secret(secret, provided).inspect_err(|_| {
        UNAUTHORIZED_TOTAL.inc();
        tracing::debug!(peer = ?peer, "Rejected request with bad API key");
    })?;

    let key = client_key(provided, peer);
    if !limiter.check(&key) {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(client = %fingerprint(&key), "Rate limit exceeded");
        return Err(GatewayError::RateLimited);
    }

    Ok(())
}

pub async fn access_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    REQUEST_TOTAL.inc();

    let (mut parts, body) = request.into_parts();

    // the extractor also honours MockConnectInfo; no peer at all means "anon"
    let peer = ConnectInfo::<SocketAddr>::from_request_parts(&mut parts, &state)
        .await
        .ok()
        .map(|ConnectInfo(addr)| addr);
    let provided = parts
        .headers
        .get(state.config.api_key_header.as_str())
        .map(|value| value.as_bytes());

    authorize(state.config.api_key.as_deref(), &state.rate_limiter, provided, peer)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.7:5123".parse().unwrap())
    }

    #[test]
    fn open_mode_skips_secret_check() {
        assert!(verify_secret(None, None).is_ok());
        assert!(verify_secret(None, Some(b"anything")).is_ok());
    }

    #[test]
    fn secret_must_match_exactly() {
        assert!(verify_secret(Some("s3cret"), Some(b"s3cret")).is_ok());
        assert!(matches!(verify_secret(Some("s3cret"), None), Err(GatewayError::Unauthorized)));
        assert!(matches!(verify_secret(Some("s3cret"), Some(b"S3CRET")), Err(GatewayError::Unauthorized)));
        assert!(matches!(verify_secret(Some("s3cret"), Some(b"s3cret ")), Err(GatewayError::Unauthorized)));
    }

    #[test]
    fn key_prefers_header_then_address_then_anon() {
        assert_eq!(client_key(Some(b"abc"), peer()), "abc");
        assert_eq!(client_key(None, peer()), "10.0.0.7");
        assert_eq!(client_key(None, None), ANONYMOUS_KEY);
    }

    #[test]
    fn bad_secret_is_rejected_before_rate_check() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        let result = authorize(Some("s3cret"), &limiter, Some(b"wrong"), peer());
        assert!(matches!(result, Err(GatewayError::Unauthorized)));
        // the limiter was never touched
        assert_eq!(limiter.tracked_keys(), 0);

        assert!(authorize(Some("s3cret"), &limiter, Some(b"s3cret"), peer()).is_ok());
    }

    #[test]
    fn exhausted_budget_gives_rate_limited() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert!(authorize(None, &limiter, None, peer()).is_ok());
        assert!(authorize(None, &limiter, None, peer()).is_ok());
        assert!(matches!(authorize(None, &limiter, None, peer()), Err(GatewayError::RateLimited)));

        // a different address still has its own budget
        let other = Some("10.0.0.8:1".parse().unwrap());
        assert!(authorize(None, &limiter, None, other).is_ok());
    }
}
