use std::time::Duration;

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

const VERSION: &str = "v0";

/// Verifies a Slack request signature using constant-time comparison.
///
/// Slack sends `X-Slack-Signature: v0=<hex>` where `<hex>` is the
/// HMAC-SHA256, keyed with the signing secret, of `v0:{timestamp}:{body}`.
/// `timestamp` comes from `X-Slack-Request-Timestamp` and must be within
/// `max_age` of `now_unix` in either direction.
///
/// Must be called on the raw body, before any parsing.
pub fn verify(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
    now_unix: i64,
    max_age: Duration,
) -> Result<(), SignatureError> {
    let signature =
        header_str(headers, SIGNATURE_HEADER).ok_or(SignatureError::MissingSignature)?;
    let expected = signature
        .strip_prefix("v0=")
        .and_then(|h| hex::decode(h).ok())
        .ok_or(SignatureError::MalformedSignature)?;

    let timestamp =
        header_str(headers, TIMESTAMP_HEADER).ok_or(SignatureError::MissingTimestamp)?;
    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::MalformedTimestamp)?;

    let skew_secs = now_unix.saturating_sub(sent_at).saturating_abs();
    let max_age_secs = max_age.as_secs();
    if skew_secs as u64 > max_age_secs {
        return Err(SignatureError::Stale {
            skew_secs,
            max_age_secs,
        });
    }

    let mac = keyed_mac(secret, timestamp, body).ok_or(SignatureError::Mismatch)?;
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the `v0=<hex>` header value Slack would send for `body`.
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = keyed_mac(secret, timestamp, body)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("{VERSION}={digest}")
}

fn keyed_mac(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(mac)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
