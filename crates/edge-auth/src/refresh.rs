use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Decode the JWT `exp` claim without verifying the signature.
///
/// Only used to schedule refreshes; the backend remains the authority on
/// whether a token is valid.
///
/// # Errors
///
/// Returns `AuthError::Other` if the token is not a JWT or the `exp` claim is
/// missing or cannot be parsed.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Other("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::Other(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Other(format!("JSON parse failed: {e}")))?;
    let exp = value["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::Other("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0).ok_or_else(|| AuthError::Other("invalid exp timestamp".into()))
}

/// Whether `access_token` should be refreshed now.
///
/// JWTs are refreshed once they expire within `buffer`. Opaque tokens carry no
/// expiry, so they are always due.
#[must_use]
pub fn refresh_due(access_token: &str, buffer: Duration, now: DateTime<Utc>) -> bool {
    let Ok(expires_at) = decode_expiry(access_token) else {
        return true;
    };
    let buffer = chrono::TimeDelta::from_std(buffer).unwrap_or(chrono::TimeDelta::MAX);
    now.checked_add_signed(buffer)
        .is_none_or(|threshold| expires_at <= threshold)
}
