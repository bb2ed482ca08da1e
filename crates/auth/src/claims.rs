use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use logbook_core::Username;

/// Tolerated clock difference when checking `iat` against the local clock.
const CLOCK_SKEW_SECS: i64 = 60;

/// Session token claims (transport-agnostic).
///
/// Serialized with JWT NumericDate timestamps: `{"username", "iat", "exp"?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The authenticated account.
    pub username: Username,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp. Absent unless a token lifetime is configured.
    #[serde(
        rename = "exp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionClaims {
    /// Claims for a token issued at `now`, optionally expiring after `ttl`.
    ///
    /// `None` when `now + ttl` falls outside the representable date range.
    pub fn new(username: Username, now: DateTime<Utc>, ttl: Option<Duration>) -> Option<Self> {
        // NumericDate has second precision; truncate so encode/decode is lossless.
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expires_at = match ttl {
            Some(ttl) => Some(issued_at.checked_add_signed(ttl)?),
            None => None,
        };
        Some(Self {
            username,
            issued_at,
            expires_at,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification and decoding
/// happen in [`crate::token`].
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if now + Duration::seconds(CLOCK_SKEW_SECS) < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if let Some(expires_at) = claims.expires_at {
        if expires_at <= claims.issued_at {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
        if now >= expires_at {
            return Err(TokenValidationError::Expired);
        }
    }
    Ok(())
}
