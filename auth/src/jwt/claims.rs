use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// Deliberately minimal: the subject identifier plus the timestamps that
/// bound the token's lifetime. The token proves identity only; anything
/// else about the subject is looked up by the caller after validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a subject with an expiry of `now + ttl`.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier to embed as the `sub` claim
    /// * `ttl` - Token lifetime from now
    pub fn for_subject(subject: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("user123", Duration::hours(24));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_for_subject_negative_ttl_is_already_expired() {
        let claims = Claims::for_subject("user123", Duration::hours(-1));
        assert!(claims.exp < Utc::now().timestamp());
    }
}
