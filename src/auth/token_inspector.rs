use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::utils::current_time_secs;

// JWT segments are base64url, usually unpadded; accept padding as well.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// What to conclude when a token's expiry cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InspectionPolicy {
    /// Undecodable tokens and tokens without `exp` count as not expired.
    #[default]
    FailOpen,
    /// Undecodable tokens and tokens without `exp` count as expired.
    FailClosed,
}

pub const DEFAULT_INSPECTION_POLICY: InspectionPolicy = InspectionPolicy::FailOpen;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    Valid { exp: f64 },
    Expired { exp: f64 },
    /// Well formed, but the payload has no numeric `exp`.
    NoExpiry,
    Undecodable(String),
}

/// Decodes the middle segment of a three part token into a JSON object.
pub fn decode_token_payload(token: &str) -> Result<serde_json::Map<String, Value>, String> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(format!("expected 3 segments, found {}", segments.len()));
    }
    let payload_bytes = BASE64_URL.decode(segments[1]).map_err(|err| err.to_string())?;
    match serde_json::from_slice::<Value>(&payload_bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("payload is not a json object".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

/// Classifies a token against `now` (seconds since epoch). No signature check.
#[allow(clippy::cast_precision_loss)]
pub fn inspect_token_at(token: &str, now: i64) -> TokenStatus {
    match decode_token_payload(token) {
        Ok(payload) => match payload.get("exp").and_then(Value::as_f64) {
            Some(exp) if exp < now as f64 => TokenStatus::Expired { exp },
            Some(exp) => TokenStatus::Valid { exp },
            None => TokenStatus::NoExpiry,
        },
        Err(reason) => TokenStatus::Undecodable(reason),
    }
}

pub fn inspect_token(token: &str) -> TokenStatus {
    inspect_token_at(token, current_time_secs())
}

pub fn is_expired_at(token: &str, now: i64, policy: InspectionPolicy) -> bool {
    is_expired_with_fallback(token, now, policy, None)
}

/// The token's own `exp` wins. Without one, `fallback_expiry` (seconds since
/// epoch, recorded at login) decides, and only then the policy.
pub fn is_expired_with_fallback(token: &str, now: i64, policy: InspectionPolicy, fallback_expiry: Option<i64>) -> bool {
    match inspect_token_at(token, now) {
        TokenStatus::Expired { .. } => true,
        TokenStatus::Valid { .. } => false,
        status => {
            if let TokenStatus::Undecodable(reason) = &status {
                debug!("Token could not be inspected: {reason}");
            }
            match fallback_expiry {
                Some(expires_at) => expires_at < now,
                None => policy == InspectionPolicy::FailClosed,
            }
        }
    }
}

/// Expiry check under the default fail-open policy.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, current_time_secs(), DEFAULT_INSPECTION_POLICY)
}

/// The `exp` claim in whole seconds, if the token carries one.
#[allow(clippy::cast_possible_truncation)]
pub fn token_expiry(token: &str) -> Option<i64> {
    decode_token_payload(token)
        .ok()
        .and_then(|payload| payload.get("exp").and_then(Value::as_f64))
        .map(|exp| exp as i64)
}


#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use super::*;
    use super::test_tokens::{make_token, token_expiring_in};

    #[test]
    fn test_future_exp_is_not_expired() {
        assert!(!is_expired(&token_expiring_in(3600)));
        assert!(matches!(inspect_token(&token_expiring_in(3600)), TokenStatus::Valid { .. }));
    }

    #[test]
    fn test_past_exp_is_expired() {
        assert!(is_expired(&token_expiring_in(-10)));
    }

    #[test]
    fn test_exp_equal_now_is_not_expired() {
        let token = make_token(r#"{"exp":1700000000}"#);
        assert!(!is_expired_at(&token, 1_700_000_000, InspectionPolicy::FailOpen));
        assert!(is_expired_at(&token, 1_700_000_001, InspectionPolicy::FailOpen));
    }

    #[test]
    fn test_fractional_exp() {
        let token = make_token(r#"{"exp":1700000000.5}"#);
        assert!(!is_expired_at(&token, 1_700_000_000, InspectionPolicy::FailOpen));
        assert_eq!(token_expiry(&token), Some(1_700_000_000));
    }

    #[test]
    fn test_malformed_tokens_fail_open() {
        // Unprovable expiry is deliberately treated as still valid.
        let mut tokens: Vec<String> = ["", "a.b.c", "abc", "a.b", "a.b.c.d", "x.!!!.y"]
            .iter()
            .map(ToString::to_string)
            .collect();
        tokens.push(make_token("[1,2]"));
        tokens.push(make_token("not json"));
        for token in &tokens {
            assert!(!is_expired(token), "{token}");
        }
        assert!(matches!(inspect_token("a.b"), TokenStatus::Undecodable(_)));
    }

    #[test]
    fn test_missing_or_non_numeric_exp_fails_open() {
        assert!(!is_expired(&make_token(r#"{"sub":"ana"}"#)));
        assert!(!is_expired(&make_token(r#"{"exp":"tomorrow"}"#)));
        assert_eq!(inspect_token(&make_token(r#"{"sub":"ana"}"#)), TokenStatus::NoExpiry);
    }

    #[test]
    fn test_fail_closed_policy() {
        let now = current_time_secs();
        assert!(is_expired_at("a.b.c", now, InspectionPolicy::FailClosed));
        assert!(is_expired_at(&make_token(r#"{"sub":"ana"}"#), now, InspectionPolicy::FailClosed));
        assert!(!is_expired_at(&token_expiring_in(60), now, InspectionPolicy::FailClosed));
    }

    #[test]
    fn test_fallback_expiry() {
        let now = 1_700_000_000;
        let opaque = "opaque-token";
        let no_exp = make_token(r#"{"sub":"ana"}"#);
        for token in [opaque, no_exp.as_str()] {
            assert!(is_expired_with_fallback(token, now, InspectionPolicy::FailOpen, Some(now - 1)));
            assert!(!is_expired_with_fallback(token, now, InspectionPolicy::FailOpen, Some(now + 60)));
            assert!(!is_expired_with_fallback(token, now, InspectionPolicy::FailClosed, Some(now + 60)));
        }
        // A readable exp is not overridden by the recorded expiry.
        let with_exp = make_token(r#"{"exp":1700000100}"#);
        assert!(!is_expired_with_fallback(&with_exp, now, InspectionPolicy::FailOpen, Some(now - 1)));
    }

    #[test]
    fn test_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":10}"#);
        let token = format!("h.{payload}.s");
        assert!(payload.ends_with('='));
        assert!(is_expired(&token));
    }
}
