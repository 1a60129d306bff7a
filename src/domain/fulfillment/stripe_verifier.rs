//! Stripe webhook signature verification.
//!
//! Recomputes the `Stripe-Signature` HMAC-SHA256 over the raw, byte-exact
//! payload and compares it in constant time. A timestamp window bounds
//! replay attacks.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::FulfillmentError;
use super::stripe_event::StripeEvent;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed event age (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Clock skew tolerance for events stamped in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components of the `stripe-signature` header.
///
/// Format: `t=<timestamp>,v1=<hex signature>[,v0=<legacy>]`; unknown fields
/// are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses the header string.
    pub fn parse(header: &str) -> Result<Self, FulfillmentError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                return Err(FulfillmentError::MalformedPayload(
                    "invalid signature header".to_string(),
                ));
            };
            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        FulfillmentError::MalformedPayload("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value).map_err(|_| {
                        FulfillmentError::MalformedPayload("invalid signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        Ok(SignatureHeader {
            timestamp: timestamp.ok_or_else(|| {
                FulfillmentError::MalformedPayload("missing timestamp".to_string())
            })?,
            v1_signature: v1_signature.ok_or_else(|| {
                FulfillmentError::MalformedPayload("missing v1 signature".to_string())
            })?,
        })
    }
}

/// Verifier for Stripe webhook payloads.
pub struct StripeWebhookVerifier {
    signing_secret: SecretString,
}

impl StripeWebhookVerifier {
    /// Creates a verifier with the webhook signing secret (`whsec_…`).
    pub fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    /// Verifies the signature over the raw payload bytes and parses the
    /// event.
    ///
    /// The payload must be the unmodified request body; re-serialized JSON
    /// will not match the signature.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, FulfillmentError> {
        let header = SignatureHeader::parse(signature_header)?;

        let age = chrono::Utc::now().timestamp() - header.timestamp;
        if age > MAX_EVENT_AGE_SECS {
            return Err(FulfillmentError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(FulfillmentError::InvalidTimestamp);
        }

        let expected = self.compute_signature(header.timestamp, payload);
        if expected.ct_eq(&header.v1_signature).unwrap_u8() != 1 {
            return Err(FulfillmentError::InvalidSignature);
        }

        serde_json::from_slice(payload)
            .map_err(|e| FulfillmentError::MalformedPayload(e.to_string()))
    }

    /// HMAC-SHA256 over `"{timestamp}.{payload}"`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Signs a payload the way Stripe would, for test fixtures.
#[cfg(test)]
pub fn sign_test_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{}.", timestamp).as_bytes());
    mac.update(payload);
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret_12345";

    fn verifier() -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(SecretString::new(SECRET.to_string()))
    }

    fn completed_payload() -> &'static str {
        r#"{"id":"evt_1","type":"checkout.session.completed","created":1704067200,"data":{"object":{}},"livemode":false}"#
    }

    #[test]
    fn parse_header_extracts_timestamp_and_signature() {
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", "ab".repeat(32))).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_ignores_unknown_and_legacy_fields() {
        let header_str = format!("t=1,v1={},v0={},scheme=hmac", "ab".repeat(32), "cd".repeat(32));
        assert!(SignatureHeader::parse(&header_str).is_ok());
    }

    #[test]
    fn parse_header_without_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "ab".repeat(32)));
        assert!(matches!(result, Err(FulfillmentError::MalformedPayload(_))));
    }

    #[test]
    fn parse_header_without_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(FulfillmentError::MalformedPayload(_))));
    }

    #[test]
    fn parse_header_with_bad_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=zzzz");
        assert!(matches!(result, Err(FulfillmentError::MalformedPayload(_))));
    }

    #[test]
    fn valid_signature_verifies_and_parses() {
        let payload = completed_payload();
        let now = chrono::Utc::now().timestamp();
        let header = sign_test_payload(SECRET, now, payload.as_bytes());

        let event = verifier()
            .verify_and_parse(payload.as_bytes(), &header)
            .unwrap();

        assert_eq!(event.id, "evt_1");
        assert!(event.is_checkout_completed());
    }

    #[test]
    fn forged_signature_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", now, "ab".repeat(32));

        let result = verifier().verify_and_parse(completed_payload().as_bytes(), &header);

        assert!(matches!(result, Err(FulfillmentError::InvalidSignature)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = completed_payload();
        let now = chrono::Utc::now().timestamp();
        let header = sign_test_payload("whsec_other_secret", now, payload.as_bytes());

        let result = verifier().verify_and_parse(payload.as_bytes(), &header);

        assert!(matches!(result, Err(FulfillmentError::InvalidSignature)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let header = sign_test_payload(SECRET, now, completed_payload().as_bytes());

        let result = verifier().verify_and_parse(br#"{"id":"evt_hacked"}"#, &header);

        assert!(matches!(result, Err(FulfillmentError::InvalidSignature)));
    }

    #[test]
    fn stale_event_is_rejected() {
        let payload = completed_payload();
        let old = chrono::Utc::now().timestamp() - 600;
        let header = sign_test_payload(SECRET, old, payload.as_bytes());

        let result = verifier().verify_and_parse(payload.as_bytes(), &header);

        assert!(matches!(result, Err(FulfillmentError::TimestampOutOfRange)));
    }

    #[test]
    fn future_event_beyond_skew_is_rejected() {
        let payload = completed_payload();
        let future = chrono::Utc::now().timestamp() + 120;
        let header = sign_test_payload(SECRET, future, payload.as_bytes());

        let result = verifier().verify_and_parse(payload.as_bytes(), &header);

        assert!(matches!(result, Err(FulfillmentError::InvalidTimestamp)));
    }

    #[test]
    fn slight_clock_skew_is_tolerated() {
        let payload = completed_payload();
        let near_future = chrono::Utc::now().timestamp() + 30;
        let header = sign_test_payload(SECRET, near_future, payload.as_bytes());

        assert!(verifier().verify_and_parse(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn signed_garbage_fails_parsing_not_verification() {
        let payload = b"not json at all";
        let now = chrono::Utc::now().timestamp();
        let header = sign_test_payload(SECRET, now, payload);

        let result = verifier().verify_and_parse(payload, &header);

        assert!(matches!(result, Err(FulfillmentError::MalformedPayload(_))));
    }
}
