//! Razorpay payment signature verification.
//!
//! Razorpay signs `"{order_id}|{payment_id}"` with the key secret; the
//! client relays the hex signature after checkout. Verification proves the
//! (order, payment) pair came from Razorpay. Amount and cart contents are
//! not covered by this signature - see the trust note on the success
//! handler.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::FulfillmentError;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for client-relayed Razorpay payment confirmations.
pub struct RazorpaySignatureVerifier {
    key_secret: SecretString,
}

impl RazorpaySignatureVerifier {
    /// Creates a verifier with the Razorpay key secret.
    pub fn new(key_secret: SecretString) -> Self {
        Self { key_secret }
    }

    /// Verifies the supplied hex signature for an (order, payment) pair.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), FulfillmentError> {
        let provided = hex::decode(signature).map_err(|_| FulfillmentError::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        let expected = mac.finalize().into_bytes();

        if expected.as_slice().ct_eq(&provided).unwrap_u8() != 1 {
            return Err(FulfillmentError::InvalidSignature);
        }
        Ok(())
    }
}
