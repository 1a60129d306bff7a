//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe + Razorpay)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// Razorpay public key id (also handed to the frontend widget)
    pub razorpay_key_id: String,

    /// Razorpay key secret (signs payment confirmations)
    pub razorpay_key_secret: String,

    /// Storefront base URL for redirect construction
    pub frontend_url: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY_KEY_ID"));
        }
        if self.razorpay_key_secret.is_empty() {
            return Err(ValidationError::MissingRequired("RAZORPAY_KEY_SECRET"));
        }
        if self.frontend_url.is_empty() {
            return Err(ValidationError::MissingRequired("FRONTEND_URL"));
        }

        // Key prefix sanity checks catch swapped or truncated secrets early
        if !self.stripe_secret_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.frontend_url.starts_with("http://") && !self.frontend_url.starts_with("https://") {
            return Err(ValidationError::InvalidFrontendUrl);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig {
            stripe_secret_key: "sk_test_abcd1234".to_string(),
            stripe_webhook_secret: "whsec_xyz789".to_string(),
            razorpay_key_id: "rzp_test_id".to_string(),
            razorpay_key_secret: "rzp_secret".to_string(),
            frontend_url: "https://shop.example.com".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_mode_is_detected() {
        assert!(valid_config().is_test_mode());
    }

    #[test]
    fn missing_fields_are_rejected() {
        assert!(PaymentConfig::default().validate().is_err());

        let mut config = valid_config();
        config.razorpay_key_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_stripe_key_prefix_is_rejected() {
        let mut config = valid_config();
        config.stripe_secret_key = "pk_test_wrong".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wrong_webhook_secret_prefix_is_rejected() {
        let mut config = valid_config();
        config.stripe_webhook_secret = "secret_wrong".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_frontend_url_is_rejected() {
        let mut config = valid_config();
        config.frontend_url = "shop.example.com".to_string();
        assert!(config.validate().is_err());
    }
}
