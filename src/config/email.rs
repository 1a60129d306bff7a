//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "orders@pixelkeys.shop".to_string()
}

fn default_from_name() -> String {
    "Pixelkeys".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = EmailConfig::default();
        assert_eq!(config.from_email, "orders@pixelkeys.shop");
        assert_eq!(config.from_name, "Pixelkeys");
    }

    #[test]
    fn from_header_formats_name_and_address() {
        let config = EmailConfig {
            from_email: "support@example.com".to_string(),
            from_name: "Support".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Support <support@example.com>");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(EmailConfig::default().validate().is_err());
    }

    #[test]
    fn wrong_api_key_prefix_is_rejected() {
        let config = EmailConfig {
            resend_api_key: "sk_wrong".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        let config = EmailConfig {
            resend_api_key: "re_abcd1234".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
