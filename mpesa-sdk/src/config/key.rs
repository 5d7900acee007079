//! Names of every settable configuration field.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// A configuration field of [`ClientConfig`](super::ClientConfig).
///
/// Parsed from the snake_case field name used by
/// [`ClientConfig::configure`](super::ClientConfig::configure) and by the
/// TOML configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ConsumerKey,
    ConsumerSecret,
    TransactionType,
    Shortcode,
    StoreNumber,
    PassKey,
    InitiatorName,
    InitiatorPassword,
    SecurityCredential,
    CallbackUrl,
    ConfirmationUrl,
    ValidationUrl,
    ResultUrl,
    TimeoutUrl,
    B2cShortcode,
    B2bShortcode,
    OfficialContact,
    LogoLink,
    Environment,
    SandboxEndpoint,
    LiveEndpoint,
    CertificateDir,
}

impl ConfigKey {
    /// Every key, in declaration order.
    pub const ALL: [ConfigKey; 22] = [
        ConfigKey::ConsumerKey,
        ConfigKey::ConsumerSecret,
        ConfigKey::TransactionType,
        ConfigKey::Shortcode,
        ConfigKey::StoreNumber,
        ConfigKey::PassKey,
        ConfigKey::InitiatorName,
        ConfigKey::InitiatorPassword,
        ConfigKey::SecurityCredential,
        ConfigKey::CallbackUrl,
        ConfigKey::ConfirmationUrl,
        ConfigKey::ValidationUrl,
        ConfigKey::ResultUrl,
        ConfigKey::TimeoutUrl,
        ConfigKey::B2cShortcode,
        ConfigKey::B2bShortcode,
        ConfigKey::OfficialContact,
        ConfigKey::LogoLink,
        ConfigKey::Environment,
        ConfigKey::SandboxEndpoint,
        ConfigKey::LiveEndpoint,
        ConfigKey::CertificateDir,
    ];

    /// The field name accepted by `configure`.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::ConsumerKey => "consumer_key",
            ConfigKey::ConsumerSecret => "consumer_secret",
            ConfigKey::TransactionType => "transaction_type",
            ConfigKey::Shortcode => "shortcode",
            ConfigKey::StoreNumber => "store_number",
            ConfigKey::PassKey => "pass_key",
            ConfigKey::InitiatorName => "initiator_name",
            ConfigKey::InitiatorPassword => "initiator_password",
            ConfigKey::SecurityCredential => "security_credential",
            ConfigKey::CallbackUrl => "callback_url",
            ConfigKey::ConfirmationUrl => "confirmation_url",
            ConfigKey::ValidationUrl => "validation_url",
            ConfigKey::ResultUrl => "result_url",
            ConfigKey::TimeoutUrl => "timeout_url",
            ConfigKey::B2cShortcode => "b2c_shortcode",
            ConfigKey::B2bShortcode => "b2b_shortcode",
            ConfigKey::OfficialContact => "official_contact",
            ConfigKey::LogoLink => "logo_link",
            ConfigKey::Environment => "env",
            ConfigKey::SandboxEndpoint => "sandbox_endpoint",
            ConfigKey::LiveEndpoint => "live_endpoint",
            ConfigKey::CertificateDir => "certificate_dir",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `environment` is accepted as a long-form alias of `env`.
        if s == "environment" {
            return Ok(ConfigKey::Environment);
        }
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_owned()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_parses_from_its_name() {
        for key in ConfigKey::ALL {
            assert_eq!(key.as_str().parse::<ConfigKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_environment_alias() {
        assert_eq!(
            "environment".parse::<ConfigKey>().unwrap(),
            ConfigKey::Environment
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = "consumerKey".parse::<ConfigKey>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "consumerKey"));
        assert!("".parse::<ConfigKey>().is_err());
        assert!("msg".parse::<ConfigKey>().is_err());
    }
}
