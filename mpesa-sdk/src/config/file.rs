//! TOML file configuration.
//!
//! Maps a configuration file onto [`ClientConfig`]. Every value goes through
//! [`ClientConfig::set`], so file and programmatic configuration share the
//! same validation.
//!
//! ```toml
//! env = "sandbox"
//! transaction_type = "paybill"
//! certificate_dir = "./certs"
//!
//! [credentials]
//! consumer_key = "..."
//! consumer_secret = "..."
//! pass_key = "..."
//!
//! [merchant]
//! shortcode = "174379"
//!
//! [urls]
//! callback_url = "https://example.com/mpesa/callback"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ClientConfig, ConfigError, ConfigKey};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, alias = "environment")]
    pub env: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub certificate_dir: Option<PathBuf>,
    #[serde(default)]
    pub credentials: CredentialsSection,
    #[serde(default)]
    pub merchant: MerchantSection,
    #[serde(default)]
    pub urls: UrlsSection,
    #[serde(default)]
    pub endpoints: EndpointsSection,
}

/// API and initiator credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsSection {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub pass_key: Option<String>,
    pub initiator_name: Option<String>,
    pub initiator_password: Option<String>,
    pub security_credential: Option<String>,
}

/// Merchant identifiers and contact details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerchantSection {
    pub shortcode: Option<String>,
    pub store_number: Option<String>,
    pub b2c_shortcode: Option<String>,
    pub b2b_shortcode: Option<String>,
    pub official_contact: Option<String>,
    pub logo_link: Option<String>,
}

/// Callback, result and timeout URLs handed to the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlsSection {
    pub callback_url: Option<String>,
    pub confirmation_url: Option<String>,
    pub validation_url: Option<String>,
    pub result_url: Option<String>,
    pub timeout_url: Option<String>,
}

/// Overrides for the gateway base URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsSection {
    pub sandbox: Option<String>,
    pub live: Option<String>,
}

impl FileConfig {
    /// Apply every value present in the file on top of `config`.
    pub fn apply_to(self, config: &mut ClientConfig) -> Result<(), ConfigError> {
        let certificate_dir = self
            .certificate_dir
            .map(|dir| dir.to_string_lossy().into_owned());

        let entries = [
            (ConfigKey::Environment, self.env),
            (ConfigKey::TransactionType, self.transaction_type),
            (ConfigKey::CertificateDir, certificate_dir),
            (ConfigKey::ConsumerKey, self.credentials.consumer_key),
            (ConfigKey::ConsumerSecret, self.credentials.consumer_secret),
            (ConfigKey::PassKey, self.credentials.pass_key),
            (ConfigKey::InitiatorName, self.credentials.initiator_name),
            (ConfigKey::InitiatorPassword, self.credentials.initiator_password),
            (ConfigKey::SecurityCredential, self.credentials.security_credential),
            (ConfigKey::Shortcode, self.merchant.shortcode),
            (ConfigKey::StoreNumber, self.merchant.store_number),
            (ConfigKey::B2cShortcode, self.merchant.b2c_shortcode),
            (ConfigKey::B2bShortcode, self.merchant.b2b_shortcode),
            (ConfigKey::OfficialContact, self.merchant.official_contact),
            (ConfigKey::LogoLink, self.merchant.logo_link),
            (ConfigKey::CallbackUrl, self.urls.callback_url),
            (ConfigKey::ConfirmationUrl, self.urls.confirmation_url),
            (ConfigKey::ValidationUrl, self.urls.validation_url),
            (ConfigKey::ResultUrl, self.urls.result_url),
            (ConfigKey::TimeoutUrl, self.urls.timeout_url),
            (ConfigKey::SandboxEndpoint, self.endpoints.sandbox),
            (ConfigKey::LiveEndpoint, self.endpoints.live),
        ];

        for (key, value) in entries {
            if let Some(value) = value {
                config.set(key, value)?;
            }
        }
        Ok(())
    }

    /// Build a fresh [`ClientConfig`] from this file.
    pub fn into_client_config(self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new();
        self.apply_to(&mut config)?;
        Ok(config)
    }
}

impl ClientConfig {
    /// Parse a TOML document into a config.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file_config: FileConfig = toml::from_str(content)?;
        file_config.into_client_config()
    }
}

/// Loads a [`ClientConfig`] from a TOML file on disk.
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Read and validate the configuration file.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let content = std::fs::read_to_string(&self.config_path)?;
        let config = ClientConfig::from_toml_str(&content)?;
        tracing::info!(
            path = %self.config_path.display(),
            environment = %config.environment,
            "M-Pesa client configuration loaded"
        );
        Ok(config)
    }
}
