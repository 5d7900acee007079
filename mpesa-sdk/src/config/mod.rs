//! Client configuration.
//!
//! [`ClientConfig`] holds the merchant credentials, callback URLs and the
//! environment selector read by every gateway operation. Fields are set
//! programmatically, by name through [`ClientConfig::configure`], or loaded
//! from a TOML file with [`ConfigLoader`].

mod environment;
pub mod file;
mod key;
mod transaction_type;

pub use environment::{Environment, LIVE_ENDPOINT, SANDBOX_ENDPOINT};
pub use file::{ConfigLoader, FileConfig};
pub use key::ConfigKey;
pub use transaction_type::TransactionType;

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors raised while building or reading a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config key: {0}")]
    UnknownKey(String),

    #[error("missing required config field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("invalid endpoint path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Merchant configuration for gateway access.
///
/// A fresh config has every credential unset, targets production, and looks
/// for certificates in the working directory.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    /// Selects which of `shortcode` / `store_number` identifies the merchant.
    pub transaction_type: Option<TransactionType>,
    /// Pay bill short code. Always used as the receiving party of STK pushes.
    pub shortcode: Option<String>,
    /// Till store number, used as the merchant id for buy goods accounts.
    pub store_number: Option<String>,
    /// Lipa Na M-Pesa Online pass key.
    pub pass_key: Option<String>,
    pub initiator_name: Option<String>,
    pub initiator_password: Option<String>,
    /// Precomputed security credential. When set, reversals send it as is
    /// instead of encrypting `initiator_password`.
    pub security_credential: Option<String>,
    pub callback_url: Option<String>,
    pub confirmation_url: Option<String>,
    pub validation_url: Option<String>,
    /// Base of the reversal result URL; a per-call suffix is appended.
    pub result_url: Option<String>,
    /// Base of the reversal queue timeout URL; a per-call suffix is appended.
    pub timeout_url: Option<String>,
    pub b2c_shortcode: Option<String>,
    pub b2b_shortcode: Option<String>,
    pub official_contact: Option<String>,
    pub logo_link: Option<String>,
    pub environment: Environment,
    pub sandbox_endpoint: Url,
    pub live_endpoint: Url,
    /// Directory holding `SandboxCertificate.cer` / `ProductionCertificate.cer`.
    pub certificate_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            consumer_key: None,
            consumer_secret: None,
            transaction_type: None,
            shortcode: None,
            store_number: None,
            pass_key: None,
            initiator_name: None,
            initiator_password: None,
            security_credential: None,
            callback_url: None,
            confirmation_url: None,
            validation_url: None,
            result_url: None,
            timeout_url: None,
            b2c_shortcode: None,
            b2b_shortcode: None,
            official_contact: None,
            logo_link: None,
            environment: Environment::default(),
            sandbox_endpoint: Url::parse(SANDBOX_ENDPOINT).expect("valid sandbox endpoint"),
            live_endpoint: Url::parse(LIVE_ENDPOINT).expect("valid live endpoint"),
            certificate_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by name.
    ///
    /// Fails with [`ConfigError::UnknownKey`] if `key` does not name a field.
    /// Text fields read back through [`get`](Self::get) exactly as set. The
    /// typed fields do not: `env` and `transaction_type` read back in
    /// canonical form (`till` becomes `buygoods`), and endpoints gain a
    /// trailing `/`.
    pub fn configure(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<&mut Self, ConfigError> {
        let key: ConfigKey = key.parse()?;
        self.set(key, value)?;
        Ok(self)
    }

    /// Builder form of [`configure`](Self::configure).
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Result<Self, ConfigError> {
        self.configure(key, value)?;
        Ok(self)
    }

    /// Set a field.
    ///
    /// Endpoints must be absolute `http`/`https` URLs; a trailing `/` is added
    /// when missing so endpoint paths append to them.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        match key {
            ConfigKey::TransactionType => {
                self.transaction_type = Some(TransactionType::from_name(&value));
            }
            ConfigKey::Environment => self.environment = Environment::from_name(&value),
            ConfigKey::SandboxEndpoint => self.sandbox_endpoint = parse_endpoint(key, &value)?,
            ConfigKey::LiveEndpoint => self.live_endpoint = parse_endpoint(key, &value)?,
            ConfigKey::CertificateDir => self.certificate_dir = PathBuf::from(value),
            _ => {
                if let Some(slot) = self.text_field_mut(key) {
                    *slot = Some(value);
                }
            }
        }
        Ok(())
    }

    /// Read a field back in the string form `configure` accepts.
    ///
    /// Enumerated fields come back in canonical form (`paybill` / `buygoods`,
    /// `sandbox` / `production`).
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::TransactionType => self.transaction_type.map(|t| t.as_str().to_owned()),
            ConfigKey::Environment => Some(self.environment.as_str().to_owned()),
            ConfigKey::SandboxEndpoint => Some(self.sandbox_endpoint.to_string()),
            ConfigKey::LiveEndpoint => Some(self.live_endpoint.to_string()),
            ConfigKey::CertificateDir => Some(self.certificate_dir.display().to_string()),
            _ => self.text_field(key).and_then(Clone::clone),
        }
    }

    /// Borrow a required text field, failing if it is unset or empty.
    pub fn require(&self, key: ConfigKey) -> Result<&str, ConfigError> {
        self.text_field(key)
            .and_then(Option::as_deref)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingField(key.as_str()))
    }

    pub fn transaction_type(&self) -> Result<TransactionType, ConfigError> {
        self.transaction_type
            .ok_or(ConfigError::MissingField(ConfigKey::TransactionType.as_str()))
    }

    /// The merchant identifier for the configured account kind: the short
    /// code for pay bill accounts, the store number otherwise.
    pub fn merchant_id(&self) -> Result<&str, ConfigError> {
        match self.transaction_type()? {
            TransactionType::PayBill => self.require(ConfigKey::Shortcode),
            TransactionType::BuyGoods => self.require(ConfigKey::StoreNumber),
        }
    }

    /// Base URL of the selected environment.
    pub fn base_url(&self) -> &Url {
        match self.environment {
            Environment::Sandbox => &self.sandbox_endpoint,
            Environment::Production => &self.live_endpoint,
        }
    }

    /// Append an endpoint path to the selected environment's base URL.
    ///
    /// The path is concatenated, not resolved as a relative reference, and an
    /// empty path yields the base URL itself. Paths whose dot segments would
    /// climb out of the base are rejected.
    pub fn environment_url(&self, path: &str) -> Result<Url, ConfigError> {
        let base = self.base_url();
        let url = Url::parse(&format!("{base}{path}")).map_err(|e| ConfigError::InvalidPath {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        if !url.as_str().starts_with(base.as_str()) {
            return Err(ConfigError::InvalidPath {
                path: path.to_owned(),
                reason: format!("resolves outside of {base}"),
            });
        }
        Ok(url)
    }

    fn text_field(&self, key: ConfigKey) -> Option<&Option<String>> {
        let field = match key {
            ConfigKey::ConsumerKey => &self.consumer_key,
            ConfigKey::ConsumerSecret => &self.consumer_secret,
            ConfigKey::Shortcode => &self.shortcode,
            ConfigKey::StoreNumber => &self.store_number,
            ConfigKey::PassKey => &self.pass_key,
            ConfigKey::InitiatorName => &self.initiator_name,
            ConfigKey::InitiatorPassword => &self.initiator_password,
            ConfigKey::SecurityCredential => &self.security_credential,
            ConfigKey::CallbackUrl => &self.callback_url,
            ConfigKey::ConfirmationUrl => &self.confirmation_url,
            ConfigKey::ValidationUrl => &self.validation_url,
            ConfigKey::ResultUrl => &self.result_url,
            ConfigKey::TimeoutUrl => &self.timeout_url,
            ConfigKey::B2cShortcode => &self.b2c_shortcode,
            ConfigKey::B2bShortcode => &self.b2b_shortcode,
            ConfigKey::OfficialContact => &self.official_contact,
            ConfigKey::LogoLink => &self.logo_link,
            ConfigKey::TransactionType
            | ConfigKey::Environment
            | ConfigKey::SandboxEndpoint
            | ConfigKey::LiveEndpoint
            | ConfigKey::CertificateDir => return None,
        };
        Some(field)
    }

    fn text_field_mut(&mut self, key: ConfigKey) -> Option<&mut Option<String>> {
        let field = match key {
            ConfigKey::ConsumerKey => &mut self.consumer_key,
            ConfigKey::ConsumerSecret => &mut self.consumer_secret,
            ConfigKey::Shortcode => &mut self.shortcode,
            ConfigKey::StoreNumber => &mut self.store_number,
            ConfigKey::PassKey => &mut self.pass_key,
            ConfigKey::InitiatorName => &mut self.initiator_name,
            ConfigKey::InitiatorPassword => &mut self.initiator_password,
            ConfigKey::SecurityCredential => &mut self.security_credential,
            ConfigKey::CallbackUrl => &mut self.callback_url,
            ConfigKey::ConfirmationUrl => &mut self.confirmation_url,
            ConfigKey::ValidationUrl => &mut self.validation_url,
            ConfigKey::ResultUrl => &mut self.result_url,
            ConfigKey::TimeoutUrl => &mut self.timeout_url,
            ConfigKey::B2cShortcode => &mut self.b2c_shortcode,
            ConfigKey::B2bShortcode => &mut self.b2b_shortcode,
            ConfigKey::OfficialContact => &mut self.official_contact,
            ConfigKey::LogoLink => &mut self.logo_link,
            ConfigKey::TransactionType
            | ConfigKey::Environment
            | ConfigKey::SandboxEndpoint
            | ConfigKey::LiveEndpoint
            | ConfigKey::CertificateDir => return None,
        };
        Some(field)
    }
}

fn parse_endpoint(key: ConfigKey, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key: key.as_str(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            key: key.as_str(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paybill_config() -> ClientConfig {
        ClientConfig::new()
            .with("transaction_type", "paybill")
            .and_then(|c| c.with("shortcode", "174379"))
            .and_then(|c| c.with("store_number", "300584"))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.consumer_key.is_none());
        assert!(config.transaction_type.is_none());
        assert_eq!(config.base_url().as_str(), LIVE_ENDPOINT);
        assert_eq!(config.sandbox_endpoint.as_str(), SANDBOX_ENDPOINT);
    }

    #[test]
    fn test_configure_rejects_unknown_key() {
        let mut config = ClientConfig::new();
        let err = config.configure("not_a_field", "x").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "not_a_field"));
    }

    #[test]
    fn test_configured_text_fields_read_back_unchanged() {
        let mut config = ClientConfig::new();
        for key in ConfigKey::ALL {
            if config.text_field(key).is_none() {
                continue;
            }
            let value = format!("value of {key}");
            config.configure(key.as_str(), value.clone()).unwrap();
            assert_eq!(config.get(key), Some(value));
        }
    }

    #[test]
    fn test_enumerated_fields_read_back_canonical() {
        let mut config = ClientConfig::new();
        config
            .configure("env", "sandbox")
            .unwrap()
            .configure("transaction_type", "till")
            .unwrap()
            .configure("live_endpoint", "http://127.0.0.1:8080/gateway")
            .unwrap();
        assert_eq!(config.get(ConfigKey::Environment).as_deref(), Some("sandbox"));
        assert_eq!(
            config.get(ConfigKey::TransactionType).as_deref(),
            Some("buygoods")
        );
        assert_eq!(
            config.get(ConfigKey::LiveEndpoint).as_deref(),
            Some("http://127.0.0.1:8080/gateway/")
        );
    }

    #[test]
    fn test_environment_url_selects_base() {
        let mut config = ClientConfig::new();
        for path in [
            "oauth/v1/generate?grant_type=client_credentials",
            "mpesa/stkpush/v1/processrequest",
        ] {
            config.environment = Environment::Sandbox;
            assert_eq!(
                config.environment_url(path).unwrap().as_str(),
                format!("{SANDBOX_ENDPOINT}{path}")
            );
            config.environment = Environment::Production;
            assert_eq!(
                config.environment_url(path).unwrap().as_str(),
                format!("{LIVE_ENDPOINT}{path}")
            );
        }
        assert_eq!(config.environment_url("").unwrap().as_str(), LIVE_ENDPOINT);
    }

    #[test]
    fn test_endpoint_gets_trailing_slash() {
        let config = ClientConfig::new()
            .with("sandbox_endpoint", "http://127.0.0.1:8080/gateway")
            .and_then(|c| c.with("env", "sandbox"))
            .unwrap();
        assert_eq!(
            config.environment_url("mpesa/reversal/v1/request").unwrap().as_str(),
            "http://127.0.0.1:8080/gateway/mpesa/reversal/v1/request"
        );
    }

    #[test]
    fn test_environment_url_appends_to_base_path() {
        let config = ClientConfig::new()
            .with("sandbox_endpoint", "http://127.0.0.1:8080/gateway/")
            .and_then(|c| c.with("env", "sandbox"))
            .unwrap();
        assert_eq!(
            config.environment_url("/mpesa/x").unwrap().as_str(),
            "http://127.0.0.1:8080/gateway//mpesa/x"
        );
        let url = config.environment_url("//evil.example/steal").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/gateway///evil.example/steal");

        for path in ["../up", "mpesa/../../up", "%2e%2e/up"] {
            let err = config.environment_url(path).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPath { .. }), "{path}");
        }
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let err = ClientConfig::new()
            .with("live_endpoint", "ftp://api.safaricom.co.ke/")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "live_endpoint", .. }));
        assert!(ClientConfig::new().with("live_endpoint", "not a url").is_err());
    }

    #[test]
    fn test_merchant_id_follows_transaction_type() {
        let mut config = paybill_config();
        assert_eq!(config.merchant_id().unwrap(), "174379");

        config.set(ConfigKey::TransactionType, "buygoods").unwrap();
        assert_eq!(config.merchant_id().unwrap(), "300584");
    }

    #[test]
    fn test_require_reports_missing_field() {
        let config = ClientConfig::new().with("pass_key", "").unwrap();
        assert!(matches!(
            config.require(ConfigKey::PassKey),
            Err(ConfigError::MissingField("pass_key"))
        ));
        assert!(matches!(
            config.merchant_id(),
            Err(ConfigError::MissingField("transaction_type"))
        ));

        let config = ClientConfig::new().with("transaction_type", "till").unwrap();
        assert!(matches!(
            config.merchant_id(),
            Err(ConfigError::MissingField("store_number"))
        ));
    }
}
