//! Gateway environment selection.

use std::fmt;

/// Base URL of the sandbox gateway.
pub const SANDBOX_ENDPOINT: &str = "https://sandbox.safaricom.co.ke/";

/// Base URL of the production gateway.
pub const LIVE_ENDPOINT: &str = "https://api.safaricom.co.ke/";

/// Which gateway deployment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    Sandbox,
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name.
    ///
    /// Only the exact name `sandbox` selects the sandbox; every other value,
    /// including `live` and `Sandbox`, selects production.
    pub fn from_name(name: &str) -> Self {
        if name == "sandbox" {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// File name of the gateway's public certificate for this environment.
    pub fn certificate_file(self) -> &'static str {
        match self {
            Environment::Sandbox => "SandboxCertificate.cer",
            Environment::Production => "ProductionCertificate.cer",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_sandbox_selects_sandbox() {
        assert_eq!(Environment::from_name("sandbox"), Environment::Sandbox);
        assert_eq!(Environment::from_name("SANDBOX"), Environment::Production);
        assert_eq!(Environment::from_name(" sandbox"), Environment::Production);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("live"), Environment::Production);
        assert_eq!(Environment::from_name(""), Environment::Production);
    }

    #[test]
    fn test_certificate_follows_environment() {
        assert_eq!(
            Environment::Sandbox.certificate_file(),
            "SandboxCertificate.cer"
        );
        assert_eq!(
            Environment::Production.certificate_file(),
            "ProductionCertificate.cer"
        );
    }
}
