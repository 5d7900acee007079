//! Credential derivation for gateway requests.
//!
//! # OAuth
//!
//! The token endpoint takes HTTP Basic credentials:
//! `base64("{consumer_key}:{consumer_secret}")`.
//!
//! # STK push password
//!
//! STK push and STK query requests carry
//! `Password = base64("{merchant_id}{pass_key}{timestamp}")` next to the
//! `Timestamp` it was derived from. Both fields must come from the same
//! [`Timestamp`] value.
//!
//! # Security credential
//!
//! Privileged commands such as reversals carry the initiator password
//! encrypted with the gateway's X.509 public key (RSA, PKCS#1 v1.5 padding),
//! base64-encoded.

use std::path::{Path, PathBuf};

use openssl::rsa::Padding;
use openssl::x509::X509;
use thiserror::Error;
use time::OffsetDateTime;
use time::macros::{format_description, offset};

use crate::config::Environment;

/// Errors produced while deriving credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read certificate {path}: {source}")]
    CertificateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("certificate error: {0}")]
    Certificate(#[from] openssl::error::ErrorStack),

    #[error("certificate does not carry an RSA public key")]
    NotRsa,

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// A gateway timestamp, `YYYYMMDDHHMMSS` in East Africa Time (UTC+03:00).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// The current time.
    pub fn now() -> Result<Self, CredentialError> {
        Self::at(OffsetDateTime::now_utc())
    }

    /// The timestamp of a given instant, converted to gateway time.
    pub fn at(moment: OffsetDateTime) -> Result<Self, CredentialError> {
        let formatted = moment
            .to_offset(offset!(+3))
            .format(format_description!(
                "[year][month][day][hour][minute][second]"
            ))?;
        Ok(Self(formatted))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `base64("{consumer_key}:{consumer_secret}")` for the `Authorization: Basic`
/// header of the token request.
pub fn basic_credential(consumer_key: &str, consumer_secret: &str) -> String {
    fast32::base64::RFC4648.encode(format!("{consumer_key}:{consumer_secret}").as_bytes())
}

/// Derive the STK push password.
pub fn stk_password(merchant_id: &str, pass_key: &str, timestamp: &Timestamp) -> String {
    let data = format!("{merchant_id}{pass_key}{}", timestamp.as_str());
    fast32::base64::RFC4648.encode(data.as_bytes())
}

/// Encrypt the initiator password with the public key of `certificate`
/// (PEM, or DER as a fallback) and base64-encode the ciphertext.
pub fn security_credential(
    certificate: &[u8],
    initiator_password: &str,
) -> Result<String, CredentialError> {
    let cert = X509::from_pem(certificate).or_else(|_| X509::from_der(certificate))?;
    let rsa = cert
        .public_key()?
        .rsa()
        .map_err(|_| CredentialError::NotRsa)?;

    let mut encrypted = vec![0u8; rsa.size() as usize];
    let len = rsa.public_encrypt(initiator_password.as_bytes(), &mut encrypted, Padding::PKCS1)?;
    encrypted.truncate(len);

    Ok(fast32::base64::RFC4648.encode(&encrypted))
}

/// Path of the certificate file for `environment` inside `dir`.
pub fn certificate_path(dir: &Path, environment: Environment) -> PathBuf {
    dir.join(environment.certificate_file())
}

/// Read the gateway certificate for `environment` from `dir`.
pub async fn load_certificate(
    dir: &Path,
    environment: Environment,
) -> Result<Vec<u8>, CredentialError> {
    let path = certificate_path(dir, environment);
    tokio::fs::read(&path)
        .await
        .map_err(|source| CredentialError::CertificateRead { path, source })
}


#[cfg(test)]
mod tests {
    use super::test_support::{decrypt_credential, self_signed_certificate};
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_timestamp_is_gateway_local_time() {
        let ts = Timestamp::at(datetime!(2024-01-02 03:04:05 UTC)).unwrap();
        assert_eq!(ts.as_str(), "20240102060405");

        let ts = Timestamp::at(datetime!(2024-12-31 22:30:00 UTC)).unwrap();
        assert_eq!(ts.as_str(), "20250101013000");
    }

    #[test]
    fn test_timestamp_now_shape() {
        let ts = Timestamp::now().unwrap();
        assert_eq!(ts.as_str().len(), 14);
        assert!(ts.as_str().bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn test_stk_password_is_deterministic_base64() {
        let ts = Timestamp::at(datetime!(2019-12-19 07:20:36 UTC)).unwrap();
        let pass_key = "bfb279f9aa9bdbcf158e97dd71a467cd2e0c893059b10f78e6b72ada1ed2c919";

        let first = stk_password("174379", pass_key, &ts);
        let second = stk_password("174379", pass_key, &ts);
        assert_eq!(first, second);

        let decoded = fast32::base64::RFC4648.decode_str(&first).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            format!("174379{pass_key}20191219102036")
        );

        assert_ne!(first, stk_password("300584", pass_key, &ts));
    }

    #[test]
    fn test_basic_credential() {
        assert_eq!(basic_credential("key", "secret"), "a2V5OnNlY3JldA==");
    }

    #[test]
    fn test_security_credential_round_trip() {
        let (pem, key) = self_signed_certificate();
        let credential = security_credential(&pem, "Safaricom999!*!").unwrap();
        assert_eq!(decrypt_credential(&credential, &key), "Safaricom999!*!");

        // PKCS#1 v1.5 padding is randomized.
        let again = security_credential(&pem, "Safaricom999!*!").unwrap();
        assert_ne!(credential, again);
    }

    #[test]
    fn test_security_credential_accepts_der() {
        let (pem, key) = self_signed_certificate();
        let der = X509::from_pem(&pem).unwrap().to_der().unwrap();
        let credential = security_credential(&der, "pw").unwrap();
        assert_eq!(decrypt_credential(&credential, &key), "pw");
    }

    #[test]
    fn test_security_credential_rejects_garbage() {
        let err = security_credential(b"not a certificate", "pw").unwrap_err();
        assert!(matches!(err, CredentialError::Certificate(_)));
    }

    #[tokio::test]
    async fn test_load_certificate_missing_file() {
        let dir = std::env::temp_dir().join("mpesa-sdk-no-such-dir");
        let err = load_certificate(&dir, Environment::Production)
            .await
            .unwrap_err();
        match err {
            CredentialError::CertificateRead { path, .. } => {
                assert!(path.ends_with("ProductionCertificate.cer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
