//! HTTP client for the M-Pesa gateway.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the configuration, wire types and credential helpers do not pull in
//! `reqwest`.

mod last_response;
mod mpesa;


pub use last_response::LastResponse;
pub use mpesa::{DEFAULT_C2B_API_VERSION, MpesaClient};

use reqwest::StatusCode;

use crate::config::ConfigError;
use crate::credentials::CredentialError;

/// Errors produced by [`MpesaClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required configuration field is unset.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The token endpoint refused the consumer credentials or returned no
    /// token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The gateway returned a non-2xx status code.
    #[error("http error: status {status}, body: {body}")]
    Http { status: StatusCode, body: String },

    /// The security credential could not be derived.
    #[error("crypto error: {0}")]
    Crypto(#[from] CredentialError),

    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
