//! Client SDK for the M-Pesa Daraja payment gateway.
//!
//! - [`config`]: merchant credentials, callback URLs and environment selection,
//!   set by name or loaded from TOML.
//! - [`credentials`]: OAuth basic credentials, the STK push password and the
//!   certificate-encrypted security credential.
//! - [`objects`]: request and response bodies of the gateway endpoints.
//! - [`client`]: the async [`MpesaClient`](client::MpesaClient) (feature
//!   `client`).

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod credentials;
pub mod objects;

#[cfg(feature = "client")]
pub use client::{ClientError, MpesaClient};
pub use config::{ClientConfig, ConfigError, Environment, TransactionType};
