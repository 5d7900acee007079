//! Request and response bodies of the gateway endpoints.
//!
//! Field names follow the gateway's PascalCase wire format, including its
//! historical misspellings (`RecieverIdentifierType`,
//! `OriginatorCoversationID`).

pub mod auth;
pub mod c2b;
pub mod reversal;
pub mod stk_push;
