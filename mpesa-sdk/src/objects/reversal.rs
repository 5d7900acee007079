//! Transaction reversal.

use serde::{Deserialize, Serialize};

/// Command id of a reversal.
pub const REVERSAL_COMMAND_ID: &str = "TransactionReversal";

/// Receiver identifier type of an organization short code / till.
pub const ORGANIZATION_IDENTIFIER_TYPE: u8 = 11;

/// URL suffix appended to the configured result and timeout URLs when the
/// caller does not pick one.
pub const DEFAULT_URL_SUFFIX: &str = "reversal";

/// Caller-supplied parameters of a reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalRequest {
    pub amount: u64,
    /// Gateway receipt number of the transaction to reverse.
    pub transaction_id: String,
    pub remarks: String,
    pub result_url_suffix: String,
    pub timeout_url_suffix: String,
    pub occasion: Option<String>,
}

impl ReversalRequest {
    pub fn new(amount: u64, transaction_id: impl Into<String>, remarks: impl Into<String>) -> Self {
        Self {
            amount,
            transaction_id: transaction_id.into(),
            remarks: remarks.into(),
            result_url_suffix: DEFAULT_URL_SUFFIX.to_owned(),
            timeout_url_suffix: DEFAULT_URL_SUFFIX.to_owned(),
            occasion: None,
        }
    }

    pub fn with_result_url_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.result_url_suffix = suffix.into();
        self
    }

    pub fn with_timeout_url_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.timeout_url_suffix = suffix.into();
        self
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = Some(occasion.into());
        self
    }
}

/// Body of `POST mpesa/reversal/v1/request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalPayload {
    #[serde(rename = "Initiator")]
    pub initiator: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,
    #[serde(rename = "CommandID")]
    pub command_id: String,
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "Amount")]
    pub amount: u64,
    #[serde(rename = "ReceiverParty")]
    pub receiver_party: String,
    #[serde(rename = "RecieverIdentifierType")]
    pub receiver_identifier_type: u8,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    /// Sent as `null` when absent.
    #[serde(rename = "Occasion")]
    pub occasion: Option<String>,
}

/// Acknowledgement of a reversal request. The outcome is delivered later to
/// the result URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalResponse {
    #[serde(rename = "OriginatorConversationID", default)]
    pub originator_conversation_id: Option<String>,
    #[serde(rename = "ConversationID", default)]
    pub conversation_id: Option<String>,
    #[serde(rename = "ResponseCode", default)]
    pub response_code: Option<String>,
    #[serde(rename = "ResponseDescription", default)]
    pub response_description: Option<String>,
}

/// Join a configured base URL and a per-call suffix with a single `/`.
pub fn compose_url(base: &str, suffix: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), suffix.trim_start_matches('/'))
}
