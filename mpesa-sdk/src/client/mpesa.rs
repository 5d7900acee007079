//! Gateway operations.
//!
//! Every operation resolves its endpoint against the configured environment,
//! fetches a fresh OAuth token, and posts a JSON body with
//! `Authorization: Bearer <token>`. Required configuration is validated
//! before any request is sent.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{ClientError, LastResponse};
use crate::config::{ClientConfig, ConfigError, ConfigKey};
use crate::credentials::{self, Timestamp, basic_credential, load_certificate, stk_password};
use crate::objects::auth::AccessTokenResponse;
use crate::objects::c2b::{RegisterUrlRequest, ResponseType};
use crate::objects::reversal::{
    ORGANIZATION_IDENTIFIER_TYPE, REVERSAL_COMMAND_ID, ReversalPayload, ReversalRequest,
    compose_url,
};
use crate::objects::stk_push::{StkPushRequest, StkQueryRequest};

const OAUTH_PATH: &str = "oauth/v1/generate?grant_type=client_credentials";
const STK_PUSH_PATH: &str = "mpesa/stkpush/v1/processrequest";
const STK_QUERY_PATH: &str = "mpesa/stkpushquery/v1/query";
const REVERSAL_PATH: &str = "mpesa/reversal/v1/request";

/// C2B API version used when the caller has no reason to pick another.
pub const DEFAULT_C2B_API_VERSION: &str = "v1";

fn register_url_path(api_version: &str) -> String {
    format!("mpesa/c2b/{api_version}/registerurl")
}

/// Everything needed to send one authenticated request.
struct RequestContext<'a, B> {
    url: Url,
    token: String,
    payload: &'a B,
}

/// Typed HTTP client for the M-Pesa gateway.
///
/// Operations take `&mut self`: each records the body it received into
/// [`LastResponse`], so one instance serves one caller at a time.
#[derive(Debug, Clone)]
pub struct MpesaClient {
    http: Client,
    config: ClientConfig,
    last_response: LastResponse,
}

impl MpesaClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            last_response: LastResponse::default(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Set a configuration field by name. See [`ClientConfig::configure`].
    pub fn configure(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<&mut Self, ConfigError> {
        self.config.configure(key, value)?;
        Ok(self)
    }

    /// Resolve `path` against the configured environment's base URL.
    pub fn environment_url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.config.environment_url(path)?)
    }

    pub fn last_response(&self) -> &LastResponse {
        &self.last_response
    }

    /// Body of the most recent response, exactly as received.
    pub fn last_response_raw(&self) -> Option<&str> {
        self.last_response.raw()
    }

    /// Body of the most recent response, parsed as JSON.
    pub fn last_response_json(&self) -> Option<Result<Value, serde_json::Error>> {
        self.last_response.json()
    }

    /// `GET oauth/v1/generate` – exchange the consumer key and secret for a
    /// bearer token.
    pub async fn fetch_access_token(&mut self) -> Result<String, ClientError> {
        let credential = basic_credential(
            self.config.require(ConfigKey::ConsumerKey)?,
            self.config.require(ConfigKey::ConsumerSecret)?,
        );
        let url = self.environment_url(OAUTH_PATH)?;

        tracing::debug!(environment = %self.config.environment, "requesting access token");
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Basic {credential}"))
            .send()
            .await?;

        let (status, body) = self.capture(resp).await?;
        if !status.is_success() {
            tracing::warn!(%status, "access token request rejected");
            return Err(ClientError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: AccessTokenResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::Auth(format!("malformed token response: {e}")))?;
        token
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClientError::Auth("token response carried no access_token".into()))
    }

    /// `POST mpesa/c2b/{api_version}/registerurl` – register the configured
    /// confirmation and validation URLs for the short code.
    ///
    /// The gateway's usual choice is `ResponseType::Cancelled` with
    /// [`DEFAULT_C2B_API_VERSION`].
    pub async fn register_callback_urls(
        &mut self,
        response_type: ResponseType,
        api_version: &str,
    ) -> Result<Value, ClientError> {
        let payload = RegisterUrlRequest {
            short_code: self.config.require(ConfigKey::Shortcode)?.to_owned(),
            response_type,
            confirmation_url: self.config.require(ConfigKey::ConfirmationUrl)?.to_owned(),
            validation_url: self.config.require(ConfigKey::ValidationUrl)?.to_owned(),
        };

        self.post(&register_url_path(api_version), &payload).await
    }

    /// `POST mpesa/stkpush/v1/processrequest` – prompt the payer's phone to
    /// authorize a payment to the merchant.
    pub async fn initiate_push(
        &mut self,
        amount: u64,
        payer_phone_number: &str,
        account_reference: &str,
        transaction_description: &str,
    ) -> Result<Value, ClientError> {
        let transaction_type = self.config.transaction_type()?;
        let merchant_id = self.config.merchant_id()?;
        let timestamp = Timestamp::now()?;
        let password = stk_password(
            merchant_id,
            self.config.require(ConfigKey::PassKey)?,
            &timestamp,
        );

        let payload = StkPushRequest {
            business_short_code: merchant_id.to_owned(),
            password,
            timestamp: timestamp.as_str().to_owned(),
            transaction_type,
            amount,
            phone_number: payer_phone_number.to_owned(),
            party_a: payer_phone_number.to_owned(),
            party_b: self.config.require(ConfigKey::Shortcode)?.to_owned(),
            callback_url: self.config.require(ConfigKey::CallbackUrl)?.to_owned(),
            account_reference: account_reference.to_owned(),
            transaction_desc: transaction_description.to_owned(),
        };

        self.post(STK_PUSH_PATH, &payload).await
    }

    /// `POST mpesa/stkpushquery/v1/query` – query the state of an STK push by
    /// the `CheckoutRequestID` it was acknowledged with.
    pub async fn query_push_status(
        &mut self,
        checkout_request_id: &str,
    ) -> Result<Value, ClientError> {
        let merchant_id = self.config.merchant_id()?;
        let timestamp = Timestamp::now()?;
        let password = stk_password(
            merchant_id,
            self.config.require(ConfigKey::PassKey)?,
            &timestamp,
        );

        let payload = StkQueryRequest {
            business_short_code: merchant_id.to_owned(),
            password,
            timestamp: timestamp.as_str().to_owned(),
            checkout_request_id: checkout_request_id.to_owned(),
        };

        self.post(STK_QUERY_PATH, &payload).await
    }

    /// `POST mpesa/reversal/v1/request` – ask the gateway to reverse a
    /// completed transaction. The outcome is delivered to the result URL.
    pub async fn reverse_transaction(
        &mut self,
        request: ReversalRequest,
    ) -> Result<Value, ClientError> {
        let initiator = self.config.require(ConfigKey::InitiatorName)?.to_owned();
        let receiver_party = self.config.merchant_id()?.to_owned();
        let result_url = compose_url(
            self.config.require(ConfigKey::ResultUrl)?,
            &request.result_url_suffix,
        );
        let queue_timeout_url = compose_url(
            self.config.require(ConfigKey::TimeoutUrl)?,
            &request.timeout_url_suffix,
        );
        let security_credential = self.security_credential().await?;

        let payload = ReversalPayload {
            initiator,
            security_credential,
            command_id: REVERSAL_COMMAND_ID.to_owned(),
            transaction_id: request.transaction_id,
            amount: request.amount,
            receiver_party,
            receiver_identifier_type: ORGANIZATION_IDENTIFIER_TYPE,
            result_url,
            queue_timeout_url,
            remarks: request.remarks,
            occasion: request.occasion,
        };

        self.post(REVERSAL_PATH, &payload).await
    }

    /// The security credential for privileged commands.
    ///
    /// A configured `security_credential` is returned as is; otherwise the
    /// initiator password is encrypted with the environment's certificate from
    /// `certificate_dir`.
    pub async fn security_credential(&self) -> Result<String, ClientError> {
        if let Some(credential) = self
            .config
            .security_credential
            .as_deref()
            .filter(|credential| !credential.is_empty())
        {
            return Ok(credential.to_owned());
        }

        let password = self.config.require(ConfigKey::InitiatorPassword)?;
        let certificate =
            load_certificate(&self.config.certificate_dir, self.config.environment).await?;
        Ok(credentials::security_credential(&certificate, password)?)
    }

    async fn post<B: Serialize>(&mut self, path: &str, payload: &B) -> Result<Value, ClientError> {
        let context = RequestContext {
            url: self.environment_url(path)?,
            token: self.fetch_access_token().await?,
            payload,
        };

        tracing::debug!(
            endpoint = path,
            environment = %self.config.environment,
            "sending gateway request"
        );
        let resp = self
            .http
            .post(context.url)
            .bearer_auth(&context.token)
            .json(context.payload)
            .send()
            .await?;

        let (status, body) = self.capture(resp).await?;
        if !status.is_success() {
            tracing::warn!(endpoint = path, %status, "gateway returned an error status");
            return Err(ClientError::Http { status, body });
        }
        serde_json::from_str(&body).map_err(ClientError::Json)
    }

    async fn capture(&mut self, resp: Response) -> Result<(StatusCode, String), ClientError> {
        let status = resp.status();
        let body = resp.text().await?;
        self.last_response.record(&body);
        Ok((status, body))
    }
}
