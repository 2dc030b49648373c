//! Authorize.Net card gateway adapter
//!
//! Wraps the createTransactionRequest JSON API for deposit authorization and
//! the compensating void. Neither call is ever retried; the gateway offers no
//! idempotency keys, and a duplicate charge is worse than a failed one.

use crate::{
    config::AppConfig,
    domain::payment::CardDetails,
    shared::error::{AppError, AppResult},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Successful authorization details returned by the gateway
#[derive(Debug, Clone)]
pub struct GatewayAuthorization {
    pub transaction_id: String,
    pub auth_code: Option<String>,
}

/// Port for the card gateway
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// Authorize and capture the deposit on the card. Exactly one attempt.
    async fn authorize(
        &self,
        amount: Decimal,
        card: &CardDetails,
        reservation_id: &str,
    ) -> AppResult<GatewayAuthorization>;

    /// Void a prior unsettled transaction. Exactly one attempt.
    async fn void(&self, transaction_id: &str) -> AppResult<()>;
}

/// Adapter for the Authorize.Net gateway
pub struct AuthorizeNetAdapter {
    config: Arc<AppConfig>,
    client: reqwest::Client,
}

impl AuthorizeNetAdapter {
    /// Create a new gateway adapter
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.authorize_net.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn merchant_authentication(&self) -> Value {
        json!({
            "name": self.config.authorize_net.api_login_id,
            "transactionKey": self.config.authorize_net.transaction_key,
        })
    }

    async fn post_transaction(&self, payload: Value, context: &str) -> AppResult<Value> {
        let response = self
            .client
            .post(&self.config.authorize_net.api_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "{}: gateway returned {}",
                context, status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("{}: unreadable gateway response: {}", context, e)))
    }

    /// Check the envelope-level result. Credential problems surface as an
    /// upstream auth error so the client never sees gateway account detail.
    fn check_result_envelope(body: &Value, context: &str) -> AppResult<()> {
        let result_code = body
            .pointer("/messages/resultCode")
            .and_then(Value::as_str)
            .unwrap_or("");

        if result_code.eq_ignore_ascii_case("ok") {
            return Ok(());
        }

        let message_code = body
            .pointer("/messages/message/0/code")
            .and_then(Value::as_str)
            .unwrap_or("");
        let message_text = body
            .pointer("/messages/message/0/text")
            .and_then(Value::as_str)
            .unwrap_or("gateway error");

        // E0000x codes cover merchant authentication and malformed requests,
        // both integration problems rather than card problems
        if message_code.starts_with("E0000") {
            return Err(AppError::UpstreamAuth(format!(
                "{}: {} {}",
                context, message_code, message_text
            )));
        }

        Err(AppError::Upstream(format!(
            "{}: {} {}",
            context, message_code, message_text
        )))
    }

    /// Pull decline details out of a transaction response
    fn decline_reason(transaction: &Value) -> String {
        transaction
            .pointer("/errors/0/errorText")
            .and_then(Value::as_str)
            .or_else(|| {
                transaction
                    .pointer("/messages/0/description")
                    .and_then(Value::as_str)
            })
            .unwrap_or("The card was declined")
            .to_string()
    }
}

#[async_trait]
impl CardGateway for AuthorizeNetAdapter {
    async fn authorize(
        &self,
        amount: Decimal,
        card: &CardDetails,
        reservation_id: &str,
    ) -> AppResult<GatewayAuthorization> {
        let payload = json!({
            "createTransactionRequest": {
                "merchantAuthentication": self.merchant_authentication(),
                "refId": reservation_id,
                "transactionRequest": {
                    "transactionType": "authCaptureTransaction",
                    "amount": amount.round_dp(2).to_string(),
                    "payment": {
                        "creditCard": {
                            "cardNumber": card.normalized_number(),
                            "expirationDate": card.expiration,
                            "cardCode": card.card_code,
                        }
                    },
                    "order": {
                        "invoiceNumber": reservation_id,
                        "description": "Booking deposit",
                    },
                    "billTo": {
                        "firstName": card.cardholder_first_name,
                        "lastName": card.cardholder_last_name,
                    }
                }
            }
        });

        info!(
            reservation_id = %reservation_id,
            card = %format!("****{}", card.last_four()),
            "Submitting deposit authorization"
        );

        let body = self.post_transaction(payload, "authorization").await?;
        Self::check_result_envelope(&body, "authorization")?;

        let transaction = body
            .get("transactionResponse")
            .ok_or_else(|| AppError::Upstream("authorization: missing transaction response".to_string()))?;

        let response_code = transaction
            .get("responseCode")
            .and_then(Value::as_str)
            .unwrap_or("");

        // "1" is approved; everything else is a decline or hold
        if response_code != "1" {
            return Err(AppError::GatewayDeclined(Self::decline_reason(transaction)));
        }

        let transaction_id = transaction
            .get("transId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty() && *id != "0")
            .ok_or_else(|| AppError::Upstream("authorization: missing transaction id".to_string()))?
            .to_string();

        Ok(GatewayAuthorization {
            transaction_id,
            auth_code: transaction
                .get("authCode")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    async fn void(&self, transaction_id: &str) -> AppResult<()> {
        let payload = json!({
            "createTransactionRequest": {
                "merchantAuthentication": self.merchant_authentication(),
                "transactionRequest": {
                    "transactionType": "voidTransaction",
                    "refTransId": transaction_id,
                }
            }
        });

        info!(transaction_id = %transaction_id, "Submitting compensating void");

        let body = self.post_transaction(payload, "void").await?;
        Self::check_result_envelope(&body, "void")?;

        let response_code = body
            .pointer("/transactionResponse/responseCode")
            .and_then(Value::as_str)
            .unwrap_or("");

        if response_code != "1" {
            let reason = body
                .get("transactionResponse")
                .map(Self::decline_reason)
                .unwrap_or_else(|| "void rejected".to_string());
            return Err(AppError::Upstream(format!("void: {}", reason)));
        }

        Ok(())
    }
}
