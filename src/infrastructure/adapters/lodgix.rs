//! Lodgix property-management API adapter
//!
//! Thin HTTP client for the upstream quote and reservation endpoints. The
//! payload shapes vary upstream, so everything comes back as raw JSON and the
//! domain layer resolves fields from it.

use crate::{
    config::AppConfig,
    shared::error::{AppError, AppResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Quote request parameters forwarded upstream
#[derive(Debug, Clone)]
pub struct QuoteFetch {
    pub property_id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub pets: u32,
    pub discount_code: Option<String>,
}

/// Reservation confirmation payload sent after a successful card
/// authorization
#[derive(Debug, Clone)]
pub struct ReservationConfirmation {
    pub reservation_id: String,
    pub transaction_id: String,
    pub amount: Decimal,
}

/// Port for the property-management upstream
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// Fetch a raw quote for a stay. May retry once on transient failure.
    async fn fetch_quote(&self, request: &QuoteFetch) -> AppResult<Value>;

    /// Fetch the current reservation record. Never retried; verification
    /// wants the freshest data it can get.
    async fn fetch_reservation(&self, reservation_id: &str) -> AppResult<Value>;

    /// Confirm a reservation against a captured transaction. Never retried.
    async fn confirm_reservation(&self, confirmation: &ReservationConfirmation)
        -> AppResult<Value>;

    /// Lightweight availability probe for health checks
    async fn is_available(&self) -> bool;
}

/// Adapter for the Lodgix API
pub struct LodgixAdapter {
    config: Arc<AppConfig>,
    client: reqwest::Client,
}

impl LodgixAdapter {
    /// Create a new Lodgix adapter
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lodgix.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.lodgix.api_url.trim_end_matches('/'), path)
    }

    /// Map an upstream HTTP status to the error taxonomy
    fn status_error(status: reqwest::StatusCode, context: &str) -> AppError {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            AppError::UpstreamAuth(format!("{}: upstream rejected credentials ({})", context, status))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            AppError::NotFound(format!("{} not found", context))
        } else {
            AppError::Upstream(format!("{}: upstream returned {}", context, status))
        }
    }

    async fn get_json(&self, url: &str, query: &[(String, String)], context: &str) -> AppResult<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.config.lodgix.account_id, Some(&self.config.lodgix.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, context));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("{}: unreadable response: {}", context, e)))
    }
}

#[async_trait]
impl PropertyApi for LodgixAdapter {
    async fn fetch_quote(&self, request: &QuoteFetch) -> AppResult<Value> {
        let url = self.endpoint(&format!("properties/{}/quote", request.property_id));
        let mut query = vec![
            ("from_date".to_string(), request.from_date.format("%Y-%m-%d").to_string()),
            ("to_date".to_string(), request.to_date.format("%Y-%m-%d").to_string()),
            ("adults".to_string(), request.adults.to_string()),
            ("children".to_string(), request.children.to_string()),
            ("pets".to_string(), request.pets.to_string()),
        ];
        if let Some(code) = &request.discount_code {
            query.push(("discount_code".to_string(), code.clone()));
        }

        info!(
            property_id = %request.property_id,
            pets = %request.pets,
            "Fetching upstream quote"
        );

        let mut last_error = None;
        for attempt in 0..=self.config.lodgix.quote_retries {
            match self.get_json(&url, &query, "quote").await {
                Ok(payload) => return Ok(payload),
                // An auth failure will not heal on retry
                Err(err @ AppError::UpstreamAuth(_)) => return Err(err),
                Err(err) => {
                    last_error = Some(err);
                }
            }

            if attempt < self.config.lodgix.quote_retries {
                warn!(
                    attempt = attempt + 1,
                    "Quote fetch failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(100 * (attempt + 1) as u64)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::Upstream("quote fetch failed".to_string())))
    }

    async fn fetch_reservation(&self, reservation_id: &str) -> AppResult<Value> {
        let url = self.endpoint(&format!("reservations/{}", reservation_id));
        info!(reservation_id = %reservation_id, "Fetching reservation record");
        self.get_json(&url, &[], "reservation").await
    }

    async fn confirm_reservation(
        &self,
        confirmation: &ReservationConfirmation,
    ) -> AppResult<Value> {
        let url = self.endpoint(&format!(
            "reservations/{}/confirm",
            confirmation.reservation_id
        ));

        info!(
            reservation_id = %confirmation.reservation_id,
            transaction_id = %confirmation.transaction_id,
            "Confirming reservation upstream"
        );

        let payload = json!({
            "transaction_id": confirmation.transaction_id,
            "amount": confirmation.amount.round_dp(2).to_string(),
            "payment_method": "credit_card",
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.lodgix.account_id, Some(&self.config.lodgix.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, "reservation confirmation"));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("reservation confirmation: unreadable response: {}", e)))
    }

    async fn is_available(&self) -> bool {
        // Short timeout for health probing, independent of the call timeout
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        match client
            .get(self.endpoint("ping"))
            .basic_auth(&self.config.lodgix.account_id, Some(&self.config.lodgix.api_key))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
