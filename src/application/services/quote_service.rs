//! Quote service orchestrating upstream fetches and reconciliation

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::quote::{reconcile, QuoteBreakdown, StayParams, UpstreamQuote};
use crate::infrastructure::adapters::{PropertyApi, QuoteFetch};
use crate::shared::error::{AppError, AppResult};
use crate::shared::validation::ValidationUtils;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

/// Stay quote request as received from the UI
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStayRequest {
    #[validate(length(min = 1, max = 20))]
    pub property_id: String,
    pub from_date: String,
    pub to_date: String,
    #[validate(range(min = 1, max = 20))]
    pub adults: u32,
    #[serde(default)]
    #[validate(range(max = 20))]
    pub children: u32,
    #[serde(default)]
    #[validate(range(max = 10))]
    pub pets: u32,
    #[serde(default)]
    #[validate(length(max = 40))]
    pub discount_code: Option<String>,
}

pub struct QuoteService {
    _config: Arc<AppConfig>,
    property_api: Arc<dyn PropertyApi>,
}

impl QuoteService {
    pub fn new(config: Arc<AppConfig>, property_api: Arc<dyn PropertyApi>) -> Self {
        Self {
            _config: config,
            property_api,
        }
    }

    /// Produce the canonical breakdown for a stay. Recomputed on every call;
    /// quotes are never cached.
    pub async fn quote_stay(&self, request: &QuoteStayRequest) -> AppResult<QuoteBreakdown> {
        request
            .validate()
            .map_err(|e| AppError::Validation(format!("invalid quote request: {}", e)))?;

        let from = ValidationUtils::parse_stay_date("from_date", &request.from_date)?;
        let to = ValidationUtils::parse_stay_date("to_date", &request.to_date)?;
        let nights = ValidationUtils::validate_stay_range(from, to)?;

        let fetch = QuoteFetch {
            property_id: request.property_id.clone(),
            from_date: from,
            to_date: to,
            adults: request.adults,
            children: request.children,
            pets: request.pets,
            discount_code: request.discount_code.clone(),
        };

        let raw = self.property_api.fetch_quote(&fetch).await?;
        let quote = UpstreamQuote::new(raw);

        let pet_fee_delta = if request.pets > 0 {
            self.petless_delta(&fetch, &quote).await
        } else {
            None
        };

        let params = StayParams {
            nights,
            pet_count: request.pets,
            pet_fee_delta,
        };

        Ok(reconcile(&quote, &params).rounded())
    }

    /// Fetch the same stay without pets and take the fees-total difference.
    /// A failed companion fetch falls back to the itemized-fee keyword scan
    /// inside reconciliation, so this never fails the quote.
    async fn petless_delta(
        &self,
        fetch: &QuoteFetch,
        with_pets: &UpstreamQuote,
    ) -> Option<Decimal> {
        let mut petless = fetch.clone();
        petless.pets = 0;

        match self.property_api.fetch_quote(&petless).await {
            Ok(raw) => {
                let without_pets = UpstreamQuote::new(raw);
                Some(with_pets.fees_total() - without_pets.fees_total())
            }
            Err(err) => {
                warn!(
                    property_id = %fetch.property_id,
                    error = %err,
                    "Petless companion quote failed, falling back to fee-line scan"
                );
                None
            }
        }
    }
}
