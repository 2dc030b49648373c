//! Deposit payment orchestration
//!
//! Drives an attempt through verification, card authorization, and upstream
//! reservation confirmation, with a single compensating void when the
//! confirmation fails after the card was charged. The amount charged always
//! comes from a fresh reservation fetch; nothing the client sends is trusted.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::application::services::MetricsService;
use crate::config::AppConfig;
use crate::domain::payment::{CardDetails, PaymentAttempt, PaymentPhase};
use crate::domain::reservation::{ReservationRecord, StayDates, VerifiedDeposit};
use crate::infrastructure::adapters::{
    AttemptStore, CardGateway, MonitoringAdapter, PropertyApi, ReservationConfirmation,
};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use crate::shared::validation::ValidationUtils;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use validator::Validate;

/// Deposit authorization request as received from the payment form
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositAuthorizeRequest {
    #[validate(length(min = 1, max = 20))]
    pub reservation_id: String,
    #[validate(length(min = 12, max = 23))]
    pub card_number: String,
    #[validate(length(min = 5, max = 7))]
    pub expiration: String,
    #[validate(length(min = 3, max = 4))]
    pub card_code: String,
    #[validate(length(min = 1, max = 60))]
    pub first_name: String,
    #[validate(length(min = 1, max = 60))]
    pub last_name: String,
}

impl std::fmt::Debug for DepositAuthorizeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits: String = self
            .card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let start = digits.len().saturating_sub(4);
        f.debug_struct("DepositAuthorizeRequest")
            .field("reservation_id", &self.reservation_id)
            .field("card_number", &format!("****{}", &digits[start..]))
            .field("expiration", &"**/**")
            .field("card_code", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Result of a completed deposit authorization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAuthorizeResponse {
    pub transaction_id: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_number: Option<String>,
}

pub struct DepositService {
    config: Arc<AppConfig>,
    property_api: Arc<dyn PropertyApi>,
    gateway: Arc<dyn CardGateway>,
    attempts: Arc<AttemptStore>,
    metrics: Arc<MetricsService>,
    monitoring: Arc<MonitoringAdapter>,
    verify_limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl DepositService {
    pub fn new(
        config: Arc<AppConfig>,
        property_api: Arc<dyn PropertyApi>,
        gateway: Arc<dyn CardGateway>,
        attempts: Arc<AttemptStore>,
        metrics: Arc<MetricsService>,
        monitoring: Arc<MonitoringAdapter>,
    ) -> Self {
        let per_minute = NonZeroU32::new(config.rate_limit.verification_attempts_per_minute)
            .unwrap_or(NonZeroU32::MIN);
        Self {
            config,
            property_api,
            gateway,
            attempts,
            metrics,
            monitoring,
            verify_limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
        }
    }

    /// Verify the deposit for a reservation from a fresh upstream fetch.
    ///
    /// The deposit is 5% of the first non-null gross/total/balance amount.
    /// An unreadable or non-positive total is a verification failure, not a
    /// zero-amount success.
    pub async fn verify_deposit(&self, reservation_id: &str) -> AppResult<VerifiedDeposit> {
        ValidationUtils::validate_reservation_id(reservation_id)?;
        self.check_verification_quota(reservation_id)?;

        let raw = self.property_api.fetch_reservation(reservation_id).await?;
        let record = ReservationRecord::from_upstream(reservation_id, &raw);

        let total = record.total.ok_or_else(|| {
            AppError::Verification(format!(
                "reservation {} carries no usable total",
                reservation_id
            ))
        })?;

        if total <= Decimal::ZERO {
            return Err(AppError::Verification(format!(
                "reservation {} total {} is not chargeable",
                reservation_id, total
            )));
        }

        let deposit_amount = match record.deposit_amount() {
            Some(amount) => amount,
            None => {
                return Err(AppError::Verification(format!(
                    "reservation {} deposit could not be derived",
                    reservation_id
                )))
            }
        };

        info!(
            reservation_id = %reservation_id,
            total = %total,
            deposit_amount = %deposit_amount,
            "Deposit verified"
        );
        self.metrics.record_verification();

        Ok(VerifiedDeposit {
            reservation_id: reservation_id.to_string(),
            deposit_amount,
            total,
            currency: record
                .currency
                .unwrap_or_else(|| self.config.pricing.default_currency.clone()),
            dates: StayDates {
                from_date: record.from_date,
                to_date: record.to_date,
            },
        })
    }

    /// Run the full deposit payment: re-verify, charge the card at the
    /// verified amount, confirm the reservation upstream, and void the
    /// charge if the confirmation fails.
    pub async fn authorize_deposit(
        &self,
        request: &DepositAuthorizeRequest,
        client_ip: Option<String>,
    ) -> AppResult<DepositAuthorizeResponse> {
        request
            .validate()
            .map_err(|e| AppError::Validation(format!("invalid payment request: {}", e)))?;
        ValidationUtils::validate_reservation_id(&request.reservation_id)?;
        ValidationUtils::validate_card_number(&request.card_number)?;
        ValidationUtils::validate_card_expiry(&request.expiration)?;
        ValidationUtils::validate_card_code(&request.card_code)?;

        // One payment per reservation at a time; the lease releases when
        // this call returns by any path.
        let _lease =
            AttemptStore::lease(&self.attempts, &request.reservation_id).map_err(|err| {
                LoggingUtils::log_security_event(
                    "duplicate_payment_attempt",
                    "concurrent deposit authorization for the same reservation",
                    client_ip.as_deref().unwrap_or("unknown"),
                );
                err
            })?;

        let mut attempt =
            PaymentAttempt::new(&request.reservation_id, Decimal::ZERO, client_ip);
        self.attempts.record(&attempt);
        LoggingUtils::log_payment_event(&request.reservation_id, attempt.phase.as_str(), None);

        let verified = match self.verify_deposit(&request.reservation_id).await {
            Ok(verified) => verified,
            Err(err) => {
                attempt.transition(PaymentPhase::VerificationFailed);
                self.attempts.record(&attempt);
                return Err(err);
            }
        };

        attempt.amount = verified.deposit_amount;
        attempt.transition(PaymentPhase::Verified);
        self.attempts.record(&attempt);

        let card = CardDetails {
            card_number: request.card_number.clone(),
            expiration: request.expiration.clone(),
            card_code: request.card_code.clone(),
            cardholder_first_name: request.first_name.clone(),
            cardholder_last_name: request.last_name.clone(),
        };

        // Single attempt, never retried
        let authorization = match self
            .gateway
            .authorize(verified.deposit_amount, &card, &request.reservation_id)
            .await
        {
            Ok(authorization) => authorization,
            Err(err) => {
                attempt.transition(PaymentPhase::AuthFailed);
                self.attempts.record(&attempt);
                if matches!(err, AppError::GatewayDeclined(_)) {
                    self.metrics.record_decline();
                    self.monitoring.record_decline();
                }
                LoggingUtils::log_payment_event(
                    &request.reservation_id,
                    attempt.phase.as_str(),
                    None,
                );
                return Err(err);
            }
        };

        attempt.transaction_id = Some(authorization.transaction_id.clone());
        attempt.transition(PaymentPhase::Authorized);
        self.attempts.record(&attempt);
        self.metrics.record_authorization();
        self.monitoring.record_authorization();
        LoggingUtils::log_payment_event(
            &request.reservation_id,
            attempt.phase.as_str(),
            Some(&authorization.transaction_id),
        );

        let confirmation = ReservationConfirmation {
            reservation_id: request.reservation_id.clone(),
            transaction_id: authorization.transaction_id.clone(),
            amount: verified.deposit_amount,
        };

        match self.property_api.confirm_reservation(&confirmation).await {
            Ok(body) => {
                attempt.transition(PaymentPhase::Booked);
                self.attempts.record(&attempt);
                LoggingUtils::log_payment_event(
                    &request.reservation_id,
                    attempt.phase.as_str(),
                    Some(&authorization.transaction_id),
                );

                Ok(DepositAuthorizeResponse {
                    transaction_id: authorization.transaction_id,
                    amount: verified.deposit_amount,
                    currency: verified.currency,
                    reservation_number: booking_reference(&body),
                })
            }
            Err(err) => {
                self.compensate(&mut attempt, &authorization.transaction_id).await;
                Err(AppError::DownstreamBooking(format!(
                    "reservation confirmation failed after charge: {}",
                    err
                )))
            }
        }
    }

    /// Void the charged transaction after a failed confirmation. Exactly one
    /// attempt; the outcome is recorded and logged but never surfaced to the
    /// guest, who sees the booking failure.
    async fn compensate(&self, attempt: &mut PaymentAttempt, transaction_id: &str) {
        attempt.transition(PaymentPhase::Voiding);
        self.attempts.record(attempt);
        self.monitoring.record_void();

        match self.gateway.void(transaction_id).await {
            Ok(()) => {
                attempt.transition(PaymentPhase::Voided);
                self.metrics.record_void(true);
                info!(
                    reservation_id = %attempt.reservation_id,
                    transaction_id = %transaction_id,
                    "Charge voided after booking failure"
                );
            }
            Err(void_err) => {
                attempt.transition(PaymentPhase::VoidFailed);
                self.metrics.record_void(false);
                error!(
                    reservation_id = %attempt.reservation_id,
                    transaction_id = %transaction_id,
                    error = %void_err,
                    "Void failed after booking failure; transaction needs manual review"
                );
            }
        }
        self.attempts.record(attempt);
        LoggingUtils::log_payment_event(
            &attempt.reservation_id,
            attempt.phase.as_str(),
            Some(transaction_id),
        );
    }

    /// Bounded verification attempts per reservation per minute
    fn check_verification_quota(&self, reservation_id: &str) -> AppResult<()> {
        if !self.config.rate_limit.enabled {
            return Ok(());
        }

        match self.verify_limiter.check_key(&reservation_id.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let retry_after_seconds =
                    not_until.wait_time_from(self.clock.now()).as_secs().max(1);
                LoggingUtils::log_rate_limit(reservation_id, "verification");
                Err(AppError::RateLimited { retry_after_seconds })
            }
        }
    }

    /// Drop throttle state for reservations that have gone quiet
    pub fn sweep_throttle(&self) {
        self.verify_limiter.retain_recent();
    }
}

/// The confirmation payload identifies the booking as `reservation_number`
/// or, in older responses, plain `id`
fn booking_reference(body: &Value) -> Option<String> {
    body.get("reservation_number")
        .or_else(|| body.get("id"))
        .and_then(|value| match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
}
