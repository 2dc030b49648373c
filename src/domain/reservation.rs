//! Reservation domain models
//!
//! Reservation records live upstream; this module parses the fields the
//! deposit flow needs and owns the deposit-amount rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::quote::{parse_amount, DEPOSIT_RATE};

/// Total-amount source fields on the upstream record, in resolution order
const TOTAL_FIELDS: [&str; 3] = ["gross", "total", "balance"];

/// Reservation record as fetched fresh from the property-management API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// First non-null of the gross/total/balance family
    pub total: Option<Decimal>,
    pub currency: Option<String>,
}

impl ReservationRecord {
    /// Parse the fields we need out of a raw upstream payload
    pub fn from_upstream(id: &str, raw: &Value) -> Self {
        let total = TOTAL_FIELDS
            .iter()
            .find_map(|field| raw.get(*field).and_then(parse_amount));

        Self {
            id: id.to_string(),
            from_date: parse_date(raw, "from_date"),
            to_date: parse_date(raw, "to_date"),
            total,
            currency: raw
                .get("currency")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// The deposit due for this reservation: 5% of the total, in cents.
    /// `None` when the record carries no usable total.
    pub fn deposit_amount(&self) -> Option<Decimal> {
        self.total.map(|total| (total * DEPOSIT_RATE).round_dp(2))
    }
}

/// Stay window reported back to the payment UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayDates {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// Deposit details confirmed against a fresh reservation fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDeposit {
    pub reservation_id: String,
    pub deposit_amount: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub dates: StayDates,
}

fn parse_date(raw: &Value, field: &str) -> Option<NaiveDate> {
    raw.get(field)
        .and_then(Value::as_str)
        .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
}
