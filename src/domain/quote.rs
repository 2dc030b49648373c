//! Quote reconciliation domain logic
//!
//! Upstream quote payloads vary in shape between API versions and property
//! configurations. This module normalizes them into a single canonical
//! breakdown through ordered field-resolution lists. Pure logic, no I/O.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed cleaning fee charged per stay. Business rule: this overrides any
/// cleaning line the upstream itemization carries.
pub const CLEANING_FEE: Decimal = dec!(100);

/// Combined lodging tax rate, applied to nightly charge plus cleaning fee only
pub const TAX_RATE: Decimal = dec!(0.135);

/// Deposit fraction of the pre-tax subtotal collected at booking time
pub const DEPOSIT_RATE: Decimal = dec!(0.05);

/// Nightly-charge source fields, in resolution order
const NIGHTLY_FIELDS: [&str; 4] = [
    "reservation_net",
    "base_rate",
    "discounted_rent_rental_charges",
    "net",
];

/// Total-fees source fields, in resolution order
const FEES_FIELDS: [&str; 3] = ["fees", "total_fees", "fees_net"];

/// Direct discount-total source fields, in resolution order
const DISCOUNT_TOTAL_FIELDS: [&str; 3] = ["discounts_total", "discount_total", "total_discount"];

/// Title keywords identifying a pet charge in an itemized fee list
const PET_FEE_KEYWORDS: [&str; 4] = ["pet", "animal", "dog", "cat"];

/// Raw quote payload as returned by the property-management API
#[derive(Debug, Clone)]
pub struct UpstreamQuote(Value);

impl UpstreamQuote {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Whether the payload is a JSON object we can resolve fields from
    pub fn is_usable(&self) -> bool {
        self.0.is_object()
    }

    /// First field in `fields` that parses as an amount
    fn first_amount(&self, fields: &[&str]) -> Option<Decimal> {
        fields.iter().find_map(|field| self.amount_at(field))
    }

    /// Parse a single field as an amount, if present
    fn amount_at(&self, field: &str) -> Option<Decimal> {
        self.0.get(field).and_then(parse_amount)
    }

    /// Total fees across the resolution ladder. Informational in the
    /// breakdown; also the basis for the with-pets/without-pets delta.
    pub fn fees_total(&self) -> Decimal {
        self.first_amount(&FEES_FIELDS).unwrap_or(Decimal::ZERO)
    }

    /// The itemized fee list, when `fees` is an array of line objects.
    /// Malformed entries are skipped.
    pub fn fee_items(&self) -> Vec<FeeItem> {
        let items = match self.0.get("fees").and_then(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        };

        items
            .iter()
            .filter_map(|item| {
                let obj = item.as_object()?;
                let title = obj
                    .get("title")
                    .or_else(|| obj.get("name"))
                    .and_then(Value::as_str)?
                    .to_string();
                let amount = ["amount", "value", "total"]
                    .iter()
                    .find_map(|field| obj.get(*field).and_then(parse_amount))?;
                Some(FeeItem { title, amount })
            })
            .collect()
    }
}

impl From<Value> for UpstreamQuote {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

/// One line of an itemized upstream fee list
#[derive(Debug, Clone, PartialEq)]
pub struct FeeItem {
    pub title: String,
    pub amount: Decimal,
}

/// Caller-known stay parameters
#[derive(Debug, Clone)]
pub struct StayParams {
    pub nights: u32,
    pub pet_count: u32,
    /// Fees-total of a with-pets quote minus a without-pets quote, when the
    /// caller was able to fetch both. Preferred over scanning fee lines.
    pub pet_fee_delta: Option<Decimal>,
}

/// Canonical guest-facing price breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub nightly_charge: Decimal,
    pub nights: u32,
    pub cleaning_fee: Decimal,
    /// Present only when the stay includes pets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_fee: Option<Decimal>,
    pub discount: Decimal,
    pub total_fees: Decimal,
    pub tax_base: Decimal,
    pub tax_amount: Decimal,
    pub subtotal: Decimal,
    pub grand_total: Decimal,
    pub booking_amount: Decimal,
}

impl QuoteBreakdown {
    /// Sentinel for unreadable upstream payloads. Callers render a
    /// "no quote available" state from the all-zero money fields.
    pub fn zeroed(nights: u32) -> Self {
        Self {
            nightly_charge: Decimal::ZERO,
            nights,
            cleaning_fee: Decimal::ZERO,
            pet_fee: None,
            discount: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            tax_base: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            booking_amount: Decimal::ZERO,
        }
    }

    /// Round every money field to cents for presentation. Reconciliation
    /// itself is exact; rounding happens once at the serving boundary.
    pub fn rounded(mut self) -> Self {
        self.nightly_charge = self.nightly_charge.round_dp(2);
        self.cleaning_fee = self.cleaning_fee.round_dp(2);
        self.pet_fee = self.pet_fee.map(|fee| fee.round_dp(2));
        self.discount = self.discount.round_dp(2);
        self.total_fees = self.total_fees.round_dp(2);
        self.tax_base = self.tax_base.round_dp(2);
        self.tax_amount = self.tax_amount.round_dp(2);
        self.subtotal = self.subtotal.round_dp(2);
        self.grand_total = self.grand_total.round_dp(2);
        self.booking_amount = self.booking_amount.round_dp(2);
        self
    }
}

/// Reconcile a raw upstream quote into the canonical breakdown.
///
/// Never fails: an unreadable payload yields the zeroed breakdown. The
/// subtotal and grand total are deliberately left unclamped, so an
/// oversized discount can drive them negative.
pub fn reconcile(raw: &UpstreamQuote, params: &StayParams) -> QuoteBreakdown {
    if !raw.is_usable() {
        return QuoteBreakdown::zeroed(params.nights);
    }

    let nightly_charge = raw.first_amount(&NIGHTLY_FIELDS).unwrap_or(Decimal::ZERO);
    let total_fees = raw.fees_total();
    let discount = resolve_discount(raw, nightly_charge);
    let pet_fee = resolve_pet_fee(raw, params);

    let tax_base = nightly_charge + CLEANING_FEE;
    let tax_amount = tax_base * TAX_RATE;
    let subtotal = nightly_charge + CLEANING_FEE + pet_fee.unwrap_or(Decimal::ZERO) - discount;
    let grand_total = subtotal + tax_amount;
    let booking_amount = subtotal * DEPOSIT_RATE;

    QuoteBreakdown {
        nightly_charge,
        nights: params.nights,
        cleaning_fee: CLEANING_FEE,
        pet_fee,
        discount,
        total_fees,
        tax_base,
        tax_amount,
        subtotal,
        grand_total,
        booking_amount,
    }
}

/// Resolve the discount amount. Direct totals are flat currency; the
/// `discounts` array and bare scalars go through percent-vs-flat
/// classification. As a last resort, a base rate above the discounted rent
/// implies the difference was already applied upstream.
fn resolve_discount(raw: &UpstreamQuote, nightly_charge: Decimal) -> Decimal {
    let resolved = if let Some(total) = raw.first_amount(&DISCOUNT_TOTAL_FIELDS) {
        total.abs()
    } else if let Some(items) = raw.0.get("discounts").and_then(Value::as_array) {
        items
            .iter()
            .filter_map(line_item_amount)
            .map(|value| classify_discount(value, nightly_charge))
            .sum()
    } else if let Some(scalar) = raw.amount_at("discounts") {
        classify_discount(scalar, nightly_charge)
    } else if let Some(scalar) = raw.amount_at("discount") {
        classify_discount(scalar, nightly_charge)
    } else {
        infer_applied_discount(raw)
    };

    resolved.max(Decimal::ZERO)
}

/// A magnitude in (1, 100] reads as a percentage of the nightly charge;
/// anything else reads as a flat currency amount. Upstream encodes
/// reductions with either sign, so only the magnitude matters.
fn classify_discount(value: Decimal, nightly_charge: Decimal) -> Decimal {
    let magnitude = value.abs();
    if magnitude > Decimal::ONE && magnitude <= dec!(100) {
        nightly_charge * magnitude / dec!(100)
    } else {
        magnitude
    }
}

/// Amount of one discount line: a bare number, or an object with an
/// amount-family field.
fn line_item_amount(item: &Value) -> Option<Decimal> {
    match item {
        Value::Number(_) | Value::String(_) => parse_amount(item),
        Value::Object(obj) => ["amount", "value", "total"]
            .iter()
            .find_map(|field| obj.get(*field).and_then(parse_amount)),
        _ => None,
    }
}

/// When the payload exposes both the base rate and the discounted rent and
/// the base is higher, the difference is the discount already applied.
fn infer_applied_discount(raw: &UpstreamQuote) -> Decimal {
    match (
        raw.amount_at("base_rate"),
        raw.amount_at("discounted_rent_rental_charges"),
    ) {
        (Some(base), Some(discounted)) if base > discounted => base - discounted,
        _ => Decimal::ZERO,
    }
}

/// Pet fee resolution. `None` for petless stays; otherwise the caller's
/// quote delta wins, then the first pet-keyword line in the itemized fees,
/// then zero.
fn resolve_pet_fee(raw: &UpstreamQuote, params: &StayParams) -> Option<Decimal> {
    if params.pet_count == 0 {
        return None;
    }

    if let Some(delta) = params.pet_fee_delta {
        return Some(delta.max(Decimal::ZERO));
    }

    let scanned = raw
        .fee_items()
        .into_iter()
        .find(|item| {
            let title = item.title.to_lowercase();
            PET_FEE_KEYWORDS.iter().any(|keyword| title.contains(keyword))
        })
        .map(|item| item.amount.max(Decimal::ZERO));

    Some(scanned.unwrap_or(Decimal::ZERO))
}

/// Parse a JSON value as a money amount. Upstream sends numbers and
/// formatted strings interchangeably.
pub(crate) fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => number.to_string().parse().ok(),
        Value::String(text) => {
            let cleaned = text.trim().trim_start_matches('$').replace(',', "");
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse().ok()
            }
        }
        _ => None,
    }
}
