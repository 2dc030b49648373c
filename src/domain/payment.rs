//! Payment domain models and types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a deposit payment attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPhase {
    Verifying,
    Verified,
    VerificationFailed,
    Authorized,
    AuthFailed,
    Booked,
    Voiding,
    Voided,
    VoidFailed,
}

impl PaymentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPhase::Verifying => "verifying",
            PaymentPhase::Verified => "verified",
            PaymentPhase::VerificationFailed => "verification_failed",
            PaymentPhase::Authorized => "authorized",
            PaymentPhase::AuthFailed => "auth_failed",
            PaymentPhase::Booked => "booked",
            PaymentPhase::Voiding => "voiding",
            PaymentPhase::Voided => "voided",
            PaymentPhase::VoidFailed => "void_failed",
        }
    }

    /// Whether the attempt has reached a final phase
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentPhase::VerificationFailed
                | PaymentPhase::AuthFailed
                | PaymentPhase::Booked
                | PaymentPhase::Voided
                | PaymentPhase::VoidFailed
        )
    }
}

/// One deposit payment attempt, tracked from verification to its terminal
/// phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAttempt {
    pub attempt_id: String,
    pub reservation_id: String,
    /// Server-verified deposit amount. Never taken from the client.
    pub amount: Decimal,
    pub phase: PaymentPhase,
    /// Gateway transaction id, set once authorization succeeds
    pub transaction_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub client_ip: Option<String>,
}

impl PaymentAttempt {
    pub fn new(reservation_id: &str, amount: Decimal, client_ip: Option<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            attempt_id: uuid::Uuid::new_v4().to_string(),
            reservation_id: reservation_id.to_string(),
            amount,
            phase: PaymentPhase::Verifying,
            transaction_id: None,
            created_at: now,
            updated_at: now,
            client_ip,
        }
    }

    pub fn transition(&mut self, phase: PaymentPhase) {
        self.phase = phase;
        self.updated_at = chrono::Utc::now();
    }
}

/// Card details accepted at the authorization endpoint. The gateway is the
/// only consumer; `Debug` masks everything so attempts can be logged freely.
#[derive(Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub card_number: String,
    /// MM/YY or MM/YYYY
    pub expiration: String,
    pub card_code: String,
    pub cardholder_first_name: String,
    pub cardholder_last_name: String,
}

impl CardDetails {
    /// Digits only, for the gateway payload
    pub fn normalized_number(&self) -> String {
        self.card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    }

    /// Last four digits, the only part of the number safe to echo
    pub fn last_four(&self) -> String {
        let digits = self.normalized_number();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &format!("****{}", self.last_four()))
            .field("expiration", &"**/**")
            .field("card_code", &"***")
            .field("cardholder_first_name", &self.cardholder_first_name)
            .field("cardholder_last_name", &self.cardholder_last_name)
            .finish()
    }
}
