//! Validation utilities module
//!
//! This module provides common validation functionality used across the application.

use chrono::NaiveDate;
use crate::shared::error::AppError;

/// Validation utilities for the application
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate a reservation identifier (upstream uses numeric ids)
    pub fn validate_reservation_id(id: &str) -> crate::Result<()> {
        if id.is_empty() {
            return Err(AppError::Validation(
                "Reservation id cannot be empty".to_string()
            ));
        }

        if id.len() > 20 {
            return Err(AppError::Validation(
                "Reservation id too long (max 20 characters)".to_string()
            ));
        }

        if !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "Reservation id must be numeric".to_string()
            ));
        }

        Ok(())
    }

    /// Parse a stay date in ISO `YYYY-MM-DD` form
    pub fn parse_stay_date(field: &str, value: &str) -> crate::Result<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!(
                "{} must be a date in YYYY-MM-DD format", field
            ))
        })
    }

    /// Validate a check-in/check-out pair and return the stay length in nights
    pub fn validate_stay_range(from: NaiveDate, to: NaiveDate) -> crate::Result<u32> {
        let nights = (to - from).num_days();
        if nights <= 0 {
            return Err(AppError::Validation(
                "Check-out date must be after check-in date".to_string()
            ));
        }
        Ok(nights as u32)
    }

    /// Validate a card number's format. Digits only, 12 to 19 of them;
    /// the gateway performs the real account validation.
    pub fn validate_card_number(card_number: &str) -> crate::Result<()> {
        let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.is_empty() {
            return Err(AppError::Validation(
                "Card number cannot be empty".to_string()
            ));
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "Card number must contain only digits".to_string()
            ));
        }

        if digits.len() < 12 || digits.len() > 19 {
            return Err(AppError::Validation(
                "Card number length is invalid".to_string()
            ));
        }

        Ok(())
    }

    /// Validate a card expiration in `MM/YY` or `MM/YYYY` form
    pub fn validate_card_expiry(expiry: &str) -> crate::Result<()> {
        let parts: Vec<&str> = expiry.split('/').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "Expiration must be in MM/YY format".to_string()
            ));
        }

        let month: u32 = parts[0].parse().map_err(|_| {
            AppError::Validation("Expiration month is invalid".to_string())
        })?;
        if month < 1 || month > 12 {
            return Err(AppError::Validation(
                "Expiration month is invalid".to_string()
            ));
        }

        let year_part = parts[1];
        if (year_part.len() != 2 && year_part.len() != 4)
            || !year_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AppError::Validation(
                "Expiration year is invalid".to_string()
            ));
        }

        Ok(())
    }

    /// Validate a card security code (3 or 4 digits)
    pub fn validate_card_code(code: &str) -> crate::Result<()> {
        if code.len() < 3 || code.len() > 4 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(
                "Card security code is invalid".to_string()
            ));
        }
        Ok(())
    }

    /// Validate client IP address
    pub fn validate_client_ip(ip: &str) -> crate::Result<()> {
        if ip.is_empty() {
            return Err(AppError::Validation(
                "Client IP cannot be empty".to_string()
            ));
        }

        if ip.len() > 45 {
            return Err(AppError::Validation(
                "Client IP too long".to_string()
            ));
        }

        // Basic IP format validation
        if !ip.contains('.') && !ip.contains(':') {
            return Err(AppError::Validation(
                "Invalid IP address format".to_string()
            ));
        }

        Ok(())
    }

    /// Validate user agent
    pub fn validate_user_agent(user_agent: &str) -> crate::Result<()> {
        if user_agent.len() > 500 {
            return Err(AppError::Validation(
                "User agent too long (max 500 characters)".to_string()
            ));
        }

        Ok(())
    }
}
