//! Common validation utilities for request DTOs.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Phone numbers: optional leading +, then 7-15 digits.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

/// Validates a phone number field.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be 7-15 digits, optionally prefixed with +".into());
        Err(err)
    }
}

/// Validates a ticket quantity (0..=10 per type in one booking attempt).
pub fn validate_ticket_quantity(qty: i32) -> Result<(), ValidationError> {
    if (0..=10).contains(&qty) {
        Ok(())
    } else {
        let mut err = ValidationError::new("quantity_range");
        err.message = Some("Quantity must be between 0 and 10".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_plain_digits() {
        assert!(validate_phone("9876543210").is_ok());
    }

    #[test]
    fn test_validate_phone_with_plus() {
        assert!(validate_phone("+919876543210").is_ok());
    }

    #[test]
    fn test_validate_phone_too_short() {
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_validate_phone_too_long() {
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_phone_letters() {
        assert!(validate_phone("98765abc10").is_err());
    }

    #[test]
    fn test_validate_phone_empty() {
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_validate_ticket_quantity_bounds() {
        assert!(validate_ticket_quantity(0).is_ok());
        assert!(validate_ticket_quantity(10).is_ok());
        assert!(validate_ticket_quantity(11).is_err());
        assert!(validate_ticket_quantity(-1).is_err());
    }
}
