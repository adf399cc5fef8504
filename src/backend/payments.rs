//! Payment methods: listing, the new-card form, and issuer detection.
//!
//! Form validation runs client-side before any network call; failures are
//! surfaced inline per field. Card classification is by issuer prefix and
//! anything unrecognized is treated as a plain debit card.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::ApiError;

use super::{coerce_array, Backend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Debit,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn issuer_patterns() -> &'static [(CardType, Regex)] {
    static PATTERNS: OnceLock<Vec<(CardType, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (CardType::Visa, Regex::new(r"^4\d{12}(?:\d{3})?$").unwrap()),
            (CardType::Mastercard, Regex::new(r"^5[1-5]\d{14}$").unwrap()),
            (CardType::Amex, Regex::new(r"^3[47]\d{13}$").unwrap()),
            (
                CardType::Discover,
                Regex::new(r"^6(?:011|5\d{2})\d{12}$").unwrap(),
            ),
        ]
    })
}

/// Classify a card number by issuer prefix. Spaces and hyphens are
/// ignored; any number that matches no known issuer is "debit".
pub fn detect_card_type(number: &str) -> CardType {
    let digits: String = number.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    for (card_type, pattern) in issuer_patterns() {
        if pattern.is_match(&digits) {
            return *card_type;
        }
    }
    CardType::Debit
}

/// A stored payment method as the backend returns it (masked).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(alias = "payment_id", default)]
    pub id: Option<i64>,
    #[serde(alias = "cardType")]
    pub card_type: CardType,
    /// Last four digits only.
    #[serde(alias = "lastFour")]
    pub last_four: String,
    #[serde(alias = "expiry", default)]
    pub expires: Option<String>,
}

/// New-card form as filled in by the user.
#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub card_number: String,
    pub holder_name: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: String,
}

impl NewPaymentMethod {
    /// Pre-submit validation; short-circuits before any network call.
    pub fn validate(&self) -> Result<(), ApiError> {
        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::validation("card_number", "must be digits"));
        }
        if !(12..=19).contains(&digits.len()) {
            return Err(ApiError::validation("card_number", "invalid length"));
        }
        if self.holder_name.trim().is_empty() {
            return Err(ApiError::validation("holder_name", "required"));
        }
        if !(1..=12).contains(&self.expiry_month) {
            return Err(ApiError::validation("expiry_month", "must be 1-12"));
        }
        if !(2000..=2099).contains(&self.expiry_year) {
            return Err(ApiError::validation("expiry_year", "must be a four-digit year"));
        }
        if !(self.cvv.len() == 3 || self.cvv.len() == 4)
            || !self.cvv.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ApiError::validation("cvv", "must be 3 or 4 digits"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct NewPaymentMethodWire<'a> {
    card_number: &'a str,
    holder_name: &'a str,
    expiry_month: u8,
    expiry_year: u16,
    cvv: &'a str,
    card_type: CardType,
}

impl Backend {
    pub async fn list_payment_methods(&self, uid: i64) -> Result<Vec<PaymentMethod>, ApiError> {
        let body = self.get_envelope(&format!("/payment/{uid}")).await?;
        Ok(coerce_array(
            body.get("payment_methods").or_else(|| body.get("data")),
        ))
    }

    pub async fn add_payment_method(
        &self,
        uid: i64,
        form: &NewPaymentMethod,
    ) -> Result<(), ApiError> {
        form.validate()?;
        let wire = NewPaymentMethodWire {
            card_number: &form.card_number,
            holder_name: &form.holder_name,
            expiry_month: form.expiry_month,
            expiry_year: form.expiry_year,
            cvv: &form.cvv,
            card_type: detect_card_type(&form.card_number),
        };
        self.post_envelope(&format!("/payment/new/{uid}"), &wire)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewPaymentMethod {
        NewPaymentMethod {
            card_number: "4111111111111111".to_string(),
            holder_name: "Dana Reyes".to_string(),
            expiry_month: 9,
            expiry_year: 2027,
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_detect_known_issuers() {
        assert_eq!(detect_card_type("4111111111111111"), CardType::Visa);
        assert_eq!(detect_card_type("5500000000000004"), CardType::Mastercard);
        assert_eq!(detect_card_type("340000000000009"), CardType::Amex);
        assert_eq!(detect_card_type("6011000000000004"), CardType::Discover);
    }

    #[test]
    fn test_unmatched_number_is_debit() {
        assert_eq!(detect_card_type("9999999999999999"), CardType::Debit);
        assert_eq!(detect_card_type("1234"), CardType::Debit);
    }

    #[test]
    fn test_detection_ignores_separators() {
        assert_eq!(detect_card_type("4111 1111 1111 1111"), CardType::Visa);
        assert_eq!(detect_card_type("5500-0000-0000-0004"), CardType::Mastercard);
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_validation_flags_offending_field() {
        let mut bad = form();
        bad.expiry_month = 13;
        match bad.validate() {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field, "expiry_month"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut bad = form();
        bad.cvv = "12".to_string();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.holder_name = "  ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_card_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CardType::Mastercard).unwrap(),
            "\"mastercard\""
        );
    }
}
