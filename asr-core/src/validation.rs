//! Field and form validation.
//!
//! Field checks run on every autosave; the full form check runs only before
//! submission. A failing form check blocks submission and nothing else.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::calculations::CapStatus;
use crate::calculations::common::parse_amount;
use crate::models::{AmountField, FieldUpdate, FormValues, TextField};

/// Digits with optional `+` prefix and common separators.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().\-]{7,20}$").expect("phone regex is valid"));

const MIN_PHONE_DIGITS: usize = 7;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum FieldErrorKind {
    #[error("must be a number")]
    InvalidAmount,

    #[error("must not be negative")]
    Negative,

    #[error("exceeds the maximum of {max}")]
    ExceedsMaximum { max: Decimal },

    #[error("is required")]
    Required,

    #[error("is not a valid phone number")]
    InvalidPhone,

    #[error("is not a valid email address")]
    InvalidEmail,

    #[error("is required when the request exceeds the salary cap")]
    ExplanationRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire key of the offending field.
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}", self.field, self.kind)
    }
}

/// All errors found in a form, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

pub(crate) fn check_amount(
    field: AmountField,
    raw: &str,
) -> Option<FieldErrorKind> {
    let amount = match parse_amount(raw) {
        Ok(amount) => amount,
        Err(_) => return Some(FieldErrorKind::InvalidAmount),
    };
    if amount < Decimal::ZERO {
        return Some(FieldErrorKind::Negative);
    }
    match field.config().max {
        Some(max) if amount > max => Some(FieldErrorKind::ExceedsMaximum { max }),
        _ => None,
    }
}

/// Format-only check for text; blank text is accepted here.
fn check_text(
    field: TextField,
    value: &str,
) -> Option<FieldErrorKind> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match field {
        TextField::PhoneNumber
            if !PHONE_REGEX.is_match(value)
                || value.chars().filter(char::is_ascii_digit).count() < MIN_PHONE_DIGITS =>
        {
            Some(FieldErrorKind::InvalidPhone)
        }
        TextField::EmailAddress if !EMAIL_REGEX.is_match(value) => {
            Some(FieldErrorKind::InvalidEmail)
        }
        _ => None,
    }
}

/// Validates one change before it is autosaved.
pub fn validate_field(update: &FieldUpdate) -> Result<(), FieldError> {
    let kind = match update {
        FieldUpdate::Amount(field, raw) => check_amount(*field, raw),
        FieldUpdate::Text(field, value) => check_text(*field, value),
        FieldUpdate::Election(..) => None,
    };
    match kind {
        Some(kind) => Err(FieldError {
            field: update.key(),
            kind,
        }),
        None => Ok(()),
    }
}

/// Validates the whole form for submission.
///
/// Phone and email are required. An explanation in `additionalInfo` is
/// required whenever `cap_status` exceeds the cap.
pub fn validate_form(
    values: &FormValues,
    cap_status: CapStatus,
) -> ValidationReport {
    let mut errors = Vec::new();

    for (field, raw) in values.amounts() {
        if let Some(kind) = check_amount(field, raw) {
            errors.push(FieldError {
                field: field.key(),
                kind,
            });
        }
    }

    for field in [TextField::PhoneNumber, TextField::EmailAddress] {
        let value = values.text(field);
        let kind = if value.trim().is_empty() {
            Some(FieldErrorKind::Required)
        } else {
            check_text(field, value)
        };
        if let Some(kind) = kind {
            errors.push(FieldError {
                field: field.key(),
                kind,
            });
        }
    }

    if cap_status.exceeds_cap() && values.text(TextField::AdditionalInfo).trim().is_empty() {
        errors.push(FieldError {
            field: TextField::AdditionalInfo.key(),
            kind: FieldErrorKind::ExplanationRequired,
        });
    }

    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Election;

    fn complete_values() -> FormValues {
        let mut values = FormValues::new();
        values.set_amount(AmountField::Adoption, "2000");
        values.set_text(TextField::PhoneNumber, "(555) 123-4567");
        values.set_text(TextField::EmailAddress, "staff@example.org");
        values
    }

    // =========================================================================
    // validate_field tests
    // =========================================================================

    #[test]
    fn valid_amount_passes() {
        let update = FieldUpdate::Amount(AmountField::Adoption, "15,000".to_string());

        assert_eq!(validate_field(&update), Ok(()));
    }

    #[test]
    fn amount_over_maximum_is_rejected() {
        let update = FieldUpdate::Amount(AmountField::Adoption, "15000.01".to_string());

        assert_eq!(
            validate_field(&update),
            Err(FieldError {
                field: "adoption",
                kind: FieldErrorKind::ExceedsMaximum { max: dec!(15000) },
            })
        );
    }

    #[test]
    fn uncapped_amount_accepts_large_values() {
        let update = FieldUpdate::Amount(AmountField::Seminary, "999999".to_string());

        assert_eq!(validate_field(&update), Ok(()));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let update = FieldUpdate::Amount(AmountField::Seminary, "-1".to_string());

        assert_eq!(validate_field(&update).unwrap_err().kind, FieldErrorKind::Negative);
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let update = FieldUpdate::Amount(AmountField::Seminary, "12a".to_string());

        assert_eq!(
            validate_field(&update).unwrap_err().kind,
            FieldErrorKind::InvalidAmount
        );
    }

    #[test]
    fn blank_text_is_accepted_on_autosave() {
        let update = FieldUpdate::Text(TextField::PhoneNumber, String::new());

        assert_eq!(validate_field(&update), Ok(()));
    }

    #[test]
    fn malformed_phone_and_email_are_rejected() {
        let phone = FieldUpdate::Text(TextField::PhoneNumber, "call me".to_string());
        let email = FieldUpdate::Text(TextField::EmailAddress, "staff@".to_string());

        assert_eq!(validate_field(&phone).unwrap_err().kind, FieldErrorKind::InvalidPhone);
        assert_eq!(validate_field(&email).unwrap_err().kind, FieldErrorKind::InvalidEmail);
    }

    #[test]
    fn international_phone_is_accepted() {
        let update = FieldUpdate::Text(TextField::PhoneNumber, "+44 20 7946 0958".to_string());

        assert_eq!(validate_field(&update), Ok(()));
    }

    #[test]
    fn elections_always_pass() {
        let update = FieldUpdate::Election(Election::DeductRothPercent, true);

        assert_eq!(validate_field(&update), Ok(()));
    }

    // =========================================================================
    // validate_form tests
    // =========================================================================

    #[test]
    fn complete_form_under_cap_is_valid() {
        let report = validate_form(&complete_values(), CapStatus::UnderCap);

        assert!(report.is_valid(), "unexpected errors: {report}");
    }

    #[test]
    fn missing_contact_details_are_required() {
        let report = validate_form(&FormValues::new(), CapStatus::UnderCap);

        assert_eq!(
            report.errors,
            vec![
                FieldError {
                    field: "phoneNumber",
                    kind: FieldErrorKind::Required,
                },
                FieldError {
                    field: "emailAddress",
                    kind: FieldErrorKind::Required,
                },
            ]
        );
    }

    #[test]
    fn explanation_required_over_cap() {
        let report = validate_form(&complete_values(), CapStatus::ExceedsCapSingle);

        assert_eq!(
            report
                .errors
                .iter()
                .find(|error| error.field == "additionalInfo")
                .map(|error| &error.kind),
            Some(&FieldErrorKind::ExplanationRequired)
        );

        let mut explained = complete_values();
        explained.set_text(TextField::AdditionalInfo, "Adoption costs this year");
        assert!(validate_form(&explained, CapStatus::ExceedsCapSingle).is_valid());
    }

    #[test]
    fn form_report_collects_every_amount_error() {
        let mut values = complete_values();
        values.set_amount(AmountField::HousingDownPayment, "60000");
        values.set_amount(AmountField::Seminary, "-5");

        let report = validate_form(&values, CapStatus::UnderCap);

        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].field, "seminary");
        assert_eq!(report.errors[1].field, "housingDownPayment");
    }
}
