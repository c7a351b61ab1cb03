use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::parse_amount;
use crate::models::{AmountField, FormValues};

/// Errors raised while deriving figures from form values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A currency field holds text that is not a number.
    #[error("{} is not a valid amount: '{value}'", field.key())]
    InvalidAmount { field: AmountField, value: String },
}

/// Parses one amount field of the form.
pub(crate) fn amount_of(
    values: &FormValues,
    field: AmountField,
) -> Result<Decimal, CalculationError> {
    let raw = values.amount(field);
    parse_amount(raw).map_err(|_| CalculationError::InvalidAmount {
        field,
        value: raw.to_string(),
    })
}

/// Sums every currency field of the form.
///
/// Elections and text fields never contribute. Blank fields count as zero.
/// The first non-numeric field aborts the sum with
/// [`CalculationError::InvalidAmount`] rather than producing a meaningless
/// total.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use asr_core::calculations::get_total;
/// use asr_core::models::{AmountField, FormValues};
///
/// let mut values = FormValues::new();
/// values.set_amount(AmountField::AdditionalSalaryWithinMax, "5000");
/// values.set_amount(AmountField::Adoption, "2000");
/// values.set_amount(AmountField::CounselingNonMedical, "3000");
///
/// assert_eq!(get_total(&values), Ok(dec!(10000)));
/// ```
pub fn get_total(values: &FormValues) -> Result<Decimal, CalculationError> {
    let total = AmountField::ALL
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, field| {
            amount_of(values, field).map(|amount| sum + amount)
        })?;

    debug!(%total, "computed total salary request");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Election, TextField};

    fn scenario_values() -> FormValues {
        let mut values = FormValues::new();
        values.set_amount(AmountField::AdditionalSalaryWithinMax, "5000");
        values.set_amount(AmountField::Adoption, "2000");
        values.set_amount(AmountField::CounselingNonMedical, "3000");
        values
    }

    #[test]
    fn total_of_fresh_form_is_zero() {
        assert_eq!(get_total(&FormValues::new()), Ok(Decimal::ZERO));
    }

    #[test]
    fn total_sums_requested_categories() {
        assert_eq!(get_total(&scenario_values()), Ok(dec!(10000)));
    }

    #[test]
    fn total_treats_blank_fields_as_zero() {
        let mut values = scenario_values();
        values.set_amount(AmountField::Adoption, "");

        assert_eq!(get_total(&values), Ok(dec!(8000)));
    }

    #[test]
    fn total_ignores_elections_and_text() {
        let mut values = scenario_values();
        values.set_election(Election::DeductTaxDeferredPercent, true);
        values.set_text(TextField::PhoneNumber, "5551234567");
        values.set_text(TextField::AdditionalInfo, "42");

        assert_eq!(get_total(&values), Ok(dec!(10000)));
    }

    #[test]
    fn total_includes_direct_403b_contributions() {
        let mut values = scenario_values();
        values.set_amount(AmountField::Traditional403bContribution, "500");
        values.set_amount(AmountField::Roth403bContribution, "250.25");

        assert_eq!(get_total(&values), Ok(dec!(10750.25)));
    }

    #[test]
    fn total_does_not_depend_on_entry_order() {
        let mut forward = FormValues::new();
        let mut backward = FormValues::new();
        for (i, field) in AmountField::ALL.into_iter().enumerate() {
            forward.set_amount(field, (i * 10).to_string());
        }
        for (i, field) in AmountField::ALL.into_iter().enumerate().rev() {
            backward.set_amount(field, (i * 10).to_string());
        }

        assert_eq!(get_total(&forward), get_total(&backward));
        assert_eq!(get_total(&forward), Ok(dec!(1050)));
    }

    #[test]
    fn total_reports_non_numeric_amount() {
        let mut values = scenario_values();
        values.set_amount(AmountField::Seminary, "abc");

        assert_eq!(
            get_total(&values),
            Err(CalculationError::InvalidAmount {
                field: AmountField::Seminary,
                value: "abc".to_string(),
            })
        );
    }

    #[test]
    fn total_is_idempotent() {
        let values = scenario_values();

        assert_eq!(get_total(&values), get_total(&values));
    }
}
