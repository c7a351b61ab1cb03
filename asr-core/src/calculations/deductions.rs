//! 403(b) deduction calculations.
//!
//! A request may elect a percentage-based traditional (tax-deferred) and/or
//! Roth 403(b) deduction on top of any direct contribution amounts entered in
//! the form. The percentages themselves are sourced externally.
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Total requested (sum of all amount fields) |
//! | 2    | Traditional: Line 1 × traditional rate, if elected |
//! | 3    | Roth: Line 1 × Roth rate, if elected |
//! | 4    | Calculated deduction (Line 2 + Line 3) |
//! | 5    | Direct contributions (traditional + Roth contribution fields) |
//! | 6    | Total deduction (Line 4 + Line 5) |
//! | 7    | Net salary (Line 1 - Line 6) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use asr_core::calculations::{DeductionRates, calculate_deductions};
//! use asr_core::models::{Election, FormValues};
//!
//! let mut values = FormValues::new();
//! values.set_election(Election::DeductTaxDeferredPercent, true);
//! values.set_election(Election::DeductRothPercent, true);
//!
//! let rates = DeductionRates::new(dec!(0.12), dec!(0.08)).unwrap();
//! let result = calculate_deductions(&values, dec!(10000), &rates).unwrap();
//!
//! assert_eq!(result.calculated_deduction, dec!(2000.00));
//! assert_eq!(result.net_salary, dec!(8000.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::total::{CalculationError, amount_of};
use crate::models::{AmountField, Election, FormValues};

/// Errors raised when deduction rates are out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionRatesError {
    /// The traditional 403(b) rate must be between 0 and 1.
    #[error("traditional 403(b) rate must be between 0 and 1, got {0}")]
    InvalidTraditionalRate(Decimal),

    /// The Roth 403(b) rate must be between 0 and 1.
    #[error("Roth 403(b) rate must be between 0 and 1, got {0}")]
    InvalidRothRate(Decimal),
}

/// Externally sourced percentage rates, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRates {
    pub traditional: Decimal,
    pub roth: Decimal,
}

impl DeductionRates {
    /// Creates validated rates.
    ///
    /// # Errors
    ///
    /// Returns [`DeductionRatesError`] if either rate is outside `[0, 1]`.
    pub fn new(
        traditional: Decimal,
        roth: Decimal,
    ) -> Result<Self, DeductionRatesError> {
        let rates = Self { traditional, roth };
        rates.validate()?;
        Ok(rates)
    }

    pub fn validate(&self) -> Result<(), DeductionRatesError> {
        if self.traditional < Decimal::ZERO || self.traditional > Decimal::ONE {
            return Err(DeductionRatesError::InvalidTraditionalRate(self.traditional));
        }
        if self.roth < Decimal::ZERO || self.roth > Decimal::ONE {
            return Err(DeductionRatesError::InvalidRothRate(self.roth));
        }
        Ok(())
    }
}

/// Derived deduction figures for one values record. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCalculations {
    /// Percentage-based deduction from the elections (Line 4).
    pub calculated_deduction: Decimal,

    /// Direct 403(b) contribution amounts taken as-is (Line 5).
    pub contribution_403b: Decimal,

    /// Line 4 + Line 5.
    pub total_deduction: Decimal,

    /// Total requested less the total deduction (Line 7).
    pub net_salary: Decimal,
}

/// Computes 403(b) deductions for a values record.
///
/// `total` is the result of [`get_total`](crate::calculations::get_total) for
/// the same values. The direct contribution fields are added to the
/// deduction unchanged; they are not multiplied by any rate. Figures are
/// exact; round them for display only.
///
/// # Errors
///
/// Returns [`CalculationError::InvalidAmount`] if a contribution field is not
/// a number.
pub fn calculate_deductions(
    values: &FormValues,
    total: Decimal,
    rates: &DeductionRates,
) -> Result<DeductionCalculations, CalculationError> {
    let traditional = if values.election(Election::DeductTaxDeferredPercent) {
        total * rates.traditional
    } else {
        Decimal::ZERO
    };
    let roth = if values.election(Election::DeductRothPercent) {
        total * rates.roth
    } else {
        Decimal::ZERO
    };
    let calculated_deduction = traditional + roth;

    let contribution_403b = amount_of(values, AmountField::Traditional403bContribution)?
        + amount_of(values, AmountField::Roth403bContribution)?;

    let total_deduction = calculated_deduction + contribution_403b;
    let net_salary = total - total_deduction;

    debug!(%calculated_deduction, %contribution_403b, %total_deduction, "computed deductions");

    Ok(DeductionCalculations {
        calculated_deduction,
        contribution_403b,
        total_deduction,
        net_salary,
    })
}
