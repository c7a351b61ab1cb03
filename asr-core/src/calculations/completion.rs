use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::common::parse_amount;
use crate::models::{AmountField, FormValues};

/// Percentage of request categories the user has filled in, 0 to 100.
///
/// A category counts as filled only when it parses to an amount strictly
/// greater than zero: requesting `"0"` in a category is "not provided", and
/// unparseable input is not provided either. Elections and free-text contact
/// fields are outside the denominator.
pub fn calculate_completion_percentage(values: &FormValues) -> u8 {
    let total_fields = AmountField::ALL.len();

    let filled = values
        .amounts()
        .filter(|(_, raw)| parse_amount(raw).is_ok_and(|amount| amount > Decimal::ZERO))
        .count();

    let percentage = (Decimal::from(filled) * Decimal::ONE_HUNDRED / Decimal::from(total_fields))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    percentage.to_u8().unwrap_or(0)
}
