use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::cap::{CapInputs, CapStatus, TotalAnnualSalary, decide_cap_status};
use crate::calculations::completion::calculate_completion_percentage;
use crate::calculations::deductions::{DeductionCalculations, DeductionRates, calculate_deductions};
use crate::calculations::total::{CalculationError, get_total};
use crate::models::{FormValues, HcmData, RequestRecord};

/// Every derived figure for one values record, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySummary {
    pub total: Decimal,
    pub deductions: DeductionCalculations,
    pub completion_percentage: u8,
    pub cap_status: CapStatus,
    pub remaining_allowance: Decimal,
    /// Present only when married.
    pub spouse_remaining_allowance: Option<Decimal>,
    /// Present only when the approval process applies.
    pub total_annual_salary: Option<TotalAnnualSalary>,
}

impl SalarySummary {
    /// Computes the summary for `values` against the caps on `record`.
    ///
    /// `hcm` supplies the gross salary for the annual salary section; without
    /// it the gross salary reads as zero.
    pub fn compute(
        values: &FormValues,
        rates: &DeductionRates,
        record: &RequestRecord,
        hcm: Option<&HcmData>,
    ) -> Result<Self, CalculationError> {
        let total = get_total(values)?;
        let deductions = calculate_deductions(values, total, rates)?;
        let inputs = CapInputs::new(
            total,
            record.calculations.as_ref(),
            record.spouse_calculations.as_ref(),
        );
        let cap_status = decide_cap_status(&inputs);

        let total_annual_salary = cap_status.requires_approval_process().then(|| {
            let gross_salary = hcm.map_or(Decimal::ZERO, |data| data.user.gross_salary);
            TotalAnnualSalary::compute(gross_salary, &inputs)
        });

        Ok(Self {
            total,
            deductions,
            completion_percentage: calculate_completion_percentage(values),
            cap_status,
            remaining_allowance: inputs.remaining_allowance(),
            spouse_remaining_allowance: inputs.spouse.map(|spouse| spouse.remaining_allowance()),
            total_annual_salary,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{AmountField, Calculations, Election, HcmUser, RequestId};

    fn record_with_cap(
        cap: Decimal,
        spouse: Option<Calculations>,
    ) -> RequestRecord {
        let mut record = RequestRecord::new(RequestId(1), "acct-1", Utc::now());
        record.calculations = Some(Calculations {
            current_salary_cap: cap,
            ..Calculations::default()
        });
        record.spouse_calculations = spouse;
        record
    }

    fn hcm() -> HcmData {
        HcmData {
            user: HcmUser {
                staff_id: "000123".to_string(),
                given_name: "Pat".to_string(),
                family_name: "Doe".to_string(),
                gross_salary: dec!(50000),
            },
            spouse: None,
        }
    }

    fn rates() -> DeductionRates {
        DeductionRates {
            traditional: dec!(0.12),
            roth: dec!(0.08),
        }
    }

    #[test]
    fn summary_under_cap_has_no_annual_salary_section() {
        let mut values = FormValues::new();
        values.set_amount(AmountField::AdditionalSalaryWithinMax, "5000");
        values.set_amount(AmountField::Adoption, "2000");
        values.set_amount(AmountField::CounselingNonMedical, "3000");
        values.set_election(Election::DeductTaxDeferredPercent, true);

        let summary =
            SalarySummary::compute(&values, &rates(), &record_with_cap(dec!(20000), None), None)
                .unwrap();

        assert_eq!(summary.total, dec!(10000));
        assert_eq!(summary.deductions.calculated_deduction, dec!(1200.00));
        assert_eq!(summary.completion_percentage, 20);
        assert_eq!(summary.cap_status, CapStatus::UnderCap);
        assert_eq!(summary.remaining_allowance, dec!(10000));
        assert_eq!(summary.total_annual_salary, None);
    }

    #[test]
    fn summary_over_cap_single_includes_annual_salary() {
        let mut values = FormValues::new();
        values.set_amount(AmountField::Seminary, "1000");

        let summary = SalarySummary::compute(
            &values,
            &rates(),
            &record_with_cap(dec!(500), None),
            Some(&hcm()),
        )
        .unwrap();

        assert_eq!(summary.cap_status, CapStatus::ExceedsCapSingle);
        let annual = summary.total_annual_salary.unwrap();
        assert_eq!(annual.total, dec!(51000));
        assert_eq!(annual.over_cap_by, dec!(500));
    }

    #[test]
    fn summary_reports_spouse_allowance_when_married() {
        let mut values = FormValues::new();
        values.set_amount(AmountField::Seminary, "1000");
        let spouse = Calculations {
            current_salary_cap: dec!(800),
            pending_asr_amount: dec!(300),
            ..Calculations::default()
        };

        let summary = SalarySummary::compute(
            &values,
            &rates(),
            &record_with_cap(dec!(500), Some(spouse)),
            None,
        )
        .unwrap();

        assert_eq!(summary.cap_status, CapStatus::ExceedsCapMarriedSpouseUnderCap);
        assert_eq!(summary.spouse_remaining_allowance, Some(dec!(500)));
        assert_eq!(summary.total_annual_salary, None);
    }

    #[test]
    fn summary_propagates_invalid_amounts() {
        let mut values = FormValues::new();
        values.set_amount(AmountField::Adoption, "x");

        let result = SalarySummary::compute(&values, &rates(), &record_with_cap(dec!(1), None), None);

        assert!(matches!(result, Err(CalculationError::InvalidAmount { .. })));
    }
}
