//! Salary cap exceedance decision.
//!
//! Compares what a staff member is requesting (plus anything already pending
//! or approved) against their salary cap. When married, the spouse's own
//! standing decides whether part of the request could be taken from the
//! spouse's remaining allowance instead. The result only gates which
//! sections are shown; no amount is moved automatically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::max;
use crate::models::Calculations;

/// Outcome of the cap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapStatus {
    UnderCap,
    ExceedsCapSingle,
    /// Over cap, but the spouse is at or under theirs and could absorb part.
    ExceedsCapMarriedSpouseUnderCap,
    /// Both spouses are over their caps.
    ExceedsCapMarriedSpouseOverCap,
}

impl CapStatus {
    pub fn exceeds_cap(&self) -> bool {
        !matches!(self, Self::UnderCap)
    }

    /// Whether the approval process and total annual salary sections apply.
    pub fn requires_approval_process(&self) -> bool {
        matches!(
            self,
            Self::ExceedsCapSingle | Self::ExceedsCapMarriedSpouseOverCap
        )
    }

    /// Whether the "request from spouse" link is offered.
    pub fn can_request_from_spouse(&self) -> bool {
        matches!(self, Self::ExceedsCapMarriedSpouseUnderCap)
    }
}

/// The spouse's cap and what the spouse already has pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseCap {
    pub cap: Decimal,
    pub pending: Decimal,
}

impl SpouseCap {
    pub fn from_calculations(calculations: &Calculations) -> Self {
        Self {
            cap: calculations.current_salary_cap,
            pending: calculations.pending_asr_amount,
        }
    }

    /// How much the spouse may still request before reaching their cap.
    pub fn remaining_allowance(&self) -> Decimal {
        max(self.cap - self.pending, Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapInputs {
    /// Total of the request being edited.
    pub requested: Decimal,
    /// Other pending or approved requests counted against the same cap.
    pub pending: Decimal,
    pub individual_cap: Decimal,
    pub spouse: Option<SpouseCap>,
}

impl CapInputs {
    /// Builds inputs from backend calculations; absent blocks read as zero.
    pub fn new(
        requested: Decimal,
        calculations: Option<&Calculations>,
        spouse_calculations: Option<&Calculations>,
    ) -> Self {
        let own = calculations.cloned().unwrap_or_default();
        Self {
            requested,
            pending: own.pending_asr_amount,
            individual_cap: own.current_salary_cap,
            spouse: spouse_calculations.map(SpouseCap::from_calculations),
        }
    }

    pub fn total_against_cap(&self) -> Decimal {
        self.requested + self.pending
    }

    /// Allowance left on the individual cap after this request.
    pub fn remaining_allowance(&self) -> Decimal {
        max(self.individual_cap - self.total_against_cap(), Decimal::ZERO)
    }
}

/// Decides where a request stands relative to the cap.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use asr_core::calculations::{CapInputs, CapStatus, SpouseCap, decide_cap_status};
///
/// let mut inputs = CapInputs {
///     requested: dec!(1000),
///     pending: dec!(0),
///     individual_cap: dec!(500),
///     spouse: None,
/// };
/// assert_eq!(decide_cap_status(&inputs), CapStatus::ExceedsCapSingle);
///
/// inputs.spouse = Some(SpouseCap { cap: dec!(500), pending: dec!(100) });
/// assert_eq!(decide_cap_status(&inputs), CapStatus::ExceedsCapMarriedSpouseUnderCap);
/// ```
pub fn decide_cap_status(inputs: &CapInputs) -> CapStatus {
    if inputs.total_against_cap() <= inputs.individual_cap {
        return CapStatus::UnderCap;
    }

    match inputs.spouse {
        None => CapStatus::ExceedsCapSingle,
        Some(spouse) if spouse.pending <= spouse.cap => CapStatus::ExceedsCapMarriedSpouseUnderCap,
        Some(_) => CapStatus::ExceedsCapMarriedSpouseOverCap,
    }
}

/// Annual salary picture shown once a request goes over cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalAnnualSalary {
    pub gross_salary: Decimal,
    pub requested: Decimal,
    pub pending: Decimal,
    pub total: Decimal,
    pub cap: Decimal,
    pub over_cap_by: Decimal,
}

impl TotalAnnualSalary {
    pub fn compute(
        gross_salary: Decimal,
        inputs: &CapInputs,
    ) -> Self {
        let total = gross_salary + inputs.total_against_cap();
        Self {
            gross_salary,
            requested: inputs.requested,
            pending: inputs.pending,
            total,
            cap: inputs.individual_cap,
            over_cap_by: max(inputs.total_against_cap() - inputs.individual_cap, Decimal::ZERO),
        }
    }
}
