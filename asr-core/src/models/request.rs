use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{AmountField, Election, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub i64);

impl fmt::Display for RequestId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    InProgress,
    Pending,
    ActionRequired,
    Approved,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Pending => "PENDING",
            Self::ActionRequired => "ACTION_REQUIRED",
            Self::Approved => "APPROVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN_PROGRESS" => Some(Self::InProgress),
            "PENDING" => Some(Self::Pending),
            "ACTION_REQUIRED" => Some(Self::ActionRequired),
            "APPROVED" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Only in-progress requests accept edits and submission.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxAmountAndReason {
    pub amount: Decimal,
    pub reason: String,
}

/// Cap and balance figures computed by the backend for one staff member.
///
/// A missing calculations block is read as all zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculations {
    pub current_salary_cap: Decimal,
    pub staff_account_balance: Decimal,
    pub predicted_year_income: Decimal,
    pub pending_asr_amount: Decimal,
    pub max_amount_and_reason: Option<MaxAmountAndReason>,
}

/// A persisted Additional Salary Request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: RequestId,
    pub account_list_id: String,
    pub status: RequestStatus,

    // Per-category amounts, indexed by `AmountField::index`
    pub amounts: [Decimal; 15],

    pub phone_number: String,
    pub email_address: String,
    pub additional_info: String,
    pub deduct_tax_deferred_percent: bool,
    pub deduct_roth_percent: bool,

    pub total_additional_salary_requested: Decimal,

    pub calculations: Option<Calculations>,
    pub spouse_calculations: Option<Calculations>,

    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestRecord {
    /// A blank in-progress request, as returned right after creation.
    pub fn new(
        id: RequestId,
        account_list_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_list_id: account_list_id.into(),
            status: RequestStatus::InProgress,
            amounts: [Decimal::ZERO; 15],
            phone_number: String::new(),
            email_address: String::new(),
            additional_info: String::new(),
            deduct_tax_deferred_percent: false,
            deduct_roth_percent: false,
            total_additional_salary_requested: Decimal::ZERO,
            calculations: None,
            spouse_calculations: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn amount(
        &self,
        field: AmountField,
    ) -> Decimal {
        self.amounts[field.index()]
    }

    /// Writes an update into this record without touching timestamps or status.
    pub fn apply_update(
        &mut self,
        update: &RequestUpdate,
    ) {
        for change in &update.changes {
            match change {
                FieldChange::Amount(field, amount) => self.amounts[field.index()] = *amount,
                FieldChange::Text(TextField::PhoneNumber, value) => {
                    self.phone_number = value.clone()
                }
                FieldChange::Text(TextField::EmailAddress, value) => {
                    self.email_address = value.clone()
                }
                FieldChange::Text(TextField::AdditionalInfo, value) => {
                    self.additional_info = value.clone()
                }
                FieldChange::Election(Election::DeductTaxDeferredPercent, value) => {
                    self.deduct_tax_deferred_percent = *value
                }
                FieldChange::Election(Election::DeductRothPercent, value) => {
                    self.deduct_roth_percent = *value
                }
            }
        }
        self.total_additional_salary_requested = update.total_additional_salary_requested;
    }
}

/// A parsed, storable single-field change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldChange {
    Amount(AmountField, Decimal),
    Text(TextField, String),
    Election(Election, bool),
}

/// Attributes sent with an update call: the changed fields plus the
/// recomputed total of the whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUpdate {
    pub changes: Vec<FieldChange>,
    pub total_additional_salary_requested: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            RequestStatus::InProgress,
            RequestStatus::Pending,
            RequestStatus::ActionRequired,
            RequestStatus::Approved,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("DRAFT"), None);
    }

    #[test]
    fn apply_update_writes_changes_and_total() {
        let mut record = RequestRecord::new(RequestId(7), "acct-1", Utc::now());
        let update = RequestUpdate {
            changes: vec![
                FieldChange::Amount(AmountField::Adoption, dec!(2000)),
                FieldChange::Text(TextField::EmailAddress, "staff@example.org".to_string()),
                FieldChange::Election(Election::DeductRothPercent, true),
            ],
            total_additional_salary_requested: dec!(2000),
        };

        record.apply_update(&update);

        assert_eq!(record.amount(AmountField::Adoption), dec!(2000));
        assert_eq!(record.email_address, "staff@example.org");
        assert!(record.deduct_roth_percent);
        assert_eq!(record.total_additional_salary_requested, dec!(2000));
        assert_eq!(record.status, RequestStatus::InProgress);
    }
}
