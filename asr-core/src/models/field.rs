//! Closed field registry for the Additional Salary Request form.
//!
//! Every currency category, text field, and 403(b) election is a variant of a
//! closed enum. Lookups go through these enums rather than through string keys,
//! so an unknown field can only appear at the parsing boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency-valued request category.
///
/// Variants are declared in display order; [`AmountField::ALL`] preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmountField {
    CurrentYearSalaryNotReceived,
    PreviousYearSalaryNotReceived,
    AdditionalSalaryWithinMax,
    Adoption,
    #[serde(rename = "traditional403bContribution")]
    Traditional403bContribution,
    #[serde(rename = "roth403bContribution")]
    Roth403bContribution,
    CounselingNonMedical,
    HealthcareExpensesExceedingLimit,
    BabysittingMinistryEvents,
    ChildrenMinistryTripExpenses,
    ChildrenCollegeEducation,
    MovingExpense,
    Seminary,
    HousingDownPayment,
    AutoPurchase,
}

impl AmountField {
    pub const ALL: [AmountField; 15] = [
        Self::CurrentYearSalaryNotReceived,
        Self::PreviousYearSalaryNotReceived,
        Self::AdditionalSalaryWithinMax,
        Self::Adoption,
        Self::Traditional403bContribution,
        Self::Roth403bContribution,
        Self::CounselingNonMedical,
        Self::HealthcareExpensesExceedingLimit,
        Self::BabysittingMinistryEvents,
        Self::ChildrenMinistryTripExpenses,
        Self::ChildrenCollegeEducation,
        Self::MovingExpense,
        Self::Seminary,
        Self::HousingDownPayment,
        Self::AutoPurchase,
    ];

    /// Position of this field in [`AmountField::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire key used by the request API and by CSV imports.
    pub fn key(self) -> &'static str {
        match self {
            Self::CurrentYearSalaryNotReceived => "currentYearSalaryNotReceived",
            Self::PreviousYearSalaryNotReceived => "previousYearSalaryNotReceived",
            Self::AdditionalSalaryWithinMax => "additionalSalaryWithinMax",
            Self::Adoption => "adoption",
            Self::Traditional403bContribution => "traditional403bContribution",
            Self::Roth403bContribution => "roth403bContribution",
            Self::CounselingNonMedical => "counselingNonMedical",
            Self::HealthcareExpensesExceedingLimit => "healthcareExpensesExceedingLimit",
            Self::BabysittingMinistryEvents => "babysittingMinistryEvents",
            Self::ChildrenMinistryTripExpenses => "childrenMinistryTripExpenses",
            Self::ChildrenCollegeEducation => "childrenCollegeEducation",
            Self::MovingExpense => "movingExpense",
            Self::Seminary => "seminary",
            Self::HousingDownPayment => "housingDownPayment",
            Self::AutoPurchase => "autoPurchase",
        }
    }

    /// Storage column name.
    pub fn column(self) -> &'static str {
        match self {
            Self::CurrentYearSalaryNotReceived => "current_year_salary_not_received",
            Self::PreviousYearSalaryNotReceived => "previous_year_salary_not_received",
            Self::AdditionalSalaryWithinMax => "additional_salary_within_max",
            Self::Adoption => "adoption",
            Self::Traditional403bContribution => "traditional_403b_contribution",
            Self::Roth403bContribution => "roth_403b_contribution",
            Self::CounselingNonMedical => "counseling_non_medical",
            Self::HealthcareExpensesExceedingLimit => "healthcare_expenses_exceeding_limit",
            Self::BabysittingMinistryEvents => "babysitting_ministry_events",
            Self::ChildrenMinistryTripExpenses => "children_ministry_trip_expenses",
            Self::ChildrenCollegeEducation => "children_college_education",
            Self::MovingExpense => "moving_expense",
            Self::Seminary => "seminary",
            Self::HousingDownPayment => "housing_down_payment",
            Self::AutoPurchase => "auto_purchase",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Static registry entry for this field.
    pub fn config(self) -> &'static FieldConfig {
        &FIELD_CONFIGS[self.index()]
    }
}

/// Registry entry describing one request category.
///
/// `max` is an optional upper bound enforced by validation only; the total and
/// deduction calculators ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    pub field: AmountField,
    pub label: &'static str,
    pub max: Option<Decimal>,
}

impl FieldConfig {
    pub fn key(&self) -> &'static str {
        self.field.key()
    }
}

/// Ordered registry of every request category, indexed by [`AmountField::index`].
pub static FIELD_CONFIGS: [FieldConfig; 15] = [
    FieldConfig {
        field: AmountField::CurrentYearSalaryNotReceived,
        label: "Current Year Salary Not Received",
        max: None,
    },
    FieldConfig {
        field: AmountField::PreviousYearSalaryNotReceived,
        label: "Previous Year Salary Not Received",
        max: None,
    },
    FieldConfig {
        field: AmountField::AdditionalSalaryWithinMax,
        label: "Additional Salary Within Max",
        max: None,
    },
    FieldConfig {
        field: AmountField::Adoption,
        label: "Adoption",
        max: Some(Decimal::from_parts(15000, 0, 0, false, 0)),
    },
    FieldConfig {
        field: AmountField::Traditional403bContribution,
        label: "Traditional 403(b) Contribution",
        max: None,
    },
    FieldConfig {
        field: AmountField::Roth403bContribution,
        label: "Roth 403(b) Contribution",
        max: None,
    },
    FieldConfig {
        field: AmountField::CounselingNonMedical,
        label: "Counseling (Non-Medical)",
        max: None,
    },
    FieldConfig {
        field: AmountField::HealthcareExpensesExceedingLimit,
        label: "Healthcare Expenses Exceeding Limit",
        max: None,
    },
    FieldConfig {
        field: AmountField::BabysittingMinistryEvents,
        label: "Babysitting for Ministry Events",
        max: None,
    },
    FieldConfig {
        field: AmountField::ChildrenMinistryTripExpenses,
        label: "Children's Ministry Trip Expenses",
        max: None,
    },
    FieldConfig {
        field: AmountField::ChildrenCollegeEducation,
        label: "Children's College Education",
        max: None,
    },
    FieldConfig {
        field: AmountField::MovingExpense,
        label: "Moving Expense",
        max: None,
    },
    FieldConfig {
        field: AmountField::Seminary,
        label: "Seminary",
        max: None,
    },
    FieldConfig {
        field: AmountField::HousingDownPayment,
        label: "Housing Down Payment",
        max: Some(Decimal::from_parts(50000, 0, 0, false, 0)),
    },
    FieldConfig {
        field: AmountField::AutoPurchase,
        label: "Auto Purchase",
        max: Some(Decimal::from_parts(25000, 0, 0, false, 0)),
    },
];

/// Free-text contact and explanation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    PhoneNumber,
    EmailAddress,
    AdditionalInfo,
}

impl TextField {
    pub const ALL: [TextField; 3] = [Self::PhoneNumber, Self::EmailAddress, Self::AdditionalInfo];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phoneNumber",
            Self::EmailAddress => "emailAddress",
            Self::AdditionalInfo => "additionalInfo",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::EmailAddress => "email_address",
            Self::AdditionalInfo => "additional_info",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Percentage-based 403(b) elections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Election {
    DeductTaxDeferredPercent,
    DeductRothPercent,
}

impl Election {
    pub const ALL: [Election; 2] = [Self::DeductTaxDeferredPercent, Self::DeductRothPercent];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::DeductTaxDeferredPercent => "deductTaxDeferredPercent",
            Self::DeductRothPercent => "deductRothPercent",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::DeductTaxDeferredPercent => "deduct_tax_deferred_percent",
            Self::DeductRothPercent => "deduct_roth_percent",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|election| election.key() == key)
    }
}

/// A single-field change, as produced by an edit or a blur event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUpdate {
    Amount(AmountField, String),
    Text(TextField, String),
    Election(Election, bool),
}

impl FieldUpdate {
    /// Builds an update from a wire key and its raw value.
    ///
    /// Election values accept `true`/`false` (case-insensitive). Returns `None`
    /// for unknown keys or an unparseable election value.
    pub fn from_key_value(
        key: &str,
        value: &str,
    ) -> Option<Self> {
        if let Some(field) = AmountField::parse(key) {
            return Some(Self::Amount(field, value.to_string()));
        }
        if let Some(field) = TextField::parse(key) {
            return Some(Self::Text(field, value.to_string()));
        }
        let election = Election::parse(key)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Self::Election(election, true)),
            "false" => Some(Self::Election(election, false)),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Amount(field, _) => field.key(),
            Self::Text(field, _) => field.key(),
            Self::Election(election, _) => election.key(),
        }
    }
}
