use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Staff identity and salary as reported by the HR system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HcmUser {
    pub staff_id: String,
    pub given_name: String,
    pub family_name: String,
    pub gross_salary: Decimal,
}

impl HcmUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// The staff member and, when married, their spouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HcmData {
    pub user: HcmUser,
    pub spouse: Option<HcmUser>,
}

impl HcmData {
    pub fn is_married(&self) -> bool {
        self.spouse.is_some()
    }
}
