use serde::{Deserialize, Serialize};

use super::field::{AmountField, Election, FieldUpdate, TextField};
use super::request::RequestRecord;

/// Raw values of the request form, exactly as the user typed them.
///
/// Amounts stay strings until a calculator or validator parses them, so an
/// in-progress edit such as `"1,2"` is never lost. Every registry field is
/// always present; a fresh form holds `"0"` for each amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    amounts: [String; 15],
    text: [String; 3],
    elections: [bool; 2],
}

impl FormValues {
    pub fn new() -> Self {
        Self {
            amounts: std::array::from_fn(|_| "0".to_string()),
            text: Default::default(),
            elections: [false; 2],
        }
    }

    /// Seeds the form from a persisted request (edit and view pages).
    pub fn from_record(record: &RequestRecord) -> Self {
        let mut values = Self::new();
        for field in AmountField::ALL {
            values.set_amount(field, record.amount(field).to_string());
        }
        values.set_text(TextField::PhoneNumber, record.phone_number.clone());
        values.set_text(TextField::EmailAddress, record.email_address.clone());
        values.set_text(TextField::AdditionalInfo, record.additional_info.clone());
        values.set_election(
            Election::DeductTaxDeferredPercent,
            record.deduct_tax_deferred_percent,
        );
        values.set_election(Election::DeductRothPercent, record.deduct_roth_percent);
        values
    }

    pub fn amount(
        &self,
        field: AmountField,
    ) -> &str {
        &self.amounts[field.index()]
    }

    pub fn set_amount(
        &mut self,
        field: AmountField,
        value: impl Into<String>,
    ) {
        self.amounts[field.index()] = value.into();
    }

    /// Iterates amounts in registry order.
    pub fn amounts(&self) -> impl Iterator<Item = (AmountField, &str)> {
        AmountField::ALL
            .into_iter()
            .map(|field| (field, self.amount(field)))
    }

    pub fn text(
        &self,
        field: TextField,
    ) -> &str {
        &self.text[field.index()]
    }

    pub fn set_text(
        &mut self,
        field: TextField,
        value: impl Into<String>,
    ) {
        self.text[field.index()] = value.into();
    }

    pub fn election(
        &self,
        election: Election,
    ) -> bool {
        self.elections[election.index()]
    }

    pub fn set_election(
        &mut self,
        election: Election,
        value: bool,
    ) {
        self.elections[election.index()] = value;
    }

    /// Merges a single-field change into the form.
    pub fn apply(
        &mut self,
        update: &FieldUpdate,
    ) {
        match update {
            FieldUpdate::Amount(field, value) => self.set_amount(*field, value.clone()),
            FieldUpdate::Text(field, value) => self.set_text(*field, value.clone()),
            FieldUpdate::Election(election, value) => self.set_election(*election, *value),
        }
    }
}

impl Default for FormValues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_form_has_every_amount_at_zero() {
        let values = FormValues::new();

        assert!(values.amounts().all(|(_, value)| value == "0"));
        assert_eq!(values.amounts().count(), 15);
        assert_eq!(values.text(TextField::PhoneNumber), "");
        assert!(!values.election(Election::DeductRothPercent));
    }

    #[test]
    fn apply_merges_each_kind_of_update() {
        let mut values = FormValues::new();

        values.apply(&FieldUpdate::Amount(AmountField::Seminary, "1200".to_string()));
        values.apply(&FieldUpdate::Text(TextField::PhoneNumber, "555-0100".to_string()));
        values.apply(&FieldUpdate::Election(Election::DeductTaxDeferredPercent, true));

        assert_eq!(values.amount(AmountField::Seminary), "1200");
        assert_eq!(values.text(TextField::PhoneNumber), "555-0100");
        assert!(values.election(Election::DeductTaxDeferredPercent));
        assert!(!values.election(Election::DeductRothPercent));
    }
}
