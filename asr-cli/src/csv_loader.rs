//! CSV loader for form values.
//!
//! ## CSV Format
//!
//! Two columns, matched by header name: `field` holds the wire key of a form
//! field and `value` the raw input for it. Rows are applied in file order, so
//! a later row for the same field wins.
//!
//! | Field kind | Keys | Value |
//! |------------|------------------------------------------------------|-----------------------------|
//! | amount     | `adoption`, `seminary`, `housingDownPayment`, ...     | raw amount, e.g. `1,250.00` |
//! | text       | `phoneNumber`, `emailAddress`, `additionalInfo`       | any text                    |
//! | election   | `deductTaxDeferredPercent`, `deductRothPercent`       | `true` or `false`           |
//!
//! Amounts are kept exactly as written; they are parsed and validated when
//! each row is autosaved.
//!
//! ### Example
//!
//! ```csv
//! field,value
//! adoption,"2,000"
//! seminary,350.50
//! emailAddress,staff@example.org
//! deductTaxDeferredPercent,true
//! ```

use asr_core::models::{Election, FieldUpdate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    field: String,
    value: String,
}

/// Errors that can occur while loading form values from CSV.
#[derive(Debug, thiserror::Error)]
pub enum FormValuesLoaderError {
    /// The CSV is structurally invalid or a required column is missing.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, the header is row 0.
    #[error("unknown field '{field}' on row {row}")]
    UnknownField { field: String, row: usize },

    #[error("'{value}' is not true or false for '{field}' on row {row}")]
    InvalidElection {
        field: String,
        value: String,
        row: usize,
    },

    #[error("failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<FieldUpdate, FormValuesLoaderError> {
    if let Some(update) = FieldUpdate::from_key_value(&row.field, &row.value) {
        return Ok(update);
    }
    if Election::parse(&row.field).is_some() {
        return Err(FormValuesLoaderError::InvalidElection {
            field: row.field,
            value: row.value,
            row: row_number,
        });
    }
    Err(FormValuesLoaderError::UnknownField {
        field: row.field,
        row: row_number,
    })
}

/// Parse CSV text and return one [`FieldUpdate`] per row, in file order.
///
/// # Errors
///
/// * [`FormValuesLoaderError::Parse`] if the CSV is structurally invalid.
/// * [`FormValuesLoaderError::UnknownField`] if a row names no form field.
/// * [`FormValuesLoaderError::InvalidElection`] if an election is not a
///   boolean.
pub fn load_from_str(input: &str) -> Result<Vec<FieldUpdate>, FormValuesLoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<FieldUpdate>, FormValuesLoaderError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use asr_core::models::{AmountField, TextField};
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE_CSV: &str = "\
field,value
adoption,\"2,000\"
seminary,350.50
emailAddress,staff@example.org
deductTaxDeferredPercent,TRUE
";

    #[test]
    fn rows_become_updates_in_file_order() {
        let updates = load_from_str(SAMPLE_CSV).expect("should parse sample CSV");

        assert_eq!(
            updates,
            vec![
                FieldUpdate::Amount(AmountField::Adoption, "2,000".to_string()),
                FieldUpdate::Amount(AmountField::Seminary, "350.50".to_string()),
                FieldUpdate::Text(TextField::EmailAddress, "staff@example.org".to_string()),
                FieldUpdate::Election(Election::DeductTaxDeferredPercent, true),
            ]
        );
    }

    #[test]
    fn whitespace_around_cells_is_trimmed() {
        let csv = "field , value\n housingDownPayment , 40000 \n";

        let updates = load_from_str(csv).unwrap();

        assert_eq!(
            updates,
            vec![FieldUpdate::Amount(AmountField::HousingDownPayment, "40000".to_string())]
        );
    }

    #[test]
    fn amounts_are_not_parsed_on_load() {
        let csv = "field,value\nmovingExpense,abc\n";

        let updates = load_from_str(csv).unwrap();

        assert_eq!(
            updates,
            vec![FieldUpdate::Amount(AmountField::MovingExpense, "abc".to_string())]
        );
    }

    #[test]
    fn header_only_yields_no_updates() {
        assert!(load_from_str("field,value\n").unwrap().is_empty());
        assert!(load_from_str("").unwrap().is_empty());
    }

    #[test]
    fn unknown_field_reports_row() {
        let csv = "field,value\nadoption,10\nyacht,500\n";

        match load_from_str(csv).unwrap_err() {
            FormValuesLoaderError::UnknownField { field, row } => {
                assert_eq!(field, "yacht");
                assert_eq!(row, 2);
            }
            other => panic!("expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn non_boolean_election_is_rejected() {
        let csv = "field,value\ndeductRothPercent,yes\n";

        match load_from_str(csv).unwrap_err() {
            FormValuesLoaderError::InvalidElection { field, value, row } => {
                assert_eq!(field, "deductRothPercent");
                assert_eq!(value, "yes");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidElection, got {other:?}"),
        }
    }

    #[test]
    fn missing_value_column_is_parse_error() {
        let csv = "field\nadoption\n";

        assert!(matches!(
            load_from_str(csv),
            Err(FormValuesLoaderError::Parse(_))
        ));
    }

    #[test]
    fn extra_column_is_parse_error() {
        let csv = "field,value\nadoption,10,20\n";

        assert!(matches!(
            load_from_str(csv),
            Err(FormValuesLoaderError::Parse(_))
        ));
    }
}
