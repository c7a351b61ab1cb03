mod field;
mod form_values;
mod hcm;
mod request;

pub use field::{AmountField, Election, FIELD_CONFIGS, FieldConfig, FieldUpdate, TextField};
pub use form_values::FormValues;
pub use hcm::{HcmData, HcmUser};
pub use request::{
    Calculations, FieldChange, MaxAmountAndReason, RequestId, RequestRecord, RequestStatus,
    RequestUpdate,
};
