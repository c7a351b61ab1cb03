//! Derived calculations over a form values record.
//!
//! Every calculator here is a pure function of its inputs. Callers recompute
//! on each change instead of caching results.

pub mod cap;
pub mod common;
pub mod completion;
pub mod deductions;
pub mod summary;
pub mod total;

pub use cap::{CapInputs, CapStatus, SpouseCap, TotalAnnualSalary, decide_cap_status};
pub use completion::calculate_completion_percentage;
pub use deductions::{
    DeductionCalculations, DeductionRates, DeductionRatesError, calculate_deductions,
};
pub use summary::SalarySummary;
pub use total::{CalculationError, get_total};
