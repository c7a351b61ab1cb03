//! Field-level autosave.
//!
//! Each blur merges one change into the local [`FormValues`], recomputes the
//! total and sends the change with the new total to the repository. The
//! local values are updated even when the save is skipped or rejected so the
//! user never loses what they typed.
//!
//! A rejected value stays in the form but never reaches the repository, so
//! the total sent with later saves counts that field at its persisted amount.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::calculations::common::{ParseAmountError, parse_amount};
use crate::db::{AsrRepository, RepositoryError, RequestStore};
use crate::models::{
    AmountField, FieldChange, FieldUpdate, FormValues, RequestId, RequestRecord, RequestUpdate,
};
use crate::validation::{FieldError, FieldErrorKind, check_amount, validate_field};

/// Counts mutations in flight. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    in_flight: Arc<AtomicUsize>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisory only: true while at least one save has not finished.
    pub fn is_mutating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Marks a mutation as started until the returned guard is dropped.
    pub fn track(&self) -> MutationGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        MutationGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

#[must_use = "the mutation ends when the guard is dropped"]
pub struct MutationGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// Persisted; carries the recomputed total.
    Saved(Decimal),
    /// No request exists yet, nothing was sent.
    SkippedNoRequest,
    /// The form holds a value that cannot be saved, nothing was sent.
    Rejected(FieldError),
}

fn to_change(update: &FieldUpdate) -> Result<FieldChange, ParseAmountError> {
    Ok(match update {
        FieldUpdate::Amount(field, raw) => FieldChange::Amount(*field, parse_amount(raw)?),
        FieldUpdate::Text(field, value) => FieldChange::Text(*field, value.trim().to_string()),
        FieldUpdate::Election(election, value) => FieldChange::Election(*election, *value),
    })
}

/// Total to persist alongside a change: every amount that would pass
/// validation is taken from the form, any other falls back to `persisted`.
fn autosave_total(
    values: &FormValues,
    persisted: &RequestRecord,
) -> Decimal {
    AmountField::ALL
        .into_iter()
        .map(|field| {
            let raw = values.amount(field);
            let valid = check_amount(field, raw).is_none();
            match parse_amount(raw) {
                Ok(amount) if valid => amount,
                _ => {
                    debug!(field = field.key(), "counting last saved amount in total");
                    persisted.amount(field)
                }
            }
        })
        .sum()
}

pub struct AutosaveBinder<'a, R> {
    store: &'a RequestStore<R>,
    tracker: MutationTracker,
}

impl<'a, R: AsrRepository> AutosaveBinder<'a, R> {
    pub fn new(
        store: &'a RequestStore<R>,
        tracker: MutationTracker,
    ) -> Self {
        Self { store, tracker }
    }

    pub fn tracker(&self) -> &MutationTracker {
        &self.tracker
    }

    /// Merges `update` into `values` and persists it.
    ///
    /// # Errors
    /// Repository failures are returned as-is after being logged; the merged
    /// local values are kept so editing can continue.
    pub async fn save_field(
        &self,
        values: &mut FormValues,
        request_id: Option<RequestId>,
        update: FieldUpdate,
    ) -> Result<AutosaveOutcome, RepositoryError> {
        values.apply(&update);

        if let Err(field_error) = validate_field(&update) {
            warn!(field = field_error.field, error = %field_error.kind, "autosave rejected");
            return Ok(AutosaveOutcome::Rejected(field_error));
        }

        let Some(id) = request_id else {
            debug!(field = update.key(), "no request yet, autosave skipped");
            return Ok(AutosaveOutcome::SkippedNoRequest);
        };

        let persisted = self.store.get(id).await?;
        let total = autosave_total(values, &persisted);

        let change = match to_change(&update) {
            Ok(change) => change,
            Err(_) => {
                return Ok(AutosaveOutcome::Rejected(FieldError {
                    field: update.key(),
                    kind: FieldErrorKind::InvalidAmount,
                }));
            }
        };

        let request_update = RequestUpdate {
            changes: vec![change],
            total_additional_salary_requested: total,
        };

        let _guard = self.tracker.track();
        if let Err(err) = self.store.update(id, &request_update).await {
            error!(%id, field = update.key(), error = %err, "autosave failed");
            return Err(err);
        }
        debug!(%id, field = update.key(), %total, "autosaved field");
        Ok(AutosaveOutcome::Saved(total))
    }
}
