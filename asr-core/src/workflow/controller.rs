use thiserror::Error;
use tracing::{error, info, warn};

use super::state::{WorkflowAction, WorkflowState};
use super::step::Step;
use crate::calculations::{CapInputs, CapStatus, decide_cap_status, get_total};
use crate::db::{AsrRepository, RepositoryError, RequestStore};
use crate::models::{FormValues, RequestRecord};
use crate::validation::{ValidationReport, validate_form};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("request cannot be submitted: {0}")]
    Invalid(ValidationReport),

    #[error("request is opened read-only")]
    ReadOnly,

    #[error("no request has been created yet")]
    MissingRequest,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Runs the transitions that talk to the repository.
///
/// On error the caller keeps its previous [`WorkflowState`]; no transition
/// happens.
pub struct WorkflowController<'a, R> {
    store: &'a RequestStore<R>,
    account_list_id: String,
}

impl<'a, R: AsrRepository> WorkflowController<'a, R> {
    pub fn new(
        store: &'a RequestStore<R>,
        account_list_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            account_list_id: account_list_id.into(),
        }
    }

    /// "Continue" on the about step.
    ///
    /// New pages create the request before advancing. A failed creation
    /// leaves the workflow on the about step.
    pub async fn continue_from_about(
        &self,
        state: &WorkflowState,
    ) -> Result<WorkflowState, WorkflowError> {
        if !state.needs_request() {
            return Ok(state.apply(WorkflowAction::NextStep));
        }

        let record = match self.store.create(&self.account_list_id).await {
            Ok(record) => record,
            Err(err) => {
                error!(
                    account_list_id = %self.account_list_id,
                    error = %err,
                    "failed to create salary request"
                );
                return Err(err.into());
            }
        };

        Ok(state
            .apply(WorkflowAction::RequestCreated(record.id))
            .apply(WorkflowAction::NextStep))
    }

    /// Validates `values` and submits the request, ending on the receipt.
    pub async fn submit(
        &self,
        state: &WorkflowState,
        values: &FormValues,
    ) -> Result<WorkflowState, WorkflowError> {
        if state.page_type.is_read_only() {
            return Err(WorkflowError::ReadOnly);
        }
        let id = state.request_id.ok_or(WorkflowError::MissingRequest)?;

        let record = self.store.get(id).await?;
        let report = validate_form(values, cap_status_for(values, &record));
        if !report.is_valid() {
            warn!(%id, errors = report.errors.len(), "submission blocked by validation");
            return Err(WorkflowError::Invalid(report));
        }

        if let Err(err) = self.store.submit(id).await {
            error!(%id, error = %err, "failed to submit salary request");
            return Err(err.into());
        }
        info!(%id, "salary request moved to receipt");
        Ok(state.apply(WorkflowAction::GoToStep(Step::Receipt)))
    }
}

/// Cap decision for submission. An unparseable total reads as under cap;
/// the amount error itself is already in the validation report.
fn cap_status_for(
    values: &FormValues,
    record: &RequestRecord,
) -> CapStatus {
    get_total(values)
        .map(|total| {
            decide_cap_status(&CapInputs::new(
                total,
                record.calculations.as_ref(),
                record.spouse_calculations.as_ref(),
            ))
        })
        .unwrap_or(CapStatus::UnderCap)
}
