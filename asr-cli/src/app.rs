//! Command implementations shared by the `asr` binary and its tests.
//!
//! Each command works against a [`RequestStore`] so that reads after a write
//! go back to the repository, the same way an interactive form would.

use std::fmt;

use anyhow::Context;
use asr_core::autosave::{AutosaveBinder, AutosaveOutcome, MutationTracker};
use asr_core::calculations::common::round_half_up;
use asr_core::calculations::{CapStatus, DeductionRates, SalarySummary};
use asr_core::db::{AsrRepository, DbConfig, RepositoryError, RepositoryRegistry, RequestStore};
use asr_core::models::{AmountField, FieldUpdate, FormValues, HcmData, RequestId, RequestRecord};
use asr_core::workflow::{
    PageType, WorkflowAction, WorkflowController, WorkflowError, WorkflowState,
};
use asr_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

/// Every backend compiled into the binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Opens the configured backend behind a fresh [`RequestStore`].
pub async fn open_store(
    registry: &RepositoryRegistry,
    config: &DbConfig,
) -> anyhow::Result<RequestStore<Box<dyn AsrRepository>>> {
    let repo = registry.create(config).await.with_context(|| {
        format!(
            "failed to open {} backend at '{}'",
            config.backend, config.connection_string
        )
    })?;
    Ok(RequestStore::new(repo))
}

/// Creates a request the way the about step's "Continue" does.
pub async fn new_request<R: AsrRepository>(
    store: &RequestStore<R>,
    account_list_id: &str,
) -> Result<RequestId, WorkflowError> {
    let controller = WorkflowController::new(store, account_list_id);
    let state = controller
        .continue_from_about(&WorkflowState::new(PageType::New, None))
        .await?;
    state.request_id.ok_or(WorkflowError::MissingRequest)
}

/// A request together with everything derived from it.
#[derive(Debug, Clone)]
pub struct RequestReport {
    pub record: RequestRecord,
    pub hcm: Option<HcmData>,
    pub summary: SalarySummary,
}

/// Loads a request and computes its summary.
///
/// Staff data is optional: an account without HR data still shows its
/// figures, with a gross salary of zero.
pub async fn show_request<R: AsrRepository>(
    store: &RequestStore<R>,
    id: RequestId,
    rates: &DeductionRates,
) -> anyhow::Result<RequestReport> {
    let record = store
        .get(id)
        .await
        .with_context(|| format!("failed to load request {id}"))?;

    let hcm = match store.repository().get_hcm_data(&record.account_list_id).await {
        Ok(hcm) => Some(hcm),
        Err(RepositoryError::NotFound) => {
            debug!(account_list_id = %record.account_list_id, "no staff data for account");
            None
        }
        Err(err) => return Err(err).context("failed to load staff data"),
    };

    let values = FormValues::from_record(&record);
    let summary = SalarySummary::compute(&values, rates, &record, hcm.as_ref())
        .with_context(|| format!("failed to summarize request {id}"))?;

    Ok(RequestReport {
        record,
        hcm,
        summary,
    })
}

/// Autosaves a single field of an existing request.
pub async fn set_field<R: AsrRepository>(
    store: &RequestStore<R>,
    id: RequestId,
    update: FieldUpdate,
) -> Result<AutosaveOutcome, RepositoryError> {
    let record = store.get(id).await?;
    let mut values = FormValues::from_record(&record);
    AutosaveBinder::new(store, MutationTracker::new())
        .save_field(&mut values, Some(id), update)
        .await
}

/// Result of autosaving one imported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedField {
    pub field: &'static str,
    pub outcome: AutosaveOutcome,
}

/// Autosaves each update in order, as if the user typed them one by one.
///
/// Rejected values are reported and skipped; the first repository failure
/// stops the import.
pub async fn import_fields<R: AsrRepository>(
    store: &RequestStore<R>,
    id: RequestId,
    updates: Vec<FieldUpdate>,
) -> Result<Vec<ImportedField>, RepositoryError> {
    let record = store.get(id).await?;
    let mut values = FormValues::from_record(&record);
    let binder = AutosaveBinder::new(store, MutationTracker::new());

    let mut imported = Vec::with_capacity(updates.len());
    for update in updates {
        let field = update.key();
        let outcome = binder.save_field(&mut values, Some(id), update).await?;
        imported.push(ImportedField { field, outcome });
    }

    let rejected = imported
        .iter()
        .filter(|row| matches!(row.outcome, AutosaveOutcome::Rejected(_)))
        .count();
    info!(%id, rows = imported.len(), rejected, "imported form values");
    Ok(imported)
}

/// Validates the stored values and submits the request from an edit page.
pub async fn submit_request<R: AsrRepository>(
    store: &RequestStore<R>,
    id: RequestId,
) -> Result<WorkflowState, WorkflowError> {
    let record = store.get(id).await?;
    let values = FormValues::from_record(&record);
    let controller = WorkflowController::new(store, record.account_list_id.as_str());
    let state = WorkflowState::new(PageType::Edit, Some(id)).apply(WorkflowAction::NextStep);
    controller.submit(&state, &values).await
}

pub async fn delete_request<R: AsrRepository>(
    store: &RequestStore<R>,
    id: RequestId,
) -> Result<(), RepositoryError> {
    store.delete(id).await
}

pub async fn list_requests<R: AsrRepository>(
    store: &RequestStore<R>,
    account_list_id: &str,
) -> Result<Vec<RequestRecord>, RepositoryError> {
    store.repository().list_requests(account_list_id).await
}

pub fn cap_status_label(status: CapStatus) -> &'static str {
    match status {
        CapStatus::UnderCap => "under cap",
        CapStatus::ExceedsCapSingle => "exceeds cap",
        CapStatus::ExceedsCapMarriedSpouseUnderCap => "exceeds cap, spouse has room",
        CapStatus::ExceedsCapMarriedSpouseOverCap => "exceeds cap, spouse also over cap",
    }
}

impl fmt::Display for RequestReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let record = &self.record;
        let summary = &self.summary;

        writeln!(
            f,
            "Request {} ({}) for account {}",
            record.id,
            record.status.as_str(),
            record.account_list_id
        )?;
        if let Some(hcm) = &self.hcm {
            writeln!(f, "  Staff:  {}", hcm.user.display_name())?;
            if let Some(spouse) = &hcm.spouse {
                writeln!(f, "  Spouse: {}", spouse.display_name())?;
            }
        }

        writeln!(f)?;
        for field in AmountField::ALL {
            let amount = record.amount(field);
            if !amount.is_zero() {
                writeln!(f, "  {:<40} {:>12}", field.config().label, amount)?;
            }
        }

        let deductions = &summary.deductions;
        let figures = [
            ("Total requested", summary.total),
            ("Calculated deduction", deductions.calculated_deduction),
            ("403(b) contributions", deductions.contribution_403b),
            ("Total deduction", deductions.total_deduction),
            ("Net salary", deductions.net_salary),
        ];
        writeln!(f)?;
        for (label, amount) in figures {
            writeln!(f, "  {:<40} {:>12}", label, round_half_up(amount))?;
        }
        writeln!(f, "  {:<40} {:>11}%", "Completion", summary.completion_percentage)?;

        writeln!(f)?;
        writeln!(f, "  Cap status: {}", cap_status_label(summary.cap_status))?;
        writeln!(f, "  {:<40} {:>12}", "Remaining allowance", summary.remaining_allowance)?;
        if let Some(spouse) = summary.spouse_remaining_allowance {
            writeln!(f, "  {:<40} {:>12}", "Spouse remaining allowance", spouse)?;
        }
        if let Some(annual) = &summary.total_annual_salary {
            writeln!(f, "  {:<40} {:>12}", "Gross salary", annual.gross_salary)?;
            writeln!(f, "  {:<40} {:>12}", "Pending requests", annual.pending)?;
            writeln!(f, "  {:<40} {:>12}", "Total annual salary", annual.total)?;
            writeln!(f, "  {:<40} {:>12}", "Over cap by", annual.over_cap_by)?;
        }
        Ok(())
    }
}
