use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use asr_core::{
    AmountField, AsrRepository, Calculations, FieldChange, HcmData, HcmUser, MaxAmountAndReason,
    RepositoryError, RequestId, RequestRecord, RequestStatus, RequestUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

/// Statuses whose totals count against the staff member's cap.
const COUNTED_STATUSES: [RequestStatus; 3] = [
    RequestStatus::Pending,
    RequestStatus::ActionRequired,
    RequestStatus::Approved,
];

static REQUEST_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    let amounts: Vec<&str> = AmountField::ALL.iter().map(|field| field.column()).collect();
    format!(
        "id, account_list_id, status, {}, phone_number, email_address, additional_info,
         deduct_tax_deferred_percent, deduct_roth_percent, total_additional_salary_requested,
         submitted_at, created_at, updated_at",
        amounts.join(", ")
    )
});

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if needed.
    ///
    /// In-memory databases are held on a single long-lived connection so the
    /// data survives between queries.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database url: {}", database_url))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Distinguishes a missing request from one that no longer accepts writes.
    async fn rejected_write(
        &self,
        id: RequestId,
    ) -> RepositoryError {
        let status = sqlx::query("SELECT status FROM additional_salary_request WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await;

        match status {
            Ok(Some(row)) => match get::<String>(&row, "status") {
                Ok(status) => RepositoryError::InvalidState(format!("request {id} is {status}")),
                Err(e) => e,
            },
            Ok(None) => RepositoryError::NotFound,
            Err(e) => RepositoryError::Database(e.to_string()),
        }
    }

    /// Sum of this account's other requests that already count against the cap.
    async fn pending_total(
        &self,
        account_list_id: &str,
        exclude: RequestId,
    ) -> Result<Decimal, RepositoryError> {
        let rows = sqlx::query(
            "SELECT total_additional_salary_requested
             FROM additional_salary_request
             WHERE account_list_id = ? AND id <> ? AND status IN (?, ?, ?)",
        )
        .bind(account_list_id)
        .bind(exclude.0)
        .bind(COUNTED_STATUSES[0].as_str())
        .bind(COUNTED_STATUSES[1].as_str())
        .bind(COUNTED_STATUSES[2].as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().try_fold(Decimal::ZERO, |sum, row| -> Result<Decimal, RepositoryError> {
            Ok(sum + get_decimal(row, "total_additional_salary_requested")?)
        })
    }

    async fn staff_rows(
        &self,
        account_list_id: &str,
    ) -> Result<Vec<SqliteRow>, RepositoryError> {
        sqlx::query(
            "SELECT is_spouse, staff_id, given_name, family_name, gross_salary,
                    current_salary_cap, staff_account_balance, predicted_year_income,
                    pending_asr_amount, max_amount, max_amount_reason
             FROM staff WHERE account_list_id = ? ORDER BY is_spouse",
        )
        .bind(account_list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))
    }

    /// Attaches the staff and spouse calculations to a request row.
    async fn with_calculations(
        &self,
        mut record: RequestRecord,
    ) -> Result<RequestRecord, RepositoryError> {
        for row in self.staff_rows(&record.account_list_id).await? {
            if get::<bool>(&row, "is_spouse")? {
                let pending = get_decimal(&row, "pending_asr_amount")?;
                record.spouse_calculations = Some(row_to_calculations(&row, pending)?);
            } else {
                let pending = self.pending_total(&record.account_list_id, record.id).await?;
                record.calculations = Some(row_to_calculations(&row, pending)?);
            }
        }
        Ok(record)
    }
}

fn get<'r, T>(
    row: &'r SqliteRow,
    column: &str,
) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_request(row: &SqliteRow) -> Result<RequestRecord, RepositoryError> {
    let status_code: String = get(row, "status")?;
    let status = RequestStatus::parse(&status_code).ok_or_else(|| {
        RepositoryError::Database(format!("Invalid request status: {}", status_code))
    })?;

    let mut amounts = [Decimal::ZERO; 15];
    for field in AmountField::ALL {
        amounts[field.index()] = get_decimal(row, field.column())?;
    }

    Ok(RequestRecord {
        id: RequestId(get(row, "id")?),
        account_list_id: get(row, "account_list_id")?,
        status,
        amounts,
        phone_number: get(row, "phone_number")?,
        email_address: get(row, "email_address")?,
        additional_info: get(row, "additional_info")?,
        deduct_tax_deferred_percent: get(row, "deduct_tax_deferred_percent")?,
        deduct_roth_percent: get(row, "deduct_roth_percent")?,
        total_additional_salary_requested: get_decimal(row, "total_additional_salary_requested")?,
        calculations: None,
        spouse_calculations: None,
        submitted_at: get::<Option<DateTime<Utc>>>(row, "submitted_at")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

fn row_to_calculations(
    row: &SqliteRow,
    pending_asr_amount: Decimal,
) -> Result<Calculations, RepositoryError> {
    let max_amount_and_reason = get_optional_decimal(row, "max_amount")?
        .map(|amount| -> Result<_, RepositoryError> {
            Ok(MaxAmountAndReason {
                amount,
                reason: get::<Option<String>>(row, "max_amount_reason")?.unwrap_or_default(),
            })
        })
        .transpose()?;

    Ok(Calculations {
        current_salary_cap: get_decimal(row, "current_salary_cap")?,
        staff_account_balance: get_decimal(row, "staff_account_balance")?,
        predicted_year_income: get_decimal(row, "predicted_year_income")?,
        pending_asr_amount,
        max_amount_and_reason,
    })
}

fn row_to_hcm_user(row: &SqliteRow) -> Result<HcmUser, RepositoryError> {
    Ok(HcmUser {
        staff_id: get(row, "staff_id")?,
        given_name: get(row, "given_name")?,
        family_name: get(row, "family_name")?,
        gross_salary: get_decimal(row, "gross_salary")?,
    })
}

#[async_trait]
impl AsrRepository for SqliteRepository {
    async fn create_request(
        &self,
        account_list_id: &str,
    ) -> Result<RequestRecord, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO additional_salary_request (account_list_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(account_list_id)
        .bind(RequestStatus::InProgress.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        self.get_request(RequestId(result.last_insert_rowid())).await
    }

    async fn get_request(
        &self,
        id: RequestId,
    ) -> Result<RequestRecord, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM additional_salary_request WHERE id = ?",
            *REQUEST_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        self.with_calculations(row_to_request(&row)?).await
    }

    async fn update_request(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<(), RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE additional_salary_request SET ");
        {
            let mut set = builder.separated(", ");
            for change in &update.changes {
                match change {
                    FieldChange::Amount(field, amount) => {
                        set.push(format!("{} = ", field.column()));
                        set.push_bind_unseparated(decimal_to_text(*amount));
                    }
                    FieldChange::Text(field, value) => {
                        set.push(format!("{} = ", field.column()));
                        set.push_bind_unseparated(value.clone());
                    }
                    FieldChange::Election(election, value) => {
                        set.push(format!("{} = ", election.column()));
                        set.push_bind_unseparated(*value);
                    }
                }
            }
            set.push("total_additional_salary_requested = ");
            set.push_bind_unseparated(decimal_to_text(update.total_additional_salary_requested));
            set.push("updated_at = ");
            set.push_bind_unseparated(Utc::now());
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.0)
            .push(" AND status = ")
            .push_bind(RequestStatus::InProgress.as_str());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.rejected_write(id).await);
        }

        debug!(%id, changes = update.changes.len(), "updated request");
        Ok(())
    }

    async fn submit_request(
        &self,
        id: RequestId,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE additional_salary_request
             SET status = ?, submitted_at = ?, updated_at = ?
             WHERE id = ? AND status = ?",
        )
        .bind(RequestStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .bind(id.0)
        .bind(RequestStatus::InProgress.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.rejected_write(id).await);
        }

        Ok(())
    }

    async fn delete_request(
        &self,
        id: RequestId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM additional_salary_request WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_requests(
        &self,
        account_list_id: &str,
    ) -> Result<Vec<RequestRecord>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM additional_salary_request WHERE account_list_id = ? ORDER BY id",
            *REQUEST_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(account_list_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(self.with_calculations(row_to_request(row)?).await?);
        }
        Ok(records)
    }

    async fn get_hcm_data(
        &self,
        account_list_id: &str,
    ) -> Result<HcmData, RepositoryError> {
        let mut user = None;
        let mut spouse = None;
        for row in self.staff_rows(account_list_id).await? {
            if get::<bool>(&row, "is_spouse")? {
                spouse = Some(row_to_hcm_user(&row)?);
            } else {
                user = Some(row_to_hcm_user(&row)?);
            }
        }

        Ok(HcmData {
            user: user.ok_or(RepositoryError::NotFound)?,
            spouse,
        })
    }
}
