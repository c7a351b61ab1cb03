//! In-memory repository used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;

use crate::db::{AsrRepository, RepositoryError};
use crate::models::{HcmData, HcmUser, RequestId, RequestRecord, RequestStatus, RequestUpdate};

#[derive(Default)]
pub struct MemoryRepository {
    requests: Mutex<HashMap<RequestId, RequestRecord>>,
    next_id: AtomicUsize,
    pub updates: Mutex<Vec<(RequestId, RequestUpdate)>>,
    pub get_calls: AtomicUsize,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        record: RequestRecord,
    ) {
        self.requests.lock().unwrap().insert(record.id, record);
    }

    pub fn record(
        &self,
        id: RequestId,
    ) -> Option<RequestRecord> {
        self.requests.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl AsrRepository for MemoryRepository {
    async fn create_request(&self, account_list_id: &str) -> Result<RequestRecord, RepositoryError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("create failed".to_string()));
        }
        let id = RequestId(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
        let record = RequestRecord::new(id, account_list_id, Utc::now());
        self.insert(record.clone());
        Ok(record)
    }

    async fn get_request(&self, id: RequestId) -> Result<RequestRecord, RepositoryError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.record(id).ok_or(RepositoryError::NotFound)
    }

    async fn update_request(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<(), RepositoryError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection("update failed".to_string()));
        }
        let mut requests = self.requests.lock().unwrap();
        let record = requests.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if !record.status.is_editable() {
            return Err(RepositoryError::InvalidState(format!(
                "request {id} is {}",
                record.status.as_str()
            )));
        }
        record.apply_update(update);
        self.updates.lock().unwrap().push((id, update.clone()));
        Ok(())
    }

    async fn submit_request(&self, id: RequestId) -> Result<(), RepositoryError> {
        let mut requests = self.requests.lock().unwrap();
        let record = requests.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if !record.status.is_editable() {
            return Err(RepositoryError::InvalidState(format!(
                "request {id} is {}",
                record.status.as_str()
            )));
        }
        record.status = RequestStatus::Pending;
        record.submitted_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_request(&self, id: RequestId) -> Result<(), RepositoryError> {
        self.requests
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_requests(
        &self,
        account_list_id: &str,
    ) -> Result<Vec<RequestRecord>, RepositoryError> {
        let mut records: Vec<_> = self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.account_list_id == account_list_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    async fn get_hcm_data(&self, _account_list_id: &str) -> Result<HcmData, RepositoryError> {
        Ok(HcmData {
            user: HcmUser {
                staff_id: "000123".to_string(),
                given_name: "Pat".to_string(),
                family_name: "Doe".to_string(),
                gross_salary: dec!(48000),
            },
            spouse: None,
        })
    }
}
