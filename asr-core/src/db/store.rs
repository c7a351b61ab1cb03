use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info};

use super::repository::{AsrRepository, RepositoryError};
use crate::models::{RequestId, RequestRecord, RequestUpdate};

/// Read-through cache of requests in front of a repository.
///
/// Cached entries are dropped only after the repository confirms a write:
/// a failed update or delete leaves the cache as it was. A request's
/// calculations include the other requests of its account, so a confirmed
/// write drops every cached request of that account.
pub struct RequestStore<R> {
    repo: R,
    cache: Mutex<HashMap<RequestId, RequestRecord>>,
}

impl<R: AsrRepository> RequestStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn cached(
        &self,
        id: RequestId,
    ) -> Option<RequestRecord> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(&id).cloned())
    }

    fn remember(
        &self,
        record: &RequestRecord,
    ) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(record.id, record.clone());
        }
    }

    /// Drops every cached request sharing `id`'s account. Without a cached
    /// entry the account is unknown and the whole cache is dropped.
    fn forget_account_of(
        &self,
        id: RequestId,
    ) {
        let Ok(mut cache) = self.cache.lock() else {
            return;
        };
        match cache.get(&id).map(|record| record.account_list_id.clone()) {
            Some(account_list_id) => {
                cache.retain(|_, record| record.account_list_id != account_list_id);
            }
            None => cache.clear(),
        }
    }

    pub fn is_cached(
        &self,
        id: RequestId,
    ) -> bool {
        self.cached(id).is_some()
    }

    pub async fn create(
        &self,
        account_list_id: &str,
    ) -> Result<RequestRecord, RepositoryError> {
        let record = self.repo.create_request(account_list_id).await?;
        info!(id = %record.id, account_list_id, "created salary request");
        self.remember(&record);
        Ok(record)
    }

    pub async fn get(
        &self,
        id: RequestId,
    ) -> Result<RequestRecord, RepositoryError> {
        if let Some(record) = self.cached(id) {
            debug!(%id, "request served from cache");
            return Ok(record);
        }
        let record = self.repo.get_request(id).await?;
        self.remember(&record);
        Ok(record)
    }

    pub async fn update(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<(), RepositoryError> {
        self.repo.update_request(id, update).await?;
        self.forget_account_of(id);
        Ok(())
    }

    pub async fn submit(
        &self,
        id: RequestId,
    ) -> Result<(), RepositoryError> {
        self.repo.submit_request(id).await?;
        info!(%id, "submitted salary request");
        self.forget_account_of(id);
        Ok(())
    }

    pub async fn delete(
        &self,
        id: RequestId,
    ) -> Result<(), RepositoryError> {
        self.repo.delete_request(id).await?;
        info!(%id, "deleted salary request");
        self.forget_account_of(id);
        Ok(())
    }
}
