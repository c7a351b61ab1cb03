use async_trait::async_trait;
use thiserror::Error;

use crate::models::{HcmData, RequestId, RequestRecord, RequestUpdate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for Additional Salary Requests and the staff data they depend on.
#[async_trait]
pub trait AsrRepository: Send + Sync {
    // Requests
    async fn create_request(&self, account_list_id: &str) -> Result<RequestRecord, RepositoryError>;

    async fn get_request(&self, id: RequestId) -> Result<RequestRecord, RepositoryError>;

    /// Writes the changed fields and the recomputed total.
    ///
    /// Fails with [`RepositoryError::InvalidState`] unless the request is
    /// still in progress.
    async fn update_request(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<(), RepositoryError>;

    /// Moves an in-progress request to pending.
    async fn submit_request(&self, id: RequestId) -> Result<(), RepositoryError>;

    async fn delete_request(&self, id: RequestId) -> Result<(), RepositoryError>;

    async fn list_requests(
        &self,
        account_list_id: &str,
    ) -> Result<Vec<RequestRecord>, RepositoryError>;

    // Staff
    async fn get_hcm_data(&self, account_list_id: &str) -> Result<HcmData, RepositoryError>;
}

#[async_trait]
impl<T: AsrRepository + ?Sized> AsrRepository for Box<T> {
    async fn create_request(&self, account_list_id: &str) -> Result<RequestRecord, RepositoryError> {
        (**self).create_request(account_list_id).await
    }

    async fn get_request(&self, id: RequestId) -> Result<RequestRecord, RepositoryError> {
        (**self).get_request(id).await
    }

    async fn update_request(
        &self,
        id: RequestId,
        update: &RequestUpdate,
    ) -> Result<(), RepositoryError> {
        (**self).update_request(id, update).await
    }

    async fn submit_request(&self, id: RequestId) -> Result<(), RepositoryError> {
        (**self).submit_request(id).await
    }

    async fn delete_request(&self, id: RequestId) -> Result<(), RepositoryError> {
        (**self).delete_request(id).await
    }

    async fn list_requests(
        &self,
        account_list_id: &str,
    ) -> Result<Vec<RequestRecord>, RepositoryError> {
        (**self).list_requests(account_list_id).await
    }

    async fn get_hcm_data(&self, account_list_id: &str) -> Result<HcmData, RepositoryError> {
        (**self).get_hcm_data(account_list_id).await
    }
}
