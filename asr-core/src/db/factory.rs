//! Opening the request repository by backend name.
//!
//! The binary registers each compiled-in backend once and opens whichever
//! one the `[database]` section of its configuration names. The resulting
//! repository is then wrapped in a [`RequestStore`](super::RequestStore).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::repository::{AsrRepository, RepositoryError};

/// Where salary requests and staff data are stored.
///
/// Only `sqlite` ships today. Its connection string is a database file,
/// created with the schema and demo staff on first open, or `:memory:`
/// for a throwaway database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "asr.db".to_string(),
        }
    }
}

/// Opens an [`AsrRepository`] for one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Connects and brings the schema up to date before returning.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn AsrRepository>, RepositoryError>;
}

/// Backends the binary can open, keyed by name.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A later factory with the same name wins.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Sorted so the unknown-backend message is stable.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the repository named by `config.backend`.
    ///
    /// # Errors
    /// [`RepositoryError::Configuration`] listing the registered backends
    /// when none matches; otherwise whatever the backend fails with while
    /// connecting or migrating.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn AsrRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };

        debug!(backend = %config.backend, "opening request repository");
        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
