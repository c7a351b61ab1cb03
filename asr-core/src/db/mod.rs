pub mod factory;
pub mod repository;
pub mod store;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use repository::{AsrRepository, RepositoryError};
pub use store::RequestStore;
