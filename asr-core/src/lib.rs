pub mod autosave;
pub mod calculations;
pub mod db;
pub mod models;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use db::repository::{AsrRepository, RepositoryError};
pub use models::*;
