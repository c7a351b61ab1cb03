//! Step sequencing for the request form.
//!
//! [`WorkflowState`] is a plain value; every transition goes through
//! [`WorkflowState::apply`]. [`WorkflowController`] runs the transitions
//! that need the repository (creating and submitting a request).

pub mod controller;
pub mod state;
pub mod step;

pub use controller::{WorkflowController, WorkflowError};
pub use state::{WorkflowAction, WorkflowState};
pub use step::{PageType, Step};
