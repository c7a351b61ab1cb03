use serde::{Deserialize, Serialize};
use tracing::debug;

use super::step::{PageType, Step};
use crate::models::RequestId;

/// Every transition the form can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowAction {
    NextStep,
    PreviousStep,
    /// Jump from the section list.
    GoToStep(Step),
    RequestCreated(RequestId),
    ToggleDrawer,
    SetPageType(PageType),
}

/// Where the user is in the form.
///
/// Once the workflow reaches [`Step::Receipt`] no step action moves it;
/// leaving the receipt is a navigation concern of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub step: Step,
    pub page_type: PageType,
    pub request_id: Option<RequestId>,
    pub is_drawer_open: bool,
}

impl WorkflowState {
    pub fn new(
        page_type: PageType,
        request_id: Option<RequestId>,
    ) -> Self {
        Self {
            step: Step::AboutForm,
            page_type,
            request_id,
            is_drawer_open: false,
        }
    }

    /// Whether "Continue" on the about step must create a request first.
    pub fn needs_request(&self) -> bool {
        self.page_type == PageType::New && self.request_id.is_none()
    }

    /// Returns the state after `action`; `self` is left untouched.
    #[must_use]
    pub fn apply(
        &self,
        action: WorkflowAction,
    ) -> Self {
        let mut next = *self;
        match action {
            WorkflowAction::NextStep => next.step = self.step.next(),
            WorkflowAction::PreviousStep if !self.step.is_terminal() => {
                next.step = self.step.previous();
            }
            WorkflowAction::GoToStep(step) if !self.step.is_terminal() => next.step = step,
            WorkflowAction::PreviousStep | WorkflowAction::GoToStep(_) => {}
            WorkflowAction::RequestCreated(id) => next.request_id = Some(id),
            WorkflowAction::ToggleDrawer => next.is_drawer_open = !self.is_drawer_open,
            WorkflowAction::SetPageType(page_type) => next.page_type = page_type,
        }
        debug!(?action, from = ?self.step, to = ?next.step, "workflow transition");
        next
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(PageType::New, None)
    }
}
