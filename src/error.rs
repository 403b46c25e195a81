use crate::role::Role;
use crate::status::{WorkflowAction, WorkflowStatus};

/// Why an evaluation refused a transition. The two variants warrant different
/// user-facing messages: "not possible here" versus "not allowed for you".
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no {action} transition exists from {from}")]
    NotPossible {
        action: WorkflowAction,
        from: WorkflowStatus,
    },
    #[error("{role} is not permitted to {action} from {from}")]
    NotPermitted {
        action: WorkflowAction,
        from: WorkflowStatus,
        role: Role,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(String),
    #[error("document {0} was modified while the transition was being applied")]
    LostUpdate(String),
}
