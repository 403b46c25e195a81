//! Per-document-type transition tables and the pure evaluator.
//!
//! The tables are static configuration: each document type owns the complete
//! and exclusive list of its legal transitions, and for a given (from, action)
//! pair at most one destination exists. Terminal statuses simply have no
//! outgoing rules; nothing special-cases them.
//!
//! All evaluation here is pure and stateless. "Not allowed" outcomes are
//! values (`false`, `None`, a typed rejection), never panics.

use crate::document::DocumentType;
use crate::error::TransitionError;
use crate::role::Role;
use crate::status::{WorkflowAction, WorkflowStatus};
use std::sync::LazyLock;

#[derive(Debug)]
pub struct TransitionRule {
    pub from: WorkflowStatus,
    pub to: WorkflowStatus,
    pub action: WorkflowAction,
    pub allowed_roles: &'static [Role],
}

#[derive(Debug)]
pub struct TransitionTable {
    rules: &'static [TransitionRule],
}

const SUBMITTER_ROLES: &[Role] = &[
    Role::Administration,
    Role::FinanceManager,
    Role::Director,
    Role::Owner,
];

// Disbursements are the one table that lets plain finance staff submit.
const DISBURSEMENT_SUBMITTER_ROLES: &[Role] = &[
    Role::Administration,
    Role::Finance,
    Role::FinanceManager,
    Role::Director,
    Role::Owner,
];

const CHECKER_ROLES: &[Role] = &[Role::FinanceManager, Role::Director, Role::Owner];

const APPROVER_ROLES: &[Role] = &[Role::Director, Role::Owner];

static PRE_JOB_ORDER_TABLE: TransitionTable = TransitionTable {
    rules: &[
        TransitionRule {
            from: WorkflowStatus::Draft,
            to: WorkflowStatus::PendingCheck,
            action: WorkflowAction::Submit,
            allowed_roles: SUBMITTER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Checked,
            action: WorkflowAction::Check,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Approved,
            action: WorkflowAction::Approve,
            allowed_roles: APPROVER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: APPROVER_ROLES,
        },
    ],
};

static JOB_ORDER_TABLE: TransitionTable = TransitionTable {
    rules: &[
        TransitionRule {
            from: WorkflowStatus::Draft,
            to: WorkflowStatus::PendingCheck,
            action: WorkflowAction::Submit,
            allowed_roles: SUBMITTER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Checked,
            action: WorkflowAction::Check,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Approved,
            action: WorkflowAction::Approve,
            allowed_roles: APPROVER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: APPROVER_ROLES,
        },
    ],
};

static CASH_DISBURSEMENT_TABLE: TransitionTable = TransitionTable {
    rules: &[
        TransitionRule {
            from: WorkflowStatus::Draft,
            to: WorkflowStatus::PendingCheck,
            action: WorkflowAction::Submit,
            allowed_roles: DISBURSEMENT_SUBMITTER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Checked,
            action: WorkflowAction::Check,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Approved,
            action: WorkflowAction::Approve,
            allowed_roles: APPROVER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::PendingCheck,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: CHECKER_ROLES,
        },
        TransitionRule {
            from: WorkflowStatus::Checked,
            to: WorkflowStatus::Rejected,
            action: WorkflowAction::Reject,
            allowed_roles: APPROVER_ROLES,
        },
    ],
};

fn table_for(document_type: DocumentType) -> &'static TransitionTable {
    match document_type {
        DocumentType::PreJobOrder => &PRE_JOB_ORDER_TABLE,
        DocumentType::JobOrder => &JOB_ORDER_TABLE,
        DocumentType::CashDisbursement => &CASH_DISBURSEMENT_TABLE,
    }
}

// The evaluator assumes function-like lookup on (from, action); a table
// violating that is a configuration error, caught once before first use.
static TABLES_VALIDATED: LazyLock<()> = LazyLock::new(|| {
    for document_type in DocumentType::ALL {
        table_for(document_type).assert_unambiguous(document_type);
    }
});

impl TransitionTable {
    /// Registry lookup for the table owned by a document type.
    pub fn for_document(document_type: DocumentType) -> &'static TransitionTable {
        LazyLock::force(&TABLES_VALIDATED);
        table_for(document_type)
    }

    pub fn rules(&self) -> &[TransitionRule] {
        self.rules
    }

    fn assert_unambiguous(&self, document_type: DocumentType) {
        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                assert!(
                    !(a.from == b.from && a.action == b.action && a.to != b.to),
                    "ambiguous transition table for {document_type}: {} from {} maps to both {} and {}",
                    a.action,
                    a.from,
                    a.to,
                    b.to,
                );
            }
        }
    }

    /// True iff a rule matches the statuses and the role is in its allowed set.
    /// Absence of a match is a normal `false`, not a failure.
    pub fn can_transition(&self, from: WorkflowStatus, to: WorkflowStatus, role: Role) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.from == from && rule.to == to && rule.allowed_roles.contains(&role))
    }

    /// Every action the role may take from the current status, destination
    /// ignored. Feeds action menus in the surrounding application.
    pub fn available_actions(&self, current: WorkflowStatus, role: Role) -> Vec<WorkflowAction> {
        self.rules
            .iter()
            .filter(|rule| rule.from == current && rule.allowed_roles.contains(&role))
            .map(|rule| rule.action)
            .collect()
    }

    /// The unique destination for applying `action` from `current`, before
    /// any role check. `None` when no rule matches, e.g. any action from a
    /// terminal status.
    pub fn target_status(
        &self,
        action: WorkflowAction,
        current: WorkflowStatus,
    ) -> Option<WorkflowStatus> {
        self.rules
            .iter()
            .find(|rule| rule.action == action && rule.from == current)
            .map(|rule| rule.to)
    }
}

pub fn can_transition(
    document_type: DocumentType,
    from: WorkflowStatus,
    to: WorkflowStatus,
    role: Role,
) -> bool {
    TransitionTable::for_document(document_type).can_transition(from, to, role)
}

pub fn available_actions(
    document_type: DocumentType,
    current: WorkflowStatus,
    role: Role,
) -> Vec<WorkflowAction> {
    TransitionTable::for_document(document_type).available_actions(current, role)
}

pub fn target_status(
    document_type: DocumentType,
    action: WorkflowAction,
    current: WorkflowStatus,
) -> Option<WorkflowStatus> {
    TransitionTable::for_document(document_type).target_status(action, current)
}

/// What an accepted evaluation resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub new_status: WorkflowStatus,
    pub new_persisted_status: &'static str,
}

/// Resolve a requested action against a document's persisted status.
///
/// Structural rejection (no rule for this action here) and authorization
/// rejection (rule exists, role not allowed) come back as distinct variants
/// so callers can word their messages precisely.
pub fn evaluate(
    document_type: DocumentType,
    current_persisted: &str,
    action: WorkflowAction,
    role: Role,
) -> Result<Evaluation, TransitionError> {
    let from = WorkflowStatus::from_persisted(current_persisted);
    let table = TransitionTable::for_document(document_type);

    let to = match table.target_status(action, from) {
        Some(to) => to,
        None => return Err(TransitionError::NotPossible { action, from }),
    };

    if !table.can_transition(from, to, role) {
        return Err(TransitionError::NotPermitted { action, from, role });
    }

    Ok(Evaluation {
        new_status: to,
        new_persisted_status: to.as_persisted(document_type),
    })
}
