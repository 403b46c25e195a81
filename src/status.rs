//! Canonical workflow vocabulary and the persisted-status mapper.
//!
//! Every document type stores its status as a legacy string vocabulary that
//! drifted independently before the workflow was unified. The engine works
//! only in the canonical five-state vocabulary; this module translates in
//! both directions.

use crate::document::DocumentType;
use std::fmt;

/// The five canonical states a document moves through.
///
/// `Approved` and `Rejected` are terminal; nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub enum WorkflowStatus {
    #[n(0)]
    Draft,
    #[n(1)]
    PendingCheck,
    #[n(2)]
    Checked,
    #[n(3)]
    Approved,
    #[n(4)]
    Rejected,
}

/// The intent a caller states. Combined with the current status it resolves
/// to at most one destination status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub enum WorkflowAction {
    #[n(0)]
    Submit,
    #[n(1)]
    Check,
    #[n(2)]
    Approve,
    #[n(3)]
    Reject,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 5] = [
        WorkflowStatus::Draft,
        WorkflowStatus::PendingCheck,
        WorkflowStatus::Checked,
        WorkflowStatus::Approved,
        WorkflowStatus::Rejected,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::Approved | WorkflowStatus::Rejected)
    }

    /// Strict mapping from a persisted status string, across the union of all
    /// document vocabularies. Returns `None` for anything unrecognized.
    pub fn try_from_persisted(raw: &str) -> Option<Self> {
        match raw {
            "draft" => Some(WorkflowStatus::Draft),
            "pending_check" | "submitted" | "pending_approval" => Some(WorkflowStatus::PendingCheck),
            "checked" | "verified" => Some(WorkflowStatus::Checked),
            "approved" | "active" => Some(WorkflowStatus::Approved),
            "rejected" | "cancelled" => Some(WorkflowStatus::Rejected),
            _ => None,
        }
    }

    /// Mapping with the legacy fallback: unrecognized strings become `Draft`.
    ///
    /// The fallback can mask bad data upstream, so it is logged. Callers that
    /// would rather fail should use [`WorkflowStatus::try_from_persisted`].
    pub fn from_persisted(raw: &str) -> Self {
        match Self::try_from_persisted(raw) {
            Some(status) => status,
            None => {
                tracing::warn!(status = raw, "unrecognized persisted status, defaulting to draft");
                WorkflowStatus::Draft
            }
        }
    }

    /// The string a given document type persists for this status.
    pub fn as_persisted(self, document_type: DocumentType) -> &'static str {
        use DocumentType::*;
        use WorkflowStatus::*;

        match (document_type, self) {
            (PreJobOrder, Draft) => "draft",
            (PreJobOrder, PendingCheck) => "pending_check",
            (PreJobOrder, Checked) => "checked",
            (PreJobOrder, Approved) => "approved",
            (PreJobOrder, Rejected) => "rejected",

            // Job orders predate the unified vocabulary; an approved job
            // order is "active" and a rejected one "cancelled".
            (JobOrder, Draft) => "draft",
            (JobOrder, PendingCheck) => "submitted",
            (JobOrder, Checked) => "verified",
            (JobOrder, Approved) => "active",
            (JobOrder, Rejected) => "cancelled",

            (CashDisbursement, Draft) => "draft",
            (CashDisbursement, PendingCheck) => "pending_approval",
            (CashDisbursement, Checked) => "checked",
            (CashDisbursement, Approved) => "approved",
            (CashDisbursement, Rejected) => "rejected",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::PendingCheck => "pending_check",
            WorkflowStatus::Checked => "checked",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
        }
    }
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 4] = [
        WorkflowAction::Submit,
        WorkflowAction::Check,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::Submit => "submit",
            WorkflowAction::Check => "check",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
