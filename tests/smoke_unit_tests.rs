//! Smoke Screen Unit tests for workflow engine components
//!
//! These test are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. These are intended as smoke-screen
//! and generally test the happy-path.
//!

use document_approval::{
    document::DocumentType,
    role::Role,
    rules,
    status::{WorkflowAction, WorkflowStatus},
    utils::new_scoped_id,
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Test that new_scoped_id generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let result = new_scoped_id("doc_");
        assert!(result.is_ok());

        let encoded = result.unwrap();
        assert!(encoded.starts_with("doc_1"));
        assert!(encoded.len() > 10); // UUID should produce substantial output
    }

    /// Test that the function handles empty strings appropriately
    #[test]
    fn handles_empty_hrp() {
        // Empty string should fail
        let result = new_scoped_id("");
        assert!(result.is_err());
    }

    /// Test that multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_scoped_id("doc_").unwrap();
        let id2 = new_scoped_id("doc_").unwrap();
        let id3 = new_scoped_id("doc_").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}

// STATUS MODULE TESTS
#[cfg(test)]
mod status_tests {
    use super::*;

    /// Approved persists as "approved" for a PJO but as "active" for a job order
    #[test]
    fn approved_diverges_per_document_type() {
        assert_eq!(
            WorkflowStatus::Approved.as_persisted(DocumentType::PreJobOrder),
            "approved"
        );
        assert_eq!(
            WorkflowStatus::Approved.as_persisted(DocumentType::JobOrder),
            "active"
        );
        assert_eq!(
            WorkflowStatus::Approved.as_persisted(DocumentType::CashDisbursement),
            "approved"
        );
    }

    /// Test that every document vocabulary maps back to canonical form
    #[test]
    fn legacy_vocabularies_map_to_canonical() {
        assert_eq!(
            WorkflowStatus::try_from_persisted("submitted"),
            Some(WorkflowStatus::PendingCheck)
        );
        assert_eq!(
            WorkflowStatus::try_from_persisted("verified"),
            Some(WorkflowStatus::Checked)
        );
        assert_eq!(
            WorkflowStatus::try_from_persisted("cancelled"),
            Some(WorkflowStatus::Rejected)
        );
        assert_eq!(
            WorkflowStatus::try_from_persisted("pending_approval"),
            Some(WorkflowStatus::PendingCheck)
        );
    }

    /// Unrecognized strings fall back to Draft in the lenient mapping and
    /// to None in the strict one
    #[test]
    fn unrecognized_status_defaults_to_draft() {
        assert_eq!(WorkflowStatus::try_from_persisted("on_hold"), None);
        assert_eq!(
            WorkflowStatus::from_persisted("on_hold"),
            WorkflowStatus::Draft
        );
    }

    #[test]
    fn only_approved_and_rejected_are_terminal() {
        assert!(WorkflowStatus::Approved.is_terminal());
        assert!(WorkflowStatus::Rejected.is_terminal());
        assert!(!WorkflowStatus::Draft.is_terminal());
        assert!(!WorkflowStatus::PendingCheck.is_terminal());
        assert!(!WorkflowStatus::Checked.is_terminal());
    }
}

// ROLE MODULE TESTS
#[cfg(test)]
mod role_tests {
    use super::*;

    /// Test that every role round-trips through its stored string
    #[test]
    fn roles_round_trip_through_strings() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    /// "ops" is a legacy alias that still parses
    #[test]
    fn ops_alias_parses_to_operations() {
        assert_eq!(Role::parse("ops"), Some(Role::Operations));
        assert_eq!(Role::parse("operations"), Some(Role::Operations));
    }

    #[test]
    fn unknown_role_is_none() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }
}

// RULES MODULE TESTS
#[cfg(test)]
mod rules_tests {
    use super::*;

    /// Administration submits a draft job order into pending check
    #[test]
    fn administration_submits_job_order() {
        assert_eq!(
            rules::target_status(
                DocumentType::JobOrder,
                WorkflowAction::Submit,
                WorkflowStatus::Draft
            ),
            Some(WorkflowStatus::PendingCheck)
        );
        assert!(rules::can_transition(
            DocumentType::JobOrder,
            WorkflowStatus::Draft,
            WorkflowStatus::PendingCheck,
            Role::Administration
        ));
    }

    /// Approve has no rule from Draft, not even for the owner
    #[test]
    fn approve_from_draft_has_no_target() {
        assert_eq!(
            rules::target_status(
                DocumentType::JobOrder,
                WorkflowAction::Approve,
                WorkflowStatus::Draft
            ),
            None
        );
    }

    /// The check rule exists from pending check, but operations is not in
    /// its allowed set
    #[test]
    fn operations_is_not_a_checker() {
        assert_eq!(
            rules::target_status(
                DocumentType::CashDisbursement,
                WorkflowAction::Check,
                WorkflowStatus::PendingCheck
            ),
            Some(WorkflowStatus::Checked)
        );
        assert!(!rules::can_transition(
            DocumentType::CashDisbursement,
            WorkflowStatus::PendingCheck,
            WorkflowStatus::Checked,
            Role::Operations
        ));
    }

    /// Only disbursements let plain finance staff submit
    #[test]
    fn finance_submit_is_disbursement_only() {
        assert!(rules::can_transition(
            DocumentType::CashDisbursement,
            WorkflowStatus::Draft,
            WorkflowStatus::PendingCheck,
            Role::Finance
        ));
        assert!(!rules::can_transition(
            DocumentType::JobOrder,
            WorkflowStatus::Draft,
            WorkflowStatus::PendingCheck,
            Role::Finance
        ));
        assert!(!rules::can_transition(
            DocumentType::PreJobOrder,
            WorkflowStatus::Draft,
            WorkflowStatus::PendingCheck,
            Role::Finance
        ));
    }

    /// A director sitting on a checked document can approve or reject it
    #[test]
    fn director_choices_from_checked() {
        let mut actions = rules::available_actions(
            DocumentType::PreJobOrder,
            WorkflowStatus::Checked,
            Role::Director,
        );
        actions.sort_by_key(|action| action.as_str());

        assert_eq!(actions, vec![WorkflowAction::Approve, WorkflowAction::Reject]);
    }

    /// Roles with no rules in a state get an empty action list
    #[test]
    fn operations_has_no_actions_anywhere() {
        for status in WorkflowStatus::ALL {
            for document_type in DocumentType::ALL {
                assert!(
                    rules::available_actions(document_type, status, Role::Operations).is_empty()
                );
            }
        }
    }
}

// DOCUMENT MODULE TESTS
#[cfg(test)]
mod document_tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(DocumentType::PreJobOrder.code(), "PJO");
        assert_eq!(DocumentType::JobOrder.code(), "JO");
        assert_eq!(DocumentType::CashDisbursement.code(), "BKK");
    }
}
