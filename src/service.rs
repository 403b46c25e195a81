//! Service layer API for document workflow operations
use crate::audit::{AuditActor, AuditLog, AuditRecord};
use crate::document::{DocumentRecord, DocumentType};
use crate::error::StoreError;
use crate::role::Role;
use crate::rules::{self, TransitionTable};
use crate::status::{WorkflowAction, WorkflowStatus};
use chrono::{Datelike, Utc};
use std::sync::Arc;

pub struct WorkflowService {
    documents: sled::Tree,
    counters: sled::Tree,
    audit: AuditLog,
}

/// What an accepted transition produced.
#[derive(Debug)]
pub struct TransitionOutcome {
    pub document: DocumentRecord,
    pub status_from: WorkflowStatus,
    pub status_to: WorkflowStatus,
}

fn counter_value(bytes: Option<&[u8]>) -> u64 {
    match bytes {
        Some(raw) if raw.len() == 8 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(raw);
            u64::from_be_bytes(buf)
        }
        _ => 0,
    }
}

impl WorkflowService {
    pub fn new(instance: Arc<sled::Db>) -> anyhow::Result<Self> {
        let documents = instance.open_tree("documents")?;
        let counters = instance.open_tree("counters")?;
        let audit = AuditLog::open(&instance)?;

        Ok(Self {
            documents,
            counters,
            audit,
        })
    }

    /// Create a new document in Draft with a generated sequential number.
    pub fn register(&self, document_type: DocumentType) -> anyhow::Result<DocumentRecord> {
        let number = self.next_number(document_type)?;
        let record = DocumentRecord::new(document_type, number)?;

        self.documents
            .insert(record.id.as_bytes(), minicbor::to_vec(&record)?)?;

        Ok(record)
    }

    // Atomic per-code-per-month counter backing document numbers,
    // e.g. BKK/2026/08/0007.
    fn next_number(&self, document_type: DocumentType) -> anyhow::Result<String> {
        let now = Utc::now();
        let scope = format!("{}/{:04}/{:02}", document_type.code(), now.year(), now.month());

        let value = self.counters.update_and_fetch(scope.as_bytes(), |old| {
            Some((counter_value(old) + 1).to_be_bytes().to_vec())
        })?;
        let seq = counter_value(value.as_deref());

        Ok(format!("{scope}/{seq:04}"))
    }

    /// Load a document from the store
    fn load_document(&self, document_id: &str) -> anyhow::Result<DocumentRecord> {
        match self.documents.get(document_id.as_bytes())? {
            Some(value) => Ok(minicbor::decode(value.as_ref())?),
            None => Err(StoreError::NotFound(document_id.to_string()).into()),
        }
    }

    pub fn document(&self, document_id: &str) -> anyhow::Result<DocumentRecord> {
        self.load_document(document_id)
    }

    /// Submit a Draft document for checking
    pub fn submit(&self, document_id: &str, actor: &AuditActor) -> anyhow::Result<TransitionOutcome> {
        self.apply(document_id, WorkflowAction::Submit, actor, None)
    }

    /// Mark a submitted document as checked
    pub fn check(&self, document_id: &str, actor: &AuditActor) -> anyhow::Result<TransitionOutcome> {
        self.apply(document_id, WorkflowAction::Check, actor, None)
    }

    /// Give final approval to a checked document
    pub fn approve(&self, document_id: &str, actor: &AuditActor) -> anyhow::Result<TransitionOutcome> {
        self.apply(document_id, WorkflowAction::Approve, actor, None)
    }

    /// Reject a document pending check or already checked. The summary lands
    /// in the audit trail.
    pub fn reject(
        &self,
        document_id: &str,
        actor: &AuditActor,
        summary: Option<String>,
    ) -> anyhow::Result<TransitionOutcome> {
        self.apply(document_id, WorkflowAction::Reject, actor, summary)
    }

    /// Evaluate one transition against the stored status and persist it.
    ///
    /// The status write is a conditional swap on the full encoded record: a
    /// concurrent transition changes the stored bytes and surfaces here as
    /// [`StoreError::LostUpdate`] instead of clobbering the other writer.
    pub fn apply(
        &self,
        document_id: &str,
        action: WorkflowAction,
        actor: &AuditActor,
        summary: Option<String>,
    ) -> anyhow::Result<TransitionOutcome> {
        let document = self.load_document(document_id)?;
        let status_from = document.canonical_status();

        let evaluation = rules::evaluate(document.document_type, &document.status, action, actor.role)?;

        let mut updated = document.clone();
        updated.status = evaluation.new_persisted_status.to_string();

        let old = minicbor::to_vec(&document)?;
        let new = minicbor::to_vec(&updated)?;
        self.documents
            .compare_and_swap(document.id.as_bytes(), Some(old), Some(new))?
            .map_err(|_| StoreError::LostUpdate(document.id.clone()))?;

        self.record_audit(actor, action, &updated, status_from, evaluation.new_status, summary);

        Ok(TransitionOutcome {
            document: updated,
            status_from,
            status_to: evaluation.new_status,
        })
    }

    // Audit failures must not undo an accepted transition; log and move on.
    fn record_audit(
        &self,
        actor: &AuditActor,
        action: WorkflowAction,
        document: &DocumentRecord,
        status_from: WorkflowStatus,
        status_to: WorkflowStatus,
        summary: Option<String>,
    ) {
        let record = AuditRecord::new(
            actor.clone(),
            action,
            document,
            status_from,
            status_to,
            summary,
        );

        if let Err(error) = self.audit.append(record) {
            tracing::error!(document_id = %document.id, %error, "failed to record audit history");
        }
    }

    /// The actions this role could take on the document right now.
    pub fn available_actions(
        &self,
        document_id: &str,
        role: Role,
    ) -> anyhow::Result<Vec<WorkflowAction>> {
        let document = self.load_document(document_id)?;
        let table = TransitionTable::for_document(document.document_type);

        Ok(table.available_actions(document.canonical_status(), role))
    }

    /// Audit history for a document in append order.
    pub fn history(&self, document_id: &str) -> anyhow::Result<Vec<AuditRecord>> {
        self.audit.history(document_id)
    }

    pub fn verify_audit_chain(&self, document_id: &str) -> anyhow::Result<bool> {
        self.audit.verify_chain(document_id)
    }
}
