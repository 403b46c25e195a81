//! Append-only audit log for accepted transitions.
//!
//! One record per accepted transition, never updated or deleted. Records for
//! a document form a hash chain: each entry carries the sha256 digest of its
//! predecessor's stored bytes, so gaps or edits are detectable after the
//! fact even though the log itself stays fire-and-forget.

use crate::document::{DocumentRecord, DocumentType, TimeStamp};
use crate::role::Role;
use crate::status::{WorkflowAction, WorkflowStatus};
use chrono::Utc;
use uuid7::uuid7;

/// Provenance marker for every record this engine writes. The boundary it
/// runs behind never sees the original client address.
pub const AUDIT_SOURCE: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct AuditActor {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub email: String,
    #[n(3)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct AuditRecord {
    #[n(0)]
    pub record_id: String, // uuid7; keys under a document sort in append order
    #[n(1)]
    pub actor: AuditActor,
    #[n(2)]
    pub action: WorkflowAction,
    #[n(3)]
    pub module: String, // document-type code, e.g. "BKK"
    #[n(4)]
    pub document_id: String,
    #[n(5)]
    pub document_type: DocumentType,
    #[n(6)]
    pub document_number: String,
    #[n(7)]
    pub status_from: WorkflowStatus,
    #[n(8)]
    pub status_to: WorkflowStatus,
    #[n(9)]
    pub summary: Option<String>,
    #[n(10)]
    pub source: String,
    #[n(11)]
    pub logged_at: TimeStamp<Utc>,
    #[n(12)]
    pub prev_digest: Option<String>, // sha256 of the previous record's bytes
}

impl AuditRecord {
    pub fn new(
        actor: AuditActor,
        action: WorkflowAction,
        document: &DocumentRecord,
        status_from: WorkflowStatus,
        status_to: WorkflowStatus,
        summary: Option<String>,
    ) -> Self {
        Self {
            record_id: uuid7().to_string(),
            actor,
            action,
            module: document.document_type.code().to_string(),
            document_id: document.id.clone(),
            document_type: document.document_type,
            document_number: document.number.clone(),
            status_from,
            status_to,
            summary,
            source: AUDIT_SOURCE.to_string(),
            logged_at: TimeStamp::new(),
            prev_digest: None,
        }
    }

    pub fn build(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let cbor = minicbor::to_vec(self)?;
        let hash = sha256::digest(&cbor);

        Ok((hash, cbor))
    }
}

pub struct AuditLog {
    tree: sled::Tree,
}

impl AuditLog {
    pub fn open(db: &sled::Db) -> sled::Result<Self> {
        Ok(Self {
            tree: db.open_tree("audit")?,
        })
    }

    fn key(document_id: &str, record_id: &str) -> Vec<u8> {
        format!("{document_id}/{record_id}").into_bytes()
    }

    /// Append a record, chaining it to the digest of the document's current
    /// tail. Returns the record as stored.
    pub fn append(&self, mut record: AuditRecord) -> anyhow::Result<AuditRecord> {
        record.prev_digest = self.tail_digest(&record.document_id)?;

        let (_, cbor) = record.build()?;
        self.tree
            .insert(Self::key(&record.document_id, &record.record_id), cbor)?;

        Ok(record)
    }

    fn tail_digest(&self, document_id: &str) -> anyhow::Result<Option<String>> {
        let prefix = format!("{document_id}/");
        match self.tree.scan_prefix(prefix.as_bytes()).last() {
            Some(entry) => {
                let (_, value) = entry?;
                Ok(Some(sha256::digest(value.as_ref())))
            }
            None => Ok(None),
        }
    }

    /// All records for a document in append order.
    pub fn history(&self, document_id: &str) -> anyhow::Result<Vec<AuditRecord>> {
        let prefix = format!("{document_id}/");
        let mut records = Vec::new();

        for entry in self.tree.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            records.push(minicbor::decode(value.as_ref())?);
        }

        Ok(records)
    }

    /// Recompute the digest chain for a document. False means a record was
    /// edited, removed, or inserted out of band.
    pub fn verify_chain(&self, document_id: &str) -> anyhow::Result<bool> {
        let prefix = format!("{document_id}/");
        let mut prev: Option<String> = None;

        for entry in self.tree.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            let record: AuditRecord = minicbor::decode(value.as_ref())?;

            if record.prev_digest != prev {
                return Ok(false);
            }
            prev = Some(sha256::digest(value.as_ref()));
        }

        Ok(true)
    }
}
