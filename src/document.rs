//! Document identity and the minimal persisted record shape.

use crate::status::WorkflowStatus;
use crate::utils;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// Which transition table and persisted vocabulary apply to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub enum DocumentType {
    /// Pre job order, internally "PJO".
    #[n(0)]
    PreJobOrder,
    #[n(1)]
    JobOrder,
    /// Cash disbursement voucher, internally "BKK".
    #[n(2)]
    CashDisbursement,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::PreJobOrder,
        DocumentType::JobOrder,
        DocumentType::CashDisbursement,
    ];

    /// Short module code used in document numbers and audit records.
    pub fn code(self) -> &'static str {
        match self {
            DocumentType::PreJobOrder => "PJO",
            DocumentType::JobOrder => "JO",
            DocumentType::CashDisbursement => "BKK",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The persisted shape of a workflow-managed document.
///
/// `status` holds the document type's own vocabulary, not the canonical one.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct DocumentRecord {
    #[n(0)]
    pub id: String, // uuid7, bech32 encoded
    #[n(1)]
    pub document_type: DocumentType,
    #[n(2)]
    pub number: String, // human-readable sequential number
    #[n(3)]
    pub status: String,
    #[n(4)]
    pub created_at: TimeStamp<Utc>,
}

impl DocumentRecord {
    /// A fresh document starts in Draft; status only moves through accepted
    /// transitions from here on.
    pub fn new(document_type: DocumentType, number: String) -> anyhow::Result<Self> {
        Ok(Self {
            id: utils::new_scoped_id("doc_")?,
            document_type,
            number,
            status: WorkflowStatus::Draft.as_persisted(document_type).to_string(),
            created_at: TimeStamp::new(),
        })
    }

    pub fn canonical_status(&self) -> WorkflowStatus {
        WorkflowStatus::from_persisted(&self.status)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
