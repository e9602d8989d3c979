use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{CType, DocId, ObjectId, ScopeId, SeqId, Tag, TagId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResponse {
    pub access_token: String,
}

/// `/resource/scope/all` encodes scopes as `[id, name]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeAllResponse {
    pub scopes: Vec<(ScopeId, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPayload {
    pub scope_ids: Vec<ScopeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPayload {
    pub scope_ids: Vec<ScopeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<TagId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocId,
    pub scope_ids: Vec<ScopeId>,
    pub seq_ids: Vec<SeqId>,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub tag_ids: Vec<TagId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishPayload {
    pub doc_id: DocId,
    pub scope_ids: Vec<ScopeId>,
    pub c_type: CType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub publish_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDocumentPayload {
    pub publish_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub doc_id: DocId,
    pub c_type: CType,
    pub object_id: ObjectId,
    pub extension: String,
}

/// Published view of a document. Older backend builds omit `convert`,
/// hence the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub id: DocId,
    pub title: String,
    pub status: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub convert: Vec<ConversionRecord>,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertPayload {
    pub doc_id: DocId,
    pub c_type: CType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayload {
    pub raw: String,
    pub tags: Vec<String>,
    pub scope_ids: Vec<ScopeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_id: Option<SeqId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub doc_id: DocId,
    pub raw: String,
    pub tags: Vec<String>,
    pub scope_ids: Vec<ScopeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_id: Option<SeqId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePayload {
    pub doc_ids: Vec<DocId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceAllPayload {
    pub scope_ids: Vec<ScopeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqNewPayload {
    pub scope_ids: Vec<ScopeId>,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqDeletePayload {
    pub seq_id: SeqId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceListPayload {
    pub scope_ids: Vec<ScopeId>,
    pub seq_id: SeqId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceMember {
    pub id: DocId,
    pub scope_ids: Vec<ScopeId>,
    pub seq_id: SeqId,
    pub seq_order: i32,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub tag_ids: Vec<TagId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOrderEntry {
    pub doc_id: DocId,
    pub seq_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqUpdatePayload {
    pub seq_id: SeqId,
    pub order: Vec<SequenceOrderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqInPayload {
    pub seq_id: SeqId,
    pub doc_id: DocId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqOutPayload {
    pub seq_id: SeqId,
    pub doc_id: DocId,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
