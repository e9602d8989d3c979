use serde_json::json;

use crate::domain::{DocId, ScopeId, SeqId, TagId};
use crate::protocol::{
    DocumentDetail, DocumentSummary, ListPayload, ScopeAllResponse, SeqUpdatePayload,
    SequenceOrderEntry,
};

#[test]
fn scope_all_response_decodes_id_name_pairs() {
    let body = json!({ "scopes": [[1, "personal"], [4, "team"]] });
    let parsed: ScopeAllResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.scopes.len(), 2);
    assert_eq!(parsed.scopes[0], (ScopeId(1), "personal".to_string()));
    assert_eq!(parsed.scopes[1].1, "team");
}

#[test]
fn list_payload_omits_absent_optionals() {
    let payload = ListPayload {
        scope_ids: vec![ScopeId(1), ScopeId(2)],
        unit_size: None,
        unit_number: None,
        tag_id: None,
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value, json!({ "scope_ids": [1, 2] }));
}

#[test]
fn list_payload_keeps_tag_and_page_when_set() {
    let payload = ListPayload {
        scope_ids: vec![ScopeId(3)],
        unit_size: Some(20),
        unit_number: Some(1),
        tag_id: Some(TagId(7)),
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value,
        json!({ "scope_ids": [3], "unit_size": 20, "unit_number": 1, "tag_id": 7 })
    );
}

#[test]
fn document_summary_decodes_naive_timestamps() {
    let body = json!({
        "id": 11,
        "scope_ids": [1, 2],
        "seq_ids": [],
        "title": "release notes",
        "created_at": "2023-03-08T11:22:33",
        "updated_at": "2023-03-09T08:00:00",
        "tag_ids": [5]
    });
    let parsed: DocumentSummary = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.id, DocId(11));
    assert_eq!(parsed.created_at.to_string(), "2023-03-08 11:22:33");
    assert_eq!(parsed.tag_ids, vec![TagId(5)]);
}

#[test]
fn document_detail_defaults_missing_convert() {
    let body = json!({
        "id": 11,
        "title": "release notes",
        "status": 1,
        "created_at": "2023-03-08T11:22:33",
        "updated_at": "2023-03-09T08:00:00",
        "tags": [{ "id": 5, "value": "ops" }],
        "data": "<p>hello</p>"
    });
    let parsed: DocumentDetail = serde_json::from_value(body).unwrap();
    assert!(parsed.convert.is_empty());
    assert_eq!(parsed.tags[0].value, "ops");
}

#[test]
fn sequence_update_payload_encodes_order_rows() {
    let payload = SeqUpdatePayload {
        seq_id: SeqId(9),
        order: vec![
            SequenceOrderEntry {
                doc_id: DocId(4),
                seq_order: 1,
            },
            SequenceOrderEntry {
                doc_id: DocId(2),
                seq_order: 2,
            },
        ],
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value,
        json!({
            "seq_id": 9,
            "order": [
                { "doc_id": 4, "seq_order": 1 },
                { "doc_id": 2, "seq_order": 2 }
            ]
        })
    );
}
