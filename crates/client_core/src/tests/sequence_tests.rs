use super::*;
use chrono::NaiveDate;
use shared::domain::{ScopeId, SeqId};

fn member(doc_id: i32, seq_order: i32, title: &str) -> SequenceMember {
    let stamp = NaiveDate::from_ymd_opt(2023, 3, 8)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    SequenceMember {
        id: DocId(doc_id),
        scope_ids: vec![ScopeId(1)],
        seq_id: SeqId(5),
        seq_order,
        title: title.to_string(),
        created_at: stamp,
        updated_at: stamp,
        tag_ids: Vec::new(),
    }
}

fn orderer_abc() -> SequenceOrderer {
    SequenceOrderer::new(vec![member(1, 1, "a"), member(2, 2, "b"), member(3, 3, "c")])
}

fn titles(orderer: &SequenceOrderer) -> Vec<&str> {
    orderer
        .members()
        .iter()
        .map(|member| member.title.as_str())
        .collect()
}

#[test]
fn boundary_moves_are_no_ops() {
    let mut orderer = orderer_abc();
    assert!(!orderer.move_up(DocId(1)));
    assert_eq!(titles(&orderer), vec!["a", "b", "c"]);

    assert!(!orderer.move_down(DocId(3)));
    assert_eq!(titles(&orderer), vec!["a", "b", "c"]);
    assert!(!orderer.is_dirty());
}

#[test]
fn adjacent_swaps_move_one_slot() {
    let mut orderer = orderer_abc();
    assert!(orderer.move_down(DocId(1)));
    assert_eq!(titles(&orderer), vec!["b", "a", "c"]);

    let mut orderer = orderer_abc();
    assert!(orderer.move_up(DocId(3)));
    assert_eq!(titles(&orderer), vec!["a", "c", "b"]);
}

#[test]
fn unknown_documents_do_not_move_anything() {
    let mut orderer = orderer_abc();
    assert!(!orderer.move_up(DocId(9)));
    assert!(!orderer.move_down(DocId(9)));
    assert_eq!(titles(&orderer), vec!["a", "b", "c"]);
    assert!(!orderer.is_dirty());
}

#[test]
fn moves_on_an_empty_sequence_are_total() {
    let mut orderer = SequenceOrderer::new(Vec::new());
    assert!(!orderer.move_up(DocId(1)));
    assert!(!orderer.move_down(DocId(1)));
}

#[test]
fn only_a_real_swap_marks_the_session_dirty() {
    let mut orderer = orderer_abc();
    assert!(!orderer.is_dirty());

    orderer.move_up(DocId(1));
    assert!(!orderer.is_dirty());

    orderer.move_down(DocId(1));
    assert!(orderer.is_dirty());

    orderer.mark_persisted();
    assert!(!orderer.is_dirty());
}

#[test]
fn commit_payload_assigns_dense_one_based_ranks() {
    let mut orderer = orderer_abc();
    orderer.move_down(DocId(1));
    assert_eq!(titles(&orderer), vec!["b", "a", "c"]);

    let payload = orderer.commit_payload();
    assert_eq!(
        payload,
        vec![
            SequenceOrderEntry {
                doc_id: DocId(2),
                seq_order: 1,
            },
            SequenceOrderEntry {
                doc_id: DocId(1),
                seq_order: 2,
            },
            SequenceOrderEntry {
                doc_id: DocId(3),
                seq_order: 3,
            },
        ]
    );
}

#[test]
fn stale_seq_order_fields_do_not_leak_into_the_payload() {
    let mut orderer = SequenceOrderer::new(vec![member(4, 7, "a"), member(5, 9, "b")]);
    orderer.move_down(DocId(4));
    let payload = orderer.commit_payload();
    assert_eq!(payload[0].doc_id, DocId(5));
    assert_eq!(payload[0].seq_order, 1);
    assert_eq!(payload[1].doc_id, DocId(4));
    assert_eq!(payload[1].seq_order, 2);
}
