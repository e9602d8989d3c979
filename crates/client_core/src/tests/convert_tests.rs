use super::*;
use shared::domain::DocId;

fn record(c_type: i32, object_id: &str, extension: &str) -> ConversionRecord {
    ConversionRecord {
        doc_id: DocId(7),
        c_type: CType(c_type),
        object_id: ObjectId(object_id.to_string()),
        extension: extension.to_string(),
    }
}

#[test]
fn catalog_is_anchored_by_the_reserved_publish_format() {
    assert_eq!(CONVERSION_CATALOG[0].c_type, PUBLISH_C_TYPE);
    let extensions: Vec<&str> = CONVERSION_CATALOG
        .iter()
        .map(|entry| entry.extension)
        .collect();
    assert_eq!(
        extensions,
        vec!["html", "html", "txt", "docx", "pdf", "epub", "json"]
    );
}

#[test]
fn catalog_lookup_finds_known_formats_only() {
    let entry = catalog_entry(CType(4)).unwrap();
    assert_eq!(entry.extension, "pdf");
    assert!(catalog_entry(CType(9)).is_none());
}

#[test]
fn classifies_found_records_as_available_and_the_rest_pending() {
    let slots = reconcile(&[record(1, "x", "html")]);
    assert_eq!(slots.len(), 6);
    assert_eq!(
        slots[0],
        FormatSlot::Available {
            c_type: CType(1),
            extension: "html".to_string(),
            object_id: ObjectId("x".to_string()),
        }
    );
    assert_eq!(
        slots[1],
        FormatSlot::Pending {
            c_type: CType(2),
            extension: "txt",
        }
    );
    assert!(slots[2..]
        .iter()
        .all(|slot| matches!(slot, FormatSlot::Pending { .. })));
}

#[test]
fn reserved_records_never_produce_a_slot() {
    let slots = reconcile(&[record(0, "source", "html")]);
    assert_eq!(slots.len(), 6);
    assert!(slots
        .iter()
        .all(|slot| matches!(slot, FormatSlot::Pending { .. })));
    assert!(slots.iter().all(|slot| slot.c_type() != PUBLISH_C_TYPE));
}

#[test]
fn duplicate_records_for_one_format_resolve_to_the_last() {
    let slots = reconcile(&[record(3, "first", "docx"), record(3, "second", "docx")]);
    assert_eq!(
        slots[2],
        FormatSlot::Available {
            c_type: CType(3),
            extension: "docx".to_string(),
            object_id: ObjectId("second".to_string()),
        }
    );
}

#[test]
fn available_slots_keep_the_record_extension() {
    let slots = reconcile(&[record(2, "y", "text")]);
    assert_eq!(slots[1].extension(), "text");
    assert_eq!(slots[0].extension(), "html");
}

#[test]
fn classification_is_pure_and_repeatable() {
    let records = vec![record(1, "x", "html"), record(5, "z", "epub")];
    let first = reconcile(&records);
    let second = reconcile(&records);
    assert_eq!(first, second);
}
