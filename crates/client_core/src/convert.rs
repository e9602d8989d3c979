//! Fixed conversion catalog and per-format reconciliation.

use shared::domain::{CType, ObjectId};
use shared::protocol::ConversionRecord;

/// One output format the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub c_type: CType,
    pub extension: &'static str,
}

/// Format 0 anchors the publish flow and is never user-requestable.
pub const PUBLISH_C_TYPE: CType = CType(0);

/// Mirrors the converter service's format table.
pub const CONVERSION_CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        c_type: CType(0),
        extension: "html",
    },
    CatalogEntry {
        c_type: CType(1),
        extension: "html",
    },
    CatalogEntry {
        c_type: CType(2),
        extension: "txt",
    },
    CatalogEntry {
        c_type: CType(3),
        extension: "docx",
    },
    CatalogEntry {
        c_type: CType(4),
        extension: "pdf",
    },
    CatalogEntry {
        c_type: CType(5),
        extension: "epub",
    },
    CatalogEntry {
        c_type: CType(6),
        extension: "json",
    },
];

pub fn catalog_entry(c_type: CType) -> Option<&'static CatalogEntry> {
    CONVERSION_CATALOG.iter().find(|entry| entry.c_type == c_type)
}

/// Download-or-request status of one catalog entry for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSlot {
    /// The backend already produced this format; `object_id` addresses
    /// the stored artifact.
    Available {
        c_type: CType,
        extension: String,
        object_id: ObjectId,
    },
    /// Not produced yet; the next action is a convert request.
    Pending {
        c_type: CType,
        extension: &'static str,
    },
}

impl FormatSlot {
    pub fn c_type(&self) -> CType {
        match self {
            FormatSlot::Available { c_type, .. } | FormatSlot::Pending { c_type, .. } => *c_type,
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            FormatSlot::Available { extension, .. } => extension,
            FormatSlot::Pending { extension, .. } => extension,
        }
    }
}

/// Classifies every non-reserved catalog entry against a document's
/// conversion records. Records should be unique per `c_type`; if the
/// backend ever duplicates one, the last record wins.
pub fn reconcile(records: &[ConversionRecord]) -> Vec<FormatSlot> {
    CONVERSION_CATALOG
        .iter()
        .filter(|entry| entry.c_type != PUBLISH_C_TYPE)
        .map(|entry| {
            let mut found: Option<&ConversionRecord> = None;
            for record in records {
                if record.c_type == entry.c_type {
                    found = Some(record);
                }
            }
            match found {
                Some(record) => FormatSlot::Available {
                    c_type: record.c_type,
                    extension: record.extension.clone(),
                    object_id: record.object_id.clone(),
                },
                None => FormatSlot::Pending {
                    c_type: entry.c_type,
                    extension: entry.extension,
                },
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
