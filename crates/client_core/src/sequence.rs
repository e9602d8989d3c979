//! In-memory reordering of a sequence's members.

use shared::domain::DocId;
use shared::protocol::{SequenceMember, SequenceOrderEntry};

/// Editable ordering of one sequence. Array position is the authoritative
/// order; each member's `seq_order` field is the last persisted ranking
/// and goes stale during editing.
#[derive(Debug, Clone)]
pub struct SequenceOrderer {
    members: Vec<SequenceMember>,
    dirty: bool,
}

impl SequenceOrderer {
    pub fn new(members: Vec<SequenceMember>) -> Self {
        Self {
            members,
            dirty: false,
        }
    }

    pub fn members(&self) -> &[SequenceMember] {
        &self.members
    }

    /// True once the in-memory order differs from the last loaded order.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Swaps the member one slot toward the front. The first slot and
    /// unknown ids are no-ops, never errors.
    pub fn move_up(&mut self, doc_id: DocId) -> bool {
        let Some(index) = self.position(doc_id) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.members.swap(index - 1, index);
        self.dirty = true;
        true
    }

    /// Swaps the member one slot toward the back. The last slot and
    /// unknown ids are no-ops.
    pub fn move_down(&mut self, doc_id: DocId) -> bool {
        let Some(index) = self.position(doc_id) else {
            return false;
        };
        if index + 1 == self.members.len() {
            return false;
        }
        self.members.swap(index, index + 1);
        self.dirty = true;
        true
    }

    /// Reassigns `seq_order` as the dense 1-based array position. This is
    /// the only way order is written back; there is no set-position move.
    pub fn commit_payload(&self) -> Vec<SequenceOrderEntry> {
        self.members
            .iter()
            .enumerate()
            .map(|(index, member)| SequenceOrderEntry {
                doc_id: member.id,
                seq_order: index as i32 + 1,
            })
            .collect()
    }

    /// Clears the dirty flag once the backend accepted the new order.
    pub fn mark_persisted(&mut self) {
        self.dirty = false;
    }

    fn position(&self, doc_id: DocId) -> Option<usize> {
        self.members.iter().position(|member| member.id == doc_id)
    }
}

#[cfg(test)]
#[path = "tests/sequence_tests.rs"]
mod tests;
