//! Scope and tag facet selection for the document list.

use shared::domain::{Scope, ScopeId, Tag, TagId};
use tracing::debug;

/// Tag activation automaton: either every known tag is shown or exactly
/// one is. Multi-tag intersection is deliberately unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSelection {
    AllShown,
    One(TagId),
}

#[derive(Debug, Clone)]
struct ScopeFacet {
    scope: Scope,
    selected: bool,
}

/// Query filter derived from the current selection. `tag_id` is present
/// only when exactly one tag is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter {
    pub scope_ids: Vec<ScopeId>,
    pub tag_id: Option<TagId>,
}

/// Owned snapshot of the selection for display.
#[derive(Debug, Clone)]
pub struct FacetView {
    pub scopes: Vec<(Scope, bool)>,
    pub tags: Vec<(Tag, bool)>,
}

#[derive(Debug, Clone)]
pub struct FacetSelector {
    scopes: Vec<ScopeFacet>,
    tags: Vec<Tag>,
    selection: TagSelection,
}

impl FacetSelector {
    /// Starts with every held scope selected and an empty tag facet.
    pub fn new(scopes: Vec<Scope>) -> Self {
        Self {
            scopes: scopes
                .into_iter()
                .map(|scope| ScopeFacet {
                    scope,
                    selected: true,
                })
                .collect(),
            tags: Vec::new(),
            selection: TagSelection::AllShown,
        }
    }

    /// Flips one held scope. Ids the user does not hold are ignored.
    pub fn toggle_scope(&mut self, scope_id: ScopeId) -> bool {
        match self
            .scopes
            .iter_mut()
            .find(|facet| facet.scope.id == scope_id)
        {
            Some(facet) => {
                facet.selected = !facet.selected;
                true
            }
            None => {
                debug!(scope_id = scope_id.0, "ignoring toggle for unheld scope");
                false
            }
        }
    }

    pub fn selected_scope_ids(&self) -> Vec<ScopeId> {
        self.scopes
            .iter()
            .filter(|facet| facet.selected)
            .map(|facet| facet.scope.id)
            .collect()
    }

    /// Replaces the tag facet after a scope change. Activation resets to
    /// all-shown; an exclusive pick must not survive a facet recompute.
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
        self.selection = TagSelection::AllShown;
    }

    pub fn is_tag_active(&self, tag_id: TagId) -> bool {
        if !self.knows_tag(tag_id) {
            return false;
        }
        match self.selection {
            TagSelection::AllShown => true,
            TagSelection::One(active) => active == tag_id,
        }
    }

    /// Exclusive-with-reset: clicking an inactive tag re-activates every
    /// tag, clicking an active one narrows to exactly that tag. Returns
    /// whether the selection moved.
    pub fn toggle_tag(&mut self, tag_id: TagId) -> bool {
        if !self.knows_tag(tag_id) {
            debug!(tag_id = tag_id.0, "ignoring toggle for unknown tag");
            return false;
        }
        let next = if self.is_tag_active(tag_id) {
            TagSelection::One(tag_id)
        } else {
            TagSelection::AllShown
        };
        let changed = next != self.selection;
        self.selection = next;
        changed
    }

    pub fn tag_selection(&self) -> TagSelection {
        self.selection
    }

    /// Pure over the current state: no I/O, never fails. An empty scope
    /// selection derives a filter matching zero scopes, not all of them.
    pub fn current_filter(&self) -> DocumentFilter {
        let active: Vec<TagId> = self
            .tags
            .iter()
            .map(|tag| tag.id)
            .filter(|id| self.is_tag_active(*id))
            .collect();
        DocumentFilter {
            scope_ids: self.selected_scope_ids(),
            tag_id: if active.len() == 1 {
                Some(active[0])
            } else {
                None
            },
        }
    }

    pub fn snapshot(&self) -> FacetView {
        FacetView {
            scopes: self
                .scopes
                .iter()
                .map(|facet| (facet.scope.clone(), facet.selected))
                .collect(),
            tags: self
                .tags
                .iter()
                .map(|tag| (tag.clone(), self.is_tag_active(tag.id)))
                .collect(),
        }
    }

    fn knows_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

#[cfg(test)]
#[path = "tests/facet_tests.rs"]
mod tests;
