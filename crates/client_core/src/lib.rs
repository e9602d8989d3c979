use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::domain::{CType, DocId, Scope, ScopeId, SeqId, Sequence, TagId};
use shared::protocol::{
    CreatePayload, DocumentDetail, DocumentSummary, SequenceMember, UpdatePayload,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

pub mod backend;
pub mod convert;
pub mod error;
pub mod facet;
pub mod sequence;

use backend::DocuvaultBackend;
use convert::FormatSlot;
use error::ClientError;
use facet::{FacetSelector, FacetView};
use sequence::SequenceOrderer;

/// Bearer credential and held scopes as issued at login. Serializable so
/// hosts can carry a login across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub scopes: Vec<Scope>,
}

/// Broadcast to subscribers as operations settle. `Notice` mirrors the
/// pass/fail toasts the dashboard surfaces per user action.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Notice { pass: bool, message: String },
    TagsRefreshed { count: usize },
    DocumentsRefreshed { count: usize },
    DocumentLoaded { doc_id: DocId },
    SequenceLoaded { seq_id: SeqId, members: usize },
    SequenceCommitted { seq_id: SeqId },
    LoggedOut,
}

struct SequenceSession {
    seq_id: SeqId,
    orderer: SequenceOrderer,
}

struct DashboardState {
    session: Option<Session>,
    facets: FacetSelector,
    documents: Vec<DocumentSummary>,
    document: Option<DocumentDetail>,
    sequence: Option<SequenceSession>,
}

/// Client-side state holder for one dashboard session. All mutation is
/// driven by discrete user actions; the lock is never held across a
/// backend call, and list replies are dropped when the filter they were
/// fetched under has moved on.
pub struct DashboardClient {
    backend: Arc<dyn DocuvaultBackend>,
    inner: Mutex<DashboardState>,
    events: broadcast::Sender<ClientEvent>,
}

impl DashboardClient {
    pub fn new(backend: Arc<dyn DocuvaultBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            inner: Mutex::new(DashboardState {
                session: None,
                facets: FacetSelector::new(Vec::new()),
                documents: Vec::new(),
                document: None,
                sequence: None,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Issues a token and loads the held scopes. The facet selection
    /// starts over with every scope selected.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let access_token = self.report(self.backend.issue_token(email, password).await)?;
        let scopes = self.report(self.backend.fetch_scopes(&access_token).await)?;
        let session = Session {
            access_token,
            scopes,
        };
        self.restore_session(session.clone()).await;
        info!(scopes = session.scopes.len(), "login complete");
        self.notify_pass("login success");
        Ok(session)
    }

    /// Seeds a previously issued session, e.g. one persisted by the host.
    pub async fn restore_session(&self, session: Session) {
        let mut guard = self.inner.lock().await;
        guard.facets = FacetSelector::new(session.scopes.clone());
        guard.documents.clear();
        guard.document = None;
        guard.sequence = None;
        guard.session = Some(session);
    }

    /// Revokes the token server-side and drops all local state. Local
    /// state clears even when the revocation call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let token = self.token().await?;
        let outcome = self.report(self.backend.disconnect(&token).await);
        {
            let mut guard = self.inner.lock().await;
            guard.session = None;
            guard.facets = FacetSelector::new(Vec::new());
            guard.documents.clear();
            guard.document = None;
            guard.sequence = None;
        }
        let _ = self.events.send(ClientEvent::LoggedOut);
        if outcome.is_ok() {
            self.notify_pass("logout success");
        }
        outcome
    }

    pub async fn session(&self) -> Option<Session> {
        self.inner.lock().await.session.clone()
    }

    pub async fn facets(&self) -> FacetView {
        self.inner.lock().await.facets.snapshot()
    }

    pub async fn documents(&self) -> Vec<DocumentSummary> {
        self.inner.lock().await.documents.clone()
    }

    pub async fn document(&self) -> Option<DocumentDetail> {
        self.inner.lock().await.document.clone()
    }

    /// Flips a held scope. The tag facet is derived from the scope
    /// selection, so a change refetches both it and the document list.
    pub async fn toggle_scope(&self, scope_id: ScopeId) -> Result<bool, ClientError> {
        let changed = {
            let mut guard = self.inner.lock().await;
            if guard.session.is_none() {
                return Err(ClientError::NotLoggedIn);
            }
            guard.facets.toggle_scope(scope_id)
        };
        if !changed {
            return Ok(false);
        }
        self.refresh_tags().await?;
        self.refresh_documents().await?;
        Ok(true)
    }

    /// Moves the tag selection without touching the backend; callers
    /// refetch the list when they want the narrowed result.
    pub async fn toggle_tag(&self, tag_id: TagId) -> Result<bool, ClientError> {
        let mut guard = self.inner.lock().await;
        if guard.session.is_none() {
            return Err(ClientError::NotLoggedIn);
        }
        Ok(guard.facets.toggle_tag(tag_id))
    }

    /// The refresh action: recompute the tag facet for the current scope
    /// selection, then refetch the document list.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.refresh_tags().await?;
        self.refresh_documents().await?;
        Ok(())
    }

    /// Refetches the list under the current filter. Returns false when
    /// the reply was discarded because the filter moved while the fetch
    /// was in flight.
    pub async fn refresh_documents(&self) -> Result<bool, ClientError> {
        let (token, filter) = {
            let guard = self.inner.lock().await;
            let session = guard.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
            (session.access_token.clone(), guard.facets.current_filter())
        };

        // Zero scopes selected means zero results, never "all results".
        if filter.scope_ids.is_empty() {
            let mut guard = self.inner.lock().await;
            if guard.facets.current_filter() != filter {
                return Ok(false);
            }
            guard.documents.clear();
            drop(guard);
            let _ = self.events.send(ClientEvent::DocumentsRefreshed { count: 0 });
            self.notify_pass("document list fetch success");
            return Ok(true);
        }

        let documents = self.report(self.backend.fetch_documents(&token, &filter).await)?;

        let mut guard = self.inner.lock().await;
        if guard.facets.current_filter() != filter {
            debug!("filter moved, dropping stale document list");
            return Ok(false);
        }
        let count = documents.len();
        guard.documents = documents;
        drop(guard);
        let _ = self.events.send(ClientEvent::DocumentsRefreshed { count });
        self.notify_pass("document list fetch success");
        Ok(true)
    }

    /// Publishes the document under every held scope and loads the
    /// published view.
    pub async fn open_document(&self, doc_id: DocId) -> Result<DocumentDetail, ClientError> {
        let (token, scope_ids) = self.token_and_held_scopes().await?;
        let publish_token = self.report(
            self.backend
                .publish_document(&token, doc_id, &scope_ids, convert::PUBLISH_C_TYPE)
                .await,
        )?;
        let detail = self.report(self.backend.fetch_document(&publish_token).await)?;
        {
            let mut guard = self.inner.lock().await;
            guard.document = Some(detail.clone());
        }
        let _ = self.events.send(ClientEvent::DocumentLoaded { doc_id });
        self.notify_pass("document fetch success");
        Ok(detail)
    }

    /// Per-format classification of the loaded document.
    pub async fn conversion_slots(&self) -> Result<Vec<FormatSlot>, ClientError> {
        let guard = self.inner.lock().await;
        let document = guard.document.as_ref().ok_or(ClientError::NoDocumentLoaded)?;
        Ok(convert::reconcile(&document.convert))
    }

    pub fn file_url(&self, object_id: &shared::domain::ObjectId) -> String {
        self.backend.file_url(object_id)
    }

    /// Fire-and-forget conversion request. Requests already in flight for
    /// the same format are not deduplicated; the slot stays `Pending`
    /// until a reload observes the produced artifact.
    pub async fn request_conversion(
        &self,
        doc_id: DocId,
        c_type: CType,
    ) -> Result<(), ClientError> {
        if c_type == convert::PUBLISH_C_TYPE {
            return Err(ClientError::ReservedFormat(c_type.0));
        }
        if convert::catalog_entry(c_type).is_none() {
            return Err(ClientError::UnknownFormat(c_type.0));
        }
        let token = self.token().await?;
        self.report(self.backend.request_conversion(&token, doc_id, c_type).await)?;
        self.notify_pass("convert request success");
        Ok(())
    }

    pub async fn create_document(&self, draft: CreatePayload) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.create_document(&token, &draft).await)?;
        self.notify_pass("write success");
        Ok(())
    }

    /// Revises an existing document in place; the next publish shows the
    /// new content.
    pub async fn update_document(&self, update: UpdatePayload) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.update_document(&token, &update).await)?;
        self.notify_pass("update success");
        Ok(())
    }

    /// Deletes documents, then refreshes the facet and the list.
    pub async fn delete_documents(&self, doc_ids: &[DocId]) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.delete_documents(&token, doc_ids).await)?;
        self.notify_pass("selected documents are deleted");
        self.refresh().await
    }

    pub async fn list_sequences(&self) -> Result<Vec<Sequence>, ClientError> {
        let (token, scope_ids) = self.token_and_held_scopes().await?;
        let sequences = self.report(self.backend.fetch_sequences(&token, &scope_ids).await)?;
        self.notify_pass("sequence list fetch success");
        Ok(sequences)
    }

    pub async fn create_sequence(
        &self,
        scope_ids: &[ScopeId],
        title: &str,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.create_sequence(&token, scope_ids, title).await)?;
        self.notify_pass("create sequence success");
        Ok(())
    }

    pub async fn delete_sequence(&self, seq_id: SeqId) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.delete_sequence(&token, seq_id).await)?;
        {
            let mut guard = self.inner.lock().await;
            if guard.sequence.as_ref().map(|s| s.seq_id) == Some(seq_id) {
                guard.sequence = None;
            }
        }
        self.notify_pass("delete sequence success");
        Ok(())
    }

    /// Fetches a sequence's members under every held scope and starts an
    /// editing session over them.
    pub async fn load_sequence(&self, seq_id: SeqId) -> Result<Vec<SequenceMember>, ClientError> {
        let (token, scope_ids) = self.token_and_held_scopes().await?;
        let members = self.report(
            self.backend
                .fetch_sequence_members(&token, seq_id, &scope_ids)
                .await,
        )?;
        let count = members.len();
        {
            let mut guard = self.inner.lock().await;
            guard.sequence = Some(SequenceSession {
                seq_id,
                orderer: SequenceOrderer::new(members.clone()),
            });
        }
        let _ = self.events.send(ClientEvent::SequenceLoaded {
            seq_id,
            members: count,
        });
        self.notify_pass("document list fetch success");
        Ok(members)
    }

    pub async fn sequence_members(&self) -> Result<Vec<SequenceMember>, ClientError> {
        let guard = self.inner.lock().await;
        let sequence = guard.sequence.as_ref().ok_or(ClientError::NoSequenceLoaded)?;
        Ok(sequence.orderer.members().to_vec())
    }

    pub async fn sequence_dirty(&self) -> Result<bool, ClientError> {
        let guard = self.inner.lock().await;
        let sequence = guard.sequence.as_ref().ok_or(ClientError::NoSequenceLoaded)?;
        Ok(sequence.orderer.is_dirty())
    }

    pub async fn sequence_move_up(&self, doc_id: DocId) -> Result<bool, ClientError> {
        let mut guard = self.inner.lock().await;
        let sequence = guard.sequence.as_mut().ok_or(ClientError::NoSequenceLoaded)?;
        Ok(sequence.orderer.move_up(doc_id))
    }

    pub async fn sequence_move_down(&self, doc_id: DocId) -> Result<bool, ClientError> {
        let mut guard = self.inner.lock().await;
        let sequence = guard.sequence.as_mut().ok_or(ClientError::NoSequenceLoaded)?;
        Ok(sequence.orderer.move_down(doc_id))
    }

    /// Persists the edited order as dense 1-based ranks, then reloads the
    /// sequence so the view reflects the backend's canonical state. The
    /// dirty flag gates the call: an unchanged order is never sent.
    pub async fn commit_sequence(&self) -> Result<(), ClientError> {
        let (token, seq_id, order) = {
            let guard = self.inner.lock().await;
            let session = guard.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
            let sequence = guard.sequence.as_ref().ok_or(ClientError::NoSequenceLoaded)?;
            if !sequence.orderer.is_dirty() {
                return Err(ClientError::CleanSequence);
            }
            (
                session.access_token.clone(),
                sequence.seq_id,
                sequence.orderer.commit_payload(),
            )
        };
        self.report(
            self.backend
                .persist_sequence_order(&token, seq_id, &order)
                .await,
        )?;
        {
            let mut guard = self.inner.lock().await;
            if let Some(sequence) = guard.sequence.as_mut() {
                if sequence.seq_id == seq_id {
                    sequence.orderer.mark_persisted();
                }
            }
        }
        let _ = self.events.send(ClientEvent::SequenceCommitted { seq_id });
        self.notify_pass("sequence update success");
        if self.load_sequence(seq_id).await.is_err() {
            debug!(seq_id = seq_id.0, "sequence reload after commit failed");
        }
        Ok(())
    }

    pub async fn sequence_add_document(
        &self,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.sequence_add(&token, seq_id, doc_id).await)?;
        self.notify_pass("sequence insert success");
        Ok(())
    }

    pub async fn sequence_remove_document(
        &self,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.report(self.backend.sequence_remove(&token, seq_id, doc_id).await)?;
        self.notify_pass("sequence remove success");
        Ok(())
    }

    /// Recomputes the tag facet for the current scope selection. Replies
    /// that arrive after the selection moved on are dropped. Activation
    /// resets to all-shown on every successful recompute.
    async fn refresh_tags(&self) -> Result<bool, ClientError> {
        let (token, scope_ids) = {
            let guard = self.inner.lock().await;
            let session = guard.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
            (
                session.access_token.clone(),
                guard.facets.selected_scope_ids(),
            )
        };

        if scope_ids.is_empty() {
            let mut guard = self.inner.lock().await;
            if guard.facets.selected_scope_ids() != scope_ids {
                return Ok(false);
            }
            guard.facets.set_tags(Vec::new());
            drop(guard);
            let _ = self.events.send(ClientEvent::TagsRefreshed { count: 0 });
            return Ok(true);
        }

        let tags = self.report(self.backend.fetch_tags(&token, &scope_ids).await)?;

        let mut guard = self.inner.lock().await;
        if guard.facets.selected_scope_ids() != scope_ids {
            debug!("scope selection moved, dropping stale tag facet");
            return Ok(false);
        }
        let count = tags.len();
        guard.facets.set_tags(tags);
        drop(guard);
        let _ = self.events.send(ClientEvent::TagsRefreshed { count });
        Ok(true)
    }

    async fn token(&self) -> Result<String, ClientError> {
        let guard = self.inner.lock().await;
        let session = guard.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(session.access_token.clone())
    }

    /// Publish and sequence calls run against every held scope, not just
    /// the selected ones.
    async fn token_and_held_scopes(&self) -> Result<(String, Vec<ScopeId>), ClientError> {
        let guard = self.inner.lock().await;
        let session = guard.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
        let scope_ids = session.scopes.iter().map(|scope| scope.id).collect();
        Ok((session.access_token.clone(), scope_ids))
    }

    fn notify_pass(&self, message: &str) {
        let _ = self.events.send(ClientEvent::Notice {
            pass: true,
            message: message.to_string(),
        });
    }

    fn report<T>(&self, outcome: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &outcome {
            let _ = self.events.send(ClientEvent::Notice {
                pass: false,
                message: err.notice(),
            });
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
