//! Backend collaborator seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::domain::{CType, DocId, ObjectId, Scope, ScopeId, SeqId, Sequence, Tag};
use shared::error::BackendRejection;
use shared::protocol::{
    ConvertPayload, CreatePayload, DeletePayload, DocumentDetail, DocumentSummary,
    GetDocumentPayload, IssuePayload, IssueResponse, ListPayload, PublishPayload, PublishResponse,
    ScopeAllResponse, SeqDeletePayload, SeqInPayload, SeqNewPayload, SeqOutPayload,
    SeqUpdatePayload, SequenceAllPayload, SequenceListPayload, SequenceMember, SequenceOrderEntry,
    TagPayload, UpdatePayload,
};

use crate::error::ClientError;
use crate::facet::DocumentFilter;

/// Operations the dashboard consumes from the docuvault backend. Every
/// authenticated call forwards the bearer token unchanged; the client
/// never inspects or refreshes it.
#[async_trait]
pub trait DocuvaultBackend: Send + Sync {
    async fn issue_token(&self, email: &str, password: &str) -> Result<String, ClientError>;
    async fn disconnect(&self, token: &str) -> Result<(), ClientError>;
    async fn fetch_scopes(&self, token: &str) -> Result<Vec<Scope>, ClientError>;
    async fn fetch_tags(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<Tag>, ClientError>;
    async fn fetch_documents(
        &self,
        token: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentSummary>, ClientError>;
    async fn publish_document(
        &self,
        token: &str,
        doc_id: DocId,
        scope_ids: &[ScopeId],
        c_type: CType,
    ) -> Result<String, ClientError>;
    async fn fetch_document(&self, publish_token: &str) -> Result<DocumentDetail, ClientError>;
    async fn request_conversion(
        &self,
        token: &str,
        doc_id: DocId,
        c_type: CType,
    ) -> Result<(), ClientError>;
    async fn create_document(
        &self,
        token: &str,
        draft: &CreatePayload,
    ) -> Result<(), ClientError>;
    async fn update_document(
        &self,
        token: &str,
        update: &UpdatePayload,
    ) -> Result<(), ClientError>;
    async fn delete_documents(&self, token: &str, doc_ids: &[DocId]) -> Result<(), ClientError>;
    async fn fetch_sequences(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<Sequence>, ClientError>;
    async fn create_sequence(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
        title: &str,
    ) -> Result<(), ClientError>;
    async fn delete_sequence(&self, token: &str, seq_id: SeqId) -> Result<(), ClientError>;
    async fn fetch_sequence_members(
        &self,
        token: &str,
        seq_id: SeqId,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<SequenceMember>, ClientError>;
    async fn persist_sequence_order(
        &self,
        token: &str,
        seq_id: SeqId,
        order: &[SequenceOrderEntry],
    ) -> Result<(), ClientError>;
    async fn sequence_add(
        &self,
        token: &str,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError>;
    async fn sequence_remove(
        &self,
        token: &str,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError>;
    /// Direct download reference for a stored conversion artifact.
    fn file_url(&self, object_id: &ObjectId) -> String;
}

/// Talks to a running docuvault server over JSON.
pub struct HttpBackend {
    http: Client,
    server_url: String,
}

impl HttpBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn post_json<P, T>(
        &self,
        path: &str,
        token: Option<&str>,
        payload: &P,
    ) -> Result<T, ClientError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.post(path, token, payload).await?;
        Ok(response.json().await?)
    }

    async fn post_unit<P>(
        &self,
        path: &str,
        token: Option<&str>,
        payload: &P,
    ) -> Result<(), ClientError>
    where
        P: Serialize + Sync,
    {
        self.post(path, token, payload).await?;
        Ok(())
    }

    async fn post<P: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        payload: &P,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .http
            .post(format!("{}{path}", self.server_url))
            .json(payload);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        reject_on_error(request.send().await?).await
    }
}

/// Non-2xx replies carry the handler's message as a plain-text body.
async fn reject_on_error(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendRejection::new(status.as_u16(), message).into())
}

#[async_trait]
impl DocuvaultBackend for HttpBackend {
    async fn issue_token(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response: IssueResponse = self
            .post_json(
                "/auth/issue",
                None,
                &IssuePayload {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        Ok(response.access_token)
    }

    async fn disconnect(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/auth/disconnect", self.server_url))
            .bearer_auth(token)
            .send()
            .await?;
        reject_on_error(response).await?;
        Ok(())
    }

    async fn fetch_scopes(&self, token: &str) -> Result<Vec<Scope>, ClientError> {
        let response: ScopeAllResponse = self
            .post_json("/resource/scope/all", Some(token), &serde_json::json!({}))
            .await?;
        Ok(response
            .scopes
            .into_iter()
            .map(|(id, name)| Scope { id, name })
            .collect())
    }

    async fn fetch_tags(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<Tag>, ClientError> {
        self.post_json(
            "/resource/tag",
            Some(token),
            &TagPayload {
                scope_ids: scope_ids.to_vec(),
            },
        )
        .await
    }

    async fn fetch_documents(
        &self,
        token: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentSummary>, ClientError> {
        self.post_json(
            "/resource/list",
            Some(token),
            &ListPayload {
                scope_ids: filter.scope_ids.clone(),
                unit_size: None,
                unit_number: None,
                tag_id: filter.tag_id,
            },
        )
        .await
    }

    async fn publish_document(
        &self,
        token: &str,
        doc_id: DocId,
        scope_ids: &[ScopeId],
        c_type: CType,
    ) -> Result<String, ClientError> {
        let response: PublishResponse = self
            .post_json(
                "/document/publish",
                Some(token),
                &PublishPayload {
                    doc_id,
                    scope_ids: scope_ids.to_vec(),
                    c_type,
                },
            )
            .await?;
        Ok(response.publish_token)
    }

    async fn fetch_document(&self, publish_token: &str) -> Result<DocumentDetail, ClientError> {
        // The publish token is the credential here; no bearer header.
        self.post_json(
            "/document",
            None,
            &GetDocumentPayload {
                publish_token: publish_token.to_string(),
            },
        )
        .await
    }

    async fn request_conversion(
        &self,
        token: &str,
        doc_id: DocId,
        c_type: CType,
    ) -> Result<(), ClientError> {
        self.post_unit(
            "/document/convert",
            Some(token),
            &ConvertPayload { doc_id, c_type },
        )
        .await
    }

    async fn create_document(
        &self,
        token: &str,
        draft: &CreatePayload,
    ) -> Result<(), ClientError> {
        self.post_unit("/document/create", Some(token), draft).await
    }

    async fn update_document(
        &self,
        token: &str,
        update: &UpdatePayload,
    ) -> Result<(), ClientError> {
        self.post_unit("/document/update", Some(token), update).await
    }

    async fn delete_documents(&self, token: &str, doc_ids: &[DocId]) -> Result<(), ClientError> {
        self.post_unit(
            "/document/delete",
            Some(token),
            &DeletePayload {
                doc_ids: doc_ids.to_vec(),
            },
        )
        .await
    }

    async fn fetch_sequences(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<Sequence>, ClientError> {
        self.post_json(
            "/resource/sequence/all",
            Some(token),
            &SequenceAllPayload {
                scope_ids: scope_ids.to_vec(),
            },
        )
        .await
    }

    async fn create_sequence(
        &self,
        token: &str,
        scope_ids: &[ScopeId],
        title: &str,
    ) -> Result<(), ClientError> {
        self.post_unit(
            "/resource/sequence/new",
            Some(token),
            &SeqNewPayload {
                scope_ids: scope_ids.to_vec(),
                title: title.to_string(),
            },
        )
        .await
    }

    async fn delete_sequence(&self, token: &str, seq_id: SeqId) -> Result<(), ClientError> {
        self.post_unit(
            "/resource/sequence/delete",
            Some(token),
            &SeqDeletePayload { seq_id },
        )
        .await
    }

    async fn fetch_sequence_members(
        &self,
        token: &str,
        seq_id: SeqId,
        scope_ids: &[ScopeId],
    ) -> Result<Vec<SequenceMember>, ClientError> {
        self.post_json(
            "/resource/sequence/list",
            Some(token),
            &SequenceListPayload {
                scope_ids: scope_ids.to_vec(),
                seq_id,
            },
        )
        .await
    }

    async fn persist_sequence_order(
        &self,
        token: &str,
        seq_id: SeqId,
        order: &[SequenceOrderEntry],
    ) -> Result<(), ClientError> {
        self.post_unit(
            "/resource/sequence/update",
            Some(token),
            &SeqUpdatePayload {
                seq_id,
                order: order.to_vec(),
            },
        )
        .await
    }

    async fn sequence_add(
        &self,
        token: &str,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError> {
        self.post_unit(
            "/resource/sequence/in",
            Some(token),
            &SeqInPayload { seq_id, doc_id },
        )
        .await
    }

    async fn sequence_remove(
        &self,
        token: &str,
        seq_id: SeqId,
        doc_id: DocId,
    ) -> Result<(), ClientError> {
        self.post_unit(
            "/resource/sequence/out",
            Some(token),
            &SeqOutPayload { seq_id, doc_id },
        )
        .await
    }

    fn file_url(&self, object_id: &ObjectId) -> String {
        format!("{}/file/{}", self.server_url, object_id.0)
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
