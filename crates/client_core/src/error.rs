use shared::error::BackendRejection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Backend(#[from] BackendRejection),
    #[error("request failed to complete: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("no document loaded")]
    NoDocumentLoaded,
    #[error("no sequence loaded")]
    NoSequenceLoaded,
    #[error("unknown conversion format {0}")]
    UnknownFormat(i32),
    #[error("format {0} is reserved for the published source")]
    ReservedFormat(i32),
    #[error("sequence order unchanged, nothing to commit")]
    CleanSequence,
}

impl ClientError {
    /// Text for a failure notice. Backend rejections carry the backend's
    /// own message when it sent one.
    pub fn notice(&self) -> String {
        match self {
            ClientError::Backend(rejection) if !rejection.message.is_empty() => {
                rejection.message.clone()
            }
            other => other.to_string(),
        }
    }
}
