use thiserror::Error;

/// Rejection reply from the backend: the HTTP status plus the plain-text
/// body its route handlers emit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend rejected request ({status}): {message}")]
pub struct BackendRejection {
    pub status: u16,
    pub message: String,
}

impl BackendRejection {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
