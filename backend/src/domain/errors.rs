//! Domain error taxonomy shared by every service.

use thiserror::Error;

/// Failure modes surfaced by the domain layer.
///
/// `Validation`, `NotFound`, and `Authorization` are caller mistakes and map
/// to 4xx responses; the remaining variants are infrastructure faults. None
/// of them are retried anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A field on an incoming command failed a validation rule.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The actor lacks the capability for this operation.
    #[error("not authorized to {0}")]
    Authorization(String),

    /// The registration store failed.
    #[error("persistence failure")]
    Persistence(#[source] anyhow::Error),

    /// Credential or image bytes could not be produced.
    #[error("encoding failure: {0}")]
    Encoding(String),

    /// The object store failed.
    #[error("object storage failure")]
    Storage(#[source] anyhow::Error),

    /// An outbound email or SMS transport failed.
    #[error("dispatch failure: {0}")]
    Dispatch(String),
}

impl DomainError {
    /// Shorthand for the validation variant.
    pub fn validation(field: &str, reason: &str) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for errors caused by the caller rather than the infrastructure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. } | DomainError::NotFound(_) | DomainError::Authorization(_)
        )
    }
}
