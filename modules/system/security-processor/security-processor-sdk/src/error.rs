//! Error types for the security processor API.

use thiserror::Error;

use crate::models::SubjectId;
use crate::permissions::SecurityPermission;

/// Errors surfaced to the membership layer.
///
/// Rejecting a joining node is not an error: node validation returns a
/// [`NodeValidationResult`](crate::NodeValidationResult) instead. Looking up an
/// unknown subject is not an error either.
#[derive(Debug, Error)]
pub enum SecurityProcessorError {
    /// The policy rejected the presented credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The policy denied an operation to an authenticated subject.
    #[error("authorization failed for subject '{subject_id}': {permission} on {}", .resource.as_deref().unwrap_or("<system>"))]
    Authorization {
        subject_id: SubjectId,
        permission: SecurityPermission,
        resource: Option<String>,
    },

    /// The request cannot be processed as given.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The processor is not in a state that allows the call.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SecurityProcessorError {
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}
