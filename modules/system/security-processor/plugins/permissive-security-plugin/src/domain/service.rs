//! Service implementation for the permissive security plugin.

use security_processor_sdk::{AuthenticationContext, PermissionSet};

/// Permissive security service.
///
/// Stateless: grants unrestricted permissions to whoever asks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Service;

impl Service {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Permissions for any subject, credentials ignored.
    #[must_use]
    pub fn authenticate(&self, request: &AuthenticationContext) -> PermissionSet {
        tracing::trace!(
            subject_id = %request.subject_id,
            has_credentials = request.credentials.is_some(),
            "Granting unrestricted permissions"
        );
        PermissionSet::allow_all()
    }
}
