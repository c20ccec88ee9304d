use std::sync::Arc;

use crate::models::SecuritySubject;
use crate::permissions::SecurityPermission;

/// `SecurityContext` binds capability checks to one authenticated subject.
///
/// Returned by the security processor on successful authentication and
/// rebuilt on demand from the subject registry. The subject is shared, never
/// copied, and the context never changes after construction.
///
/// Every check consults [`SecuritySubject::permissions`], so the checks here
/// and the processor's central `authorize` call always reach the same answer
/// for the same subject.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    subject: Arc<SecuritySubject>,
}

impl SecurityContext {
    #[must_use]
    pub fn new(subject: Arc<SecuritySubject>) -> Self {
        Self { subject }
    }

    /// The subject this context is bound to.
    #[must_use]
    pub fn subject(&self) -> &SecuritySubject {
        &self.subject
    }

    /// Shared handle to the bound subject.
    #[must_use]
    pub fn shared_subject(&self) -> Arc<SecuritySubject> {
        Arc::clone(&self.subject)
    }

    /// The legacy checks below resolve `permission` in its own scope, the
    /// same lookup [`Self::operation_allowed`] performs. The method name only
    /// says what kind of resource the name refers to.
    #[must_use]
    pub fn task_operation_allowed(&self, task: Option<&str>, permission: SecurityPermission) -> bool {
        self.operation_allowed(task, permission)
    }

    #[must_use]
    pub fn cache_operation_allowed(
        &self,
        cache: Option<&str>,
        permission: SecurityPermission,
    ) -> bool {
        self.operation_allowed(cache, permission)
    }

    #[must_use]
    pub fn system_operation_allowed(&self, permission: SecurityPermission) -> bool {
        self.operation_allowed(None, permission)
    }

    #[must_use]
    pub fn service_operation_allowed(
        &self,
        service: Option<&str>,
        permission: SecurityPermission,
    ) -> bool {
        self.operation_allowed(service, permission)
    }

    /// Check a permission in the scope it belongs to.
    #[must_use]
    pub fn operation_allowed(&self, resource: Option<&str>, permission: SecurityPermission) -> bool {
        self.subject.permissions().allows(resource, permission)
    }
}
