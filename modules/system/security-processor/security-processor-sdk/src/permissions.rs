use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Area of the cluster a permission applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    Task,
    Cache,
    Service,
    /// Cluster-wide operations that are not tied to a named resource.
    System,
}

/// A privileged operation a subject may be granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPermission {
    CacheRead,
    CachePut,
    CacheRemove,
    CacheCreate,
    CacheDestroy,
    TaskExecute,
    TaskCancel,
    ServiceDeploy,
    ServiceCancel,
    ServiceInvoke,
    EventsEnable,
    EventsDisable,
    AdminView,
    AdminQuery,
    AdminCache,
    AdminOps,
    JoinAsServer,
}

impl SecurityPermission {
    #[must_use]
    pub fn scope(self) -> PermissionScope {
        match self {
            Self::CacheRead
            | Self::CachePut
            | Self::CacheRemove
            | Self::CacheCreate
            | Self::CacheDestroy => PermissionScope::Cache,
            Self::TaskExecute | Self::TaskCancel => PermissionScope::Task,
            Self::ServiceDeploy | Self::ServiceCancel | Self::ServiceInvoke => {
                PermissionScope::Service
            }
            Self::EventsEnable
            | Self::EventsDisable
            | Self::AdminView
            | Self::AdminQuery
            | Self::AdminCache
            | Self::AdminOps
            | Self::JoinAsServer => PermissionScope::System,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CacheRead => "cache_read",
            Self::CachePut => "cache_put",
            Self::CacheRemove => "cache_remove",
            Self::CacheCreate => "cache_create",
            Self::CacheDestroy => "cache_destroy",
            Self::TaskExecute => "task_execute",
            Self::TaskCancel => "task_cancel",
            Self::ServiceDeploy => "service_deploy",
            Self::ServiceCancel => "service_cancel",
            Self::ServiceInvoke => "service_invoke",
            Self::EventsEnable => "events_enable",
            Self::EventsDisable => "events_disable",
            Self::AdminView => "admin_view",
            Self::AdminQuery => "admin_query",
            Self::AdminCache => "admin_cache",
            Self::AdminOps => "admin_ops",
            Self::JoinAsServer => "join_as_server",
        }
    }
}

impl fmt::Display for SecurityPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource pattern to granted permissions.
///
/// A pattern is an exact resource name, `*` (any resource, including an
/// unnamed one) or `prefix*`.
pub type ResourcePermissions = BTreeMap<String, BTreeSet<SecurityPermission>>;

/// Capability set carried by a [`SecuritySubject`](crate::SecuritySubject).
///
/// `PermissionSet::default()` grants nothing. When a resource matches at least
/// one pattern, only the permissions listed for the matching patterns apply;
/// `default_allow_all` decides for resources no pattern mentions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionSet {
    default_allow_all: bool,
    task: ResourcePermissions,
    cache: ResourcePermissions,
    service: ResourcePermissions,
    /// `None` falls back to `default_allow_all`.
    system: Option<BTreeSet<SecurityPermission>>,
}

impl PermissionSet {
    /// A set that grants every permission on every resource.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            default_allow_all: true,
            ..Self::default()
        }
    }

    /// A set that grants nothing.
    #[must_use]
    pub fn deny_all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_allow_all(&self) -> bool {
        self.default_allow_all
    }

    #[must_use]
    pub fn with_default_allow_all(mut self, allow: bool) -> Self {
        self.default_allow_all = allow;
        self
    }

    #[must_use]
    pub fn grant_task(
        mut self,
        pattern: impl Into<String>,
        permissions: impl IntoIterator<Item = SecurityPermission>,
    ) -> Self {
        grant(&mut self.task, pattern.into(), permissions);
        self
    }

    #[must_use]
    pub fn grant_cache(
        mut self,
        pattern: impl Into<String>,
        permissions: impl IntoIterator<Item = SecurityPermission>,
    ) -> Self {
        grant(&mut self.cache, pattern.into(), permissions);
        self
    }

    #[must_use]
    pub fn grant_service(
        mut self,
        pattern: impl Into<String>,
        permissions: impl IntoIterator<Item = SecurityPermission>,
    ) -> Self {
        grant(&mut self.service, pattern.into(), permissions);
        self
    }

    #[must_use]
    pub fn grant_system(mut self, permissions: impl IntoIterator<Item = SecurityPermission>) -> Self {
        self.system
            .get_or_insert_with(BTreeSet::new)
            .extend(permissions);
        self
    }

    /// Check `permission` on `resource`, using the permission's own scope.
    #[must_use]
    pub fn allows(&self, resource: Option<&str>, permission: SecurityPermission) -> bool {
        self.allows_in(permission.scope(), resource, permission)
    }

    /// Check `permission` on `resource` within an explicit scope.
    ///
    /// The resource name is ignored for [`PermissionScope::System`].
    #[must_use]
    pub fn allows_in(
        &self,
        scope: PermissionScope,
        resource: Option<&str>,
        permission: SecurityPermission,
    ) -> bool {
        match scope {
            PermissionScope::Task => self.resource_allows(&self.task, resource, permission),
            PermissionScope::Cache => self.resource_allows(&self.cache, resource, permission),
            PermissionScope::Service => self.resource_allows(&self.service, resource, permission),
            PermissionScope::System => self
                .system
                .as_ref()
                .map_or(self.default_allow_all, |granted| granted.contains(&permission)),
        }
    }

    fn resource_allows(
        &self,
        entries: &ResourcePermissions,
        resource: Option<&str>,
        permission: SecurityPermission,
    ) -> bool {
        let mut matched = false;
        for (pattern, granted) in entries {
            if pattern_matches(pattern, resource) {
                if granted.contains(&permission) {
                    return true;
                }
                matched = true;
            }
        }
        !matched && self.default_allow_all
    }
}

fn grant(
    entries: &mut ResourcePermissions,
    pattern: String,
    permissions: impl IntoIterator<Item = SecurityPermission>,
) {
    entries.entry(pattern).or_default().extend(permissions);
}

fn pattern_matches(pattern: &str, resource: Option<&str>) -> bool {
    match pattern.strip_suffix('*') {
        Some("") => true,
        Some(prefix) => resource.is_some_and(|name| name.starts_with(prefix)),
        None => resource == Some(pattern),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const ALL: [SecurityPermission; 17] = [
        SecurityPermission::CacheRead,
        SecurityPermission::CachePut,
        SecurityPermission::CacheRemove,
        SecurityPermission::CacheCreate,
        SecurityPermission::CacheDestroy,
        SecurityPermission::TaskExecute,
        SecurityPermission::TaskCancel,
        SecurityPermission::ServiceDeploy,
        SecurityPermission::ServiceCancel,
        SecurityPermission::ServiceInvoke,
        SecurityPermission::EventsEnable,
        SecurityPermission::EventsDisable,
        SecurityPermission::AdminView,
        SecurityPermission::AdminQuery,
        SecurityPermission::AdminCache,
        SecurityPermission::AdminOps,
        SecurityPermission::JoinAsServer,
    ];

    #[test]
    fn allow_all_grants_everything_including_unnamed_resources() {
        let set = PermissionSet::allow_all();

        for permission in ALL {
            assert!(set.allows(None, permission), "{permission}");
            assert!(set.allows(Some("anything"), permission), "{permission}");
        }
    }

    #[test]
    fn default_set_denies_everything() {
        let set = PermissionSet::default();

        for permission in ALL {
            assert!(!set.allows(None, permission), "{permission}");
            assert!(!set.allows(Some("anything"), permission), "{permission}");
        }
    }

    #[test]
    fn exact_pattern_matches_only_that_resource() {
        let set = PermissionSet::deny_all().grant_cache("orders", [SecurityPermission::CacheRead]);

        assert!(set.allows(Some("orders"), SecurityPermission::CacheRead));
        assert!(!set.allows(Some("orders"), SecurityPermission::CachePut));
        assert!(!set.allows(Some("orders-archive"), SecurityPermission::CacheRead));
        assert!(!set.allows(None, SecurityPermission::CacheRead));
    }

    #[test]
    fn prefix_pattern_matches_named_resources() {
        let set = PermissionSet::deny_all()
            .grant_task("com.acme.*", [SecurityPermission::TaskExecute]);

        assert!(set.allows(Some("com.acme.Report"), SecurityPermission::TaskExecute));
        assert!(!set.allows(Some("org.other.Job"), SecurityPermission::TaskExecute));
        assert!(!set.allows(None, SecurityPermission::TaskExecute));
    }

    #[test]
    fn wildcard_pattern_matches_unnamed_resource() {
        let set = PermissionSet::deny_all().grant_service("*", [SecurityPermission::ServiceInvoke]);

        assert!(set.allows(None, SecurityPermission::ServiceInvoke));
        assert!(set.allows(Some("billing"), SecurityPermission::ServiceInvoke));
        assert!(!set.allows(Some("billing"), SecurityPermission::ServiceDeploy));
    }

    #[test]
    fn explicit_entries_override_default_allow_all() {
        let set = PermissionSet::allow_all().grant_cache("secrets", [SecurityPermission::CacheRead]);

        assert!(set.allows(Some("secrets"), SecurityPermission::CacheRead));
        assert!(!set.allows(Some("secrets"), SecurityPermission::CachePut));
        assert!(set.allows(Some("public"), SecurityPermission::CachePut));
    }

    #[test]
    fn system_set_replaces_default() {
        let set = PermissionSet::allow_all().grant_system([SecurityPermission::AdminView]);

        assert!(set.allows(None, SecurityPermission::AdminView));
        assert!(!set.allows(None, SecurityPermission::AdminOps));

        let set = PermissionSet::deny_all().with_default_allow_all(true);
        assert!(set.allows(None, SecurityPermission::AdminOps));
    }

    #[test]
    fn permission_scopes() {
        assert_eq!(SecurityPermission::CachePut.scope(), PermissionScope::Cache);
        assert_eq!(SecurityPermission::TaskCancel.scope(), PermissionScope::Task);
        assert_eq!(
            SecurityPermission::ServiceDeploy.scope(),
            PermissionScope::Service
        );
        assert_eq!(
            SecurityPermission::JoinAsServer.scope(),
            PermissionScope::System
        );
    }

    #[test]
    fn display_matches_serde_name() {
        for permission in ALL {
            let json = serde_json::to_string(&permission).unwrap();
            assert_eq!(json, format!("\"{permission}\""));
        }
    }

    #[test]
    fn deserializes_from_config_shape() {
        let set: PermissionSet = serde_json::from_value(serde_json::json!({
            "cache": { "orders": ["cache_read", "cache_put"] },
            "task": { "*": ["task_execute"] },
            "system": ["admin_view"]
        }))
        .unwrap();

        assert!(set.allows(Some("orders"), SecurityPermission::CachePut));
        assert!(set.allows(Some("AnyTask"), SecurityPermission::TaskExecute));
        assert!(set.allows(None, SecurityPermission::AdminView));
        assert!(!set.allows(None, SecurityPermission::AdminOps));
        assert!(!set.allows(Some("users"), SecurityPermission::CacheRead));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<PermissionSet>(serde_json::json!({
            "caches": {}
        }));

        assert!(result.is_err());
    }
}
