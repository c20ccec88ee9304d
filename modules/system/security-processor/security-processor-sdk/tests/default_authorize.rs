#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The default `SecurityPolicy::authorize` must agree with the context's
//! legacy capability checks.

use std::sync::Arc;

use security_processor_sdk::{
    AuthenticationContext, ClusterNode, DiscoveryDataBag, DiscoveryDataExchange,
    DiscoveryDataExchangeType, GridDiscoveryData, JoiningNodeDiscoveryData, NodeValidationResult,
    PermissionSet, SecurityContext, SecurityPermission, SecurityPolicy, SecurityProcessorError,
    SecuritySubject, SubjectId, SubjectType,
};

struct GrantedOnly;

impl DiscoveryDataExchange for GrantedOnly {
    fn collect(&self, _outgoing: &mut DiscoveryDataBag) {}

    fn collect_own(&self, _outgoing: &mut DiscoveryDataBag) {}

    fn on_received(&self, _all: &GridDiscoveryData) {}

    fn on_joiner_received(&self, _joiner: &JoiningNodeDiscoveryData) {}
}

impl SecurityPolicy for GrantedOnly {
    fn enabled(&self) -> bool {
        true
    }

    fn is_global_node_authentication(&self) -> bool {
        false
    }

    fn authenticate(
        &self,
        _request: &AuthenticationContext,
    ) -> Result<PermissionSet, SecurityProcessorError> {
        Ok(PermissionSet::default())
    }

    fn validate_node(
        &self,
        _node: &ClusterNode,
        _joining_data: Option<&JoiningNodeDiscoveryData>,
    ) -> Option<NodeValidationResult> {
        None
    }
}

fn context(permissions: PermissionSet) -> SecurityContext {
    SecurityContext::new(Arc::new(SecuritySubject::new(
        SubjectId::from("client-1"),
        SubjectType::RemoteClient,
        None,
        None,
        permissions,
    )))
}

#[test]
fn default_authorize_follows_subject_permissions() {
    let policy = GrantedOnly;
    let ctx = context(
        PermissionSet::deny_all()
            .grant_cache("orders", [SecurityPermission::CacheRead])
            .grant_task("*", [SecurityPermission::TaskExecute]),
    );

    assert!(
        policy
            .authorize(Some("orders"), SecurityPermission::CacheRead, &ctx)
            .is_ok()
    );
    assert!(
        policy
            .authorize(None, SecurityPermission::TaskExecute, &ctx)
            .is_ok()
    );

    let err = policy
        .authorize(Some("orders"), SecurityPermission::CacheRemove, &ctx)
        .unwrap_err();
    match err {
        SecurityProcessorError::Authorization {
            subject_id,
            permission,
            resource,
        } => {
            assert_eq!(subject_id.as_str(), "client-1");
            assert_eq!(permission, SecurityPermission::CacheRemove);
            assert_eq!(resource.as_deref(), Some("orders"));
        }
        other => panic!("Expected Authorization, got: {other:?}"),
    }
}

#[test]
fn default_authorize_matches_legacy_checks() {
    let policy = GrantedOnly;
    let ctx = context(
        PermissionSet::deny_all()
            .grant_service("billing", [SecurityPermission::ServiceInvoke])
            .grant_system([SecurityPermission::AdminView]),
    );

    let cases = [
        (Some("billing"), SecurityPermission::ServiceInvoke),
        (Some("billing"), SecurityPermission::ServiceDeploy),
        (None, SecurityPermission::AdminView),
        (None, SecurityPermission::AdminOps),
        (Some("orders"), SecurityPermission::CacheRead),
    ];

    for (resource, permission) in cases {
        assert_eq!(
            policy.authorize(resource, permission, &ctx).is_ok(),
            ctx.operation_allowed(resource, permission),
            "{resource:?} {permission}"
        );
    }
}

#[test]
fn legacy_checks_agree_for_permissions_of_another_scope() {
    let policy = GrantedOnly;
    let ctx = context(
        PermissionSet::deny_all()
            .grant_cache("orders", [SecurityPermission::CacheRead])
            .grant_system([SecurityPermission::AdminView]),
    );

    let authorized = |resource, permission| policy.authorize(resource, permission, &ctx).is_ok();

    assert!(authorized(Some("orders"), SecurityPermission::CacheRead));
    assert_eq!(
        ctx.task_operation_allowed(Some("orders"), SecurityPermission::CacheRead),
        authorized(Some("orders"), SecurityPermission::CacheRead)
    );
    assert_eq!(
        ctx.service_operation_allowed(Some("orders"), SecurityPermission::CacheRead),
        authorized(Some("orders"), SecurityPermission::CacheRead)
    );
    assert_eq!(
        ctx.system_operation_allowed(SecurityPermission::CacheRead),
        authorized(None, SecurityPermission::CacheRead)
    );

    assert!(authorized(Some("x"), SecurityPermission::AdminView));
    assert_eq!(
        ctx.task_operation_allowed(Some("x"), SecurityPermission::AdminView),
        authorized(Some("x"), SecurityPermission::AdminView)
    );
    assert_eq!(
        ctx.cache_operation_allowed(Some("x"), SecurityPermission::AdminOps),
        authorized(Some("x"), SecurityPermission::AdminOps)
    );
}

#[test]
fn default_hooks_are_benign() {
    let policy = GrantedOnly;

    assert_eq!(
        policy.discovery_data_type(),
        DiscoveryDataExchangeType::Plugin
    );
    policy.on_disconnected();
    assert!(policy.on_reconnected(true).is_ok());
}
