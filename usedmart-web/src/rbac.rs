//! Rule builders for route registration.
//!
//! Every builder validates its arguments up front and yields a boxed closure
//! rule evaluated against the caller's [`UserGrant`]. Admins never reach these
//! closures; the permission checker lets them through first.

use std::sync::Arc;
use usedmart_error::{rbac::RBACError, UMResult};
use usedmart_models::{
    cache::UserGrant,
    enums::common::{permission_code, EntityType, Operation},
    rbac::{BasePermRule, PermCheckFn, PermFuture},
};

pub type BoxedRule = BasePermRule<Box<PermCheckFn>>;

/// Passes for any authenticated caller.
#[inline]
pub fn is_authenticated() -> UMResult<BoxedRule, RBACError> {
    let check_fn = Box::new(|_method: &str, _path: &str, _grant: Arc<UserGrant>| {
        Box::pin(async move { Ok(true) }) as PermFuture
    });
    Ok(BasePermRule::new(check_fn))
}

/// Passes when the caller's role is one of `roles`.
#[inline]
pub fn has_any_role(roles: &'static [&str]) -> UMResult<BoxedRule, RBACError> {
    if roles.is_empty() {
        return Err(RBACError::InvalidValue("Roles is empty".to_string()));
    }
    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(RBACError::InvalidValue(
            "Role codes cannot be empty".to_string(),
        ));
    }

    let check_fn = Box::new(move |_method: &str, _path: &str, grant: Arc<UserGrant>| {
        Box::pin(async move { Ok(grant.is_any_role(roles)) }) as PermFuture
    });
    Ok(BasePermRule::new(check_fn))
}

/// Passes when the caller holds `resource:operation`.
#[inline]
pub fn has_permission(
    resource: EntityType,
    operation: Operation,
) -> UMResult<BoxedRule, RBACError> {
    if !resource.operations().contains(&operation) {
        return Err(RBACError::InvalidValue(format!(
            "{resource} does not support {operation}"
        )));
    }

    let code = permission_code(resource, operation);
    let check_fn = Box::new(move |_method: &str, _path: &str, grant: Arc<UserGrant>| {
        let allowed = grant.has_permission(&code);
        Box::pin(async move { Ok(allowed) }) as PermFuture
    });
    Ok(BasePermRule::new(check_fn))
}

/// Passes when the caller holds at least one of `operations` on `resource`.
#[inline]
pub fn has_any_permission(
    resource: EntityType,
    operations: &'static [Operation],
) -> UMResult<BoxedRule, RBACError> {
    if operations.is_empty() {
        return Err(RBACError::InvalidValue(
            "Operations list cannot be empty".to_string(),
        ));
    }

    let codes: Vec<String> = operations
        .iter()
        .map(|operation| permission_code(resource, *operation))
        .collect();
    let check_fn = Box::new(move |_method: &str, _path: &str, grant: Arc<UserGrant>| {
        let allowed = codes.iter().any(|code| grant.has_permission(code));
        Box::pin(async move { Ok(allowed) }) as PermFuture
    });
    Ok(BasePermRule::new(check_fn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use usedmart_models::{
        constants::{MODERATOR_ROLE_CODE, USER_ROLE_CODE},
        domain::prelude::SimpleRole,
        enums::common::Status,
        rbac::PermRule,
    };

    fn grant(role: &str, permissions: &[&str]) -> Arc<UserGrant> {
        Arc::new(UserGrant {
            profile_id: 3,
            username: "dave".into(),
            status: Status::Enabled,
            role: Some(SimpleRole {
                id: 2,
                code: role.into(),
            }),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_has_permission() {
        let rule = has_permission(EntityType::Product, Operation::Approve).unwrap();
        let moderator = grant(MODERATOR_ROLE_CODE, &["product:approve"]);
        let member = grant(USER_ROLE_CODE, &[]);
        assert!(rule.check("PUT", "/p", moderator).await.unwrap());
        assert!(!rule.check("PUT", "/p", member).await.unwrap());
    }

    #[test]
    fn test_unsupported_operation_is_rejected() {
        assert!(has_permission(EntityType::Message, Operation::Write).is_err());
        assert!(has_any_role(&[]).is_err());
        assert!(has_any_permission(EntityType::Order, &[]).is_err());
    }

    #[tokio::test]
    async fn test_role_or_permission() {
        let rule = has_any_role(&[MODERATOR_ROLE_CODE])
            .unwrap()
            .or(has_any_permission(EntityType::Message, &[Operation::Read, Operation::Delete]).unwrap());
        assert!(rule
            .check("GET", "/m", grant(USER_ROLE_CODE, &["message:delete"]))
            .await
            .unwrap());
        assert!(rule
            .check("GET", "/m", grant(MODERATOR_ROLE_CODE, &[]))
            .await
            .unwrap());
        assert!(!rule
            .check("GET", "/m", grant(USER_ROLE_CODE, &[]))
            .await
            .unwrap());
    }
}
