use actix_web::http::Method;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use usedmart_error::{rbac::RBACError, UMResult};
use usedmart_models::{cache::UserGrant, rbac::PermRule, PermChecker};

type BoxedPermRule = Box<dyn PermRule>;

/// Route rules keyed by `(METHOD, route pattern)`.
#[derive(Default)]
pub struct UMPermChecker {
    rules: Arc<RwLock<HashMap<(String, String), BoxedPermRule>>>,
}

impl UMPermChecker {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rule_count(&self) -> usize {
        self.rules.read().await.len()
    }
}

#[async_trait]
impl PermChecker for UMPermChecker {
    fn init() -> Arc<Self> {
        Arc::new(Self::new())
    }

    async fn register<R: PermRule + 'static>(
        &self,
        method: Method,
        path: String,
        rule: R,
    ) -> UMResult<(), RBACError> {
        let key = (method.as_str().to_string(), path);
        let mut rules = self.rules.write().await;

        if rules.contains_key(&key) {
            return Err(RBACError::RuleExists {
                method: key.0,
                path: key.1,
            });
        }

        rules.insert(key, Box::new(rule));
        Ok(())
    }

    async fn check(
        &self,
        method: &str,
        path: &str,
        grant: Arc<UserGrant>,
    ) -> UMResult<bool, RBACError> {
        if grant.is_admin() {
            return Ok(true);
        }

        let key = (method.to_string(), path.to_string());
        if let Some(rule) = self.rules.read().await.get(&key) {
            return rule.check(method, path, grant).await;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usedmart_models::{
        constants::ADMIN_ROLE_CODE,
        domain::prelude::SimpleRole,
        enums::common::Status,
        rbac::{BasePermRule, PermCheckFn, PermFuture},
    };

    fn needs(code: &'static str) -> BasePermRule<Box<PermCheckFn>> {
        BasePermRule::new(Box::new(move |_: &str, _: &str, grant: Arc<UserGrant>| {
            Box::pin(async move { Ok(grant.has_permission(code)) }) as PermFuture
        }))
    }

    fn grant(role: Option<&str>, permissions: &[&str]) -> Arc<UserGrant> {
        Arc::new(UserGrant {
            profile_id: 7,
            username: "carol".into(),
            status: Status::Enabled,
            role: role.map(|code| SimpleRole {
                id: 1,
                code: code.into(),
            }),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_registered_rule_is_enforced() {
        let checker = UMPermChecker::new();
        checker
            .register(Method::GET, "/api/role/list".into(), needs("role:read"))
            .await
            .unwrap();

        assert!(checker
            .check("GET", "/api/role/list", grant(None, &["role:read"]))
            .await
            .unwrap());
        assert!(!checker
            .check("GET", "/api/role/list", grant(None, &[]))
            .await
            .unwrap());
        assert!(checker
            .check("GET", "/api/role/list", grant(Some(ADMIN_ROLE_CODE), &[]))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unregistered_route_passes() {
        let checker = UMPermChecker::new();
        assert!(checker
            .check("GET", "/api/profile/me", grant(None, &[]))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let checker = UMPermChecker::new();
        checker
            .register(Method::DELETE, "/api/role/{id}".into(), needs("role:delete"))
            .await
            .unwrap();
        let err = checker
            .register(Method::DELETE, "/api/role/{id}".into(), needs("role:delete"))
            .await
            .unwrap_err();
        assert!(matches!(err, RBACError::RuleExists { .. }));
        assert_eq!(checker.rule_count().await, 1);
    }
}
