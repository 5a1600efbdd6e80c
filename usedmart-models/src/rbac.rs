use std::{future::Future, pin::Pin, sync::Arc};
use usedmart_error::{rbac::RBACError, UMResult};

use crate::cache::UserGrant;

pub type PermFuture = Pin<Box<dyn Future<Output = UMResult<bool, RBACError>> + Send>>;

/// Boxed rule closure, the usual payload of [`BasePermRule`].
pub type PermCheckFn = dyn Fn(&str, &str, Arc<UserGrant>) -> PermFuture + Send + Sync;

/// A predicate over the caller's grant for one route.
///
/// Rules compose with [`PermRule::and`] and [`PermRule::or`].
pub trait PermRule: Send + Sync {
    fn check(&self, method: &str, path: &str, grant: Arc<UserGrant>) -> PermFuture;

    #[inline]
    fn and<R: PermRule + 'static>(self, rule: R) -> Box<dyn PermRule>
    where
        Self: Sized + 'static,
    {
        Box::new(CombinedPermRule {
            rules: vec![Arc::new(self), Arc::new(rule)],
            is_or: false,
        })
    }

    #[inline]
    fn or<R: PermRule + 'static>(self, rule: R) -> Box<dyn PermRule>
    where
        Self: Sized + 'static,
    {
        Box::new(CombinedPermRule {
            rules: vec![Arc::new(self), Arc::new(rule)],
            is_or: true,
        })
    }
}

impl PermRule for Box<dyn PermRule> {
    #[inline]
    fn check(&self, method: &str, path: &str, grant: Arc<UserGrant>) -> PermFuture {
        (**self).check(method, path, grant)
    }
}

/// Rule backed by a closure.
pub struct BasePermRule<F>
where
    F: Fn(&str, &str, Arc<UserGrant>) -> PermFuture + Send + Sync,
{
    check_fn: F,
}

impl<F> BasePermRule<F>
where
    F: Fn(&str, &str, Arc<UserGrant>) -> PermFuture + Send + Sync,
{
    #[inline]
    pub fn new(check_fn: F) -> Self {
        Self { check_fn }
    }
}

impl<F> PermRule for BasePermRule<F>
where
    F: Fn(&str, &str, Arc<UserGrant>) -> PermFuture + Send + Sync,
{
    #[inline]
    fn check(&self, method: &str, path: &str, grant: Arc<UserGrant>) -> PermFuture {
        (self.check_fn)(method, path, grant)
    }
}

pub struct CombinedPermRule {
    rules: Vec<Arc<dyn PermRule>>,
    /// OR when true, AND otherwise.
    is_or: bool,
}

impl PermRule for CombinedPermRule {
    fn check(&self, method: &str, path: &str, grant: Arc<UserGrant>) -> PermFuture {
        let rules = self.rules.clone();
        let is_or = self.is_or;
        let method = method.to_string();
        let path = path.to_string();
        Box::pin(async move {
            for rule in &rules {
                let passed = rule.check(&method, &path, grant.clone()).await?;
                if passed == is_or {
                    return Ok(is_or);
                }
            }
            Ok(!is_or)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::common::Status;

    fn fixed(result: bool) -> BasePermRule<Box<PermCheckFn>> {
        BasePermRule::new(Box::new(move |_: &str, _: &str, _: Arc<UserGrant>| {
            Box::pin(async move { Ok(result) }) as PermFuture
        }))
    }

    fn grant() -> Arc<UserGrant> {
        Arc::new(UserGrant {
            profile_id: 2,
            username: "alice".into(),
            status: Status::Enabled,
            role: None,
            permissions: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_combinators() {
        assert!(fixed(false).or(fixed(true)).check("GET", "/x", grant()).await.unwrap());
        assert!(!fixed(false).or(fixed(false)).check("GET", "/x", grant()).await.unwrap());
        assert!(fixed(true).and(fixed(true)).check("GET", "/x", grant()).await.unwrap());
        assert!(!fixed(true).and(fixed(false)).check("GET", "/x", grant()).await.unwrap());
    }
}
