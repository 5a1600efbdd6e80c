use crate::{constants::ADMIN_ROLE_CODE, domain::prelude::SimpleRole, enums::common::Status};
use serde::{Deserialize, Serialize};

/// Authorization snapshot of one profile: its role and the permission codes
/// that role carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGrant {
    pub profile_id: i32,
    pub username: String,
    pub status: Status,
    pub role: Option<SimpleRole>,
    pub permissions: Vec<String>,
}

impl UserGrant {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.code == ADMIN_ROLE_CODE)
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.status == Status::Disabled
    }

    pub fn is_any_role(&self, codes: &[&str]) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| codes.contains(&role.code.as_str()))
    }

    /// Admins hold every permission implicitly.
    pub fn has_permission(&self, code: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MODERATOR_ROLE_CODE;

    fn grant(code: Option<&str>, permissions: &[&str]) -> UserGrant {
        UserGrant {
            profile_id: 5,
            username: "bob".into(),
            status: Status::Enabled,
            role: code.map(|c| SimpleRole {
                id: 9,
                code: c.into(),
            }),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_admin_holds_everything() {
        let admin = grant(Some(ADMIN_ROLE_CODE), &[]);
        assert!(admin.is_admin());
        assert!(admin.has_permission("settings:write"));
    }

    #[test]
    fn test_permission_lookup() {
        let moderator = grant(Some(MODERATOR_ROLE_CODE), &["product:approve"]);
        assert!(moderator.has_permission("product:approve"));
        assert!(!moderator.has_permission("role:write"));
        assert!(moderator.is_any_role(&[MODERATOR_ROLE_CODE, ADMIN_ROLE_CODE]));
        assert!(!grant(None, &[]).is_any_role(&[MODERATOR_ROLE_CODE]));
    }
}
