use once_cell::sync::Lazy;
use sea_orm::{sea_query::StringLen, DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::{
    collections::HashMap,
    fmt::{Display, Error, Formatter},
};
use usedmart_macros::IntoActiveValue;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize_repr,
    Deserialize_repr,
    IntoActiveValue,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[repr(i16)]
pub enum Status {
    Enabled = 0,
    Disabled = 1,
}

/// Resources guarded by permissions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    IntoActiveValue,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(20))",
    rename_all = "snake_case"
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Profile,
    Category,
    Product,
    Order,
    Message,
    Role,
    Permission,
    Settings,
}

impl EntityType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Category => "category",
            Self::Product => "product",
            Self::Order => "order",
            Self::Message => "message",
            Self::Role => "role",
            Self::Permission => "permission",
            Self::Settings => "settings",
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Category => "Category",
            Self::Product => "Product",
            Self::Order => "Order",
            Self::Message => "Message",
            Self::Role => "Role",
            Self::Permission => "Permission",
            Self::Settings => "System Settings",
        }
    }

    #[inline]
    pub fn operations(&self) -> Vec<Operation> {
        RESOURCE_OPERATIONS.get(self).cloned().unwrap_or_default()
    }

    pub fn all() -> [EntityType; 8] {
        [
            Self::Profile,
            Self::Category,
            Self::Product,
            Self::Order,
            Self::Message,
            Self::Role,
            Self::Permission,
            Self::Settings,
        ]
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Write,
    Delete,
    /// Assign roles to profiles
    Assign,
    /// Moderate listings
    Approve,
}

impl Operation {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Approve => "approve",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// `resource:operation`, the code stored in `permissions.code`.
#[inline]
pub fn permission_code(entity: EntityType, operation: Operation) -> String {
    format!("{}:{}", entity.as_str(), operation.as_str())
}

pub static RESOURCE_OPERATIONS: Lazy<HashMap<EntityType, Vec<Operation>>> = Lazy::new(|| {
    use Operation::*;

    let crud = vec![Create, Read, Write, Delete];
    let mut map = HashMap::new();
    map.insert(EntityType::Profile, vec![Create, Read, Write, Delete, Assign]);
    map.insert(EntityType::Category, crud.clone());
    map.insert(EntityType::Product, vec![Read, Write, Delete, Approve]);
    map.insert(EntityType::Order, vec![Read, Write]);
    map.insert(EntityType::Message, vec![Read, Delete]);
    map.insert(EntityType::Role, vec![Create, Read, Write, Delete, Assign]);
    map.insert(EntityType::Permission, crud);
    map.insert(EntityType::Settings, vec![Read, Write, Delete]);
    map
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_code_format() {
        assert_eq!(
            permission_code(EntityType::Product, Operation::Approve),
            "product:approve"
        );
    }

    #[test]
    fn test_every_entity_has_operations() {
        for entity in EntityType::all() {
            assert!(!entity.operations().is_empty(), "{entity} has no operations");
        }
    }
}
