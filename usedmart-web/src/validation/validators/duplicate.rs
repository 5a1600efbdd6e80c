use crate::validation::EntityValidator;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::instrument;
use usedmart_error::{web::WebError, WebResult};
use usedmart_models::{
    entities::{
        prelude::{CategoryActiveModel, PermissionActiveModel, ProfileActiveModel, RoleActiveModel},
        UMEntity,
    },
    enums::common::{EntityType, Operation},
};
use usedmart_repository::{
    CategoryRepository, PermissionRepository, ProfileRepository, RoleRepository,
};

/// Rejects a unique field (username, role or permission code, category slug)
/// that another row already holds.
pub struct EntityDuplicateValidator;

#[async_trait]
impl EntityValidator for EntityDuplicateValidator {
    #[inline]
    fn supported_entity_types(&self) -> Vec<EntityType> {
        vec![
            EntityType::Profile,
            EntityType::Role,
            EntityType::Permission,
            EntityType::Category,
        ]
    }

    #[inline]
    fn supported_operations(&self) -> Vec<Operation> {
        vec![Operation::Create, Operation::Write]
    }

    #[instrument(skip(self, entity))]
    async fn validate(&self, entity: &dyn UMEntity, operation: Operation) -> WebResult<()> {
        match entity.entity_type() {
            EntityType::Profile => validate_profile(downcast(entity)?, operation).await,
            EntityType::Role => validate_role(downcast(entity)?, operation).await,
            EntityType::Permission => validate_permission(downcast(entity)?, operation).await,
            EntityType::Category => validate_category(downcast(entity)?, operation).await,
            _ => Ok(()),
        }
    }
}

#[inline]
fn downcast<T: UMEntity>(entity: &dyn UMEntity) -> WebResult<&T> {
    entity.downcast_ref::<T>().ok_or(WebError::InternalError(format!(
        "unexpected model for {}",
        entity.entity_type()
    )))
}

#[inline]
async fn validate_profile(profile: &ProfileActiveModel, operation: Operation) -> WebResult<()> {
    // Usernames are fixed after sign-up, so only creation can collide.
    if operation != Operation::Create {
        return Ok(());
    }
    if let Some(username) = profile.username.clone().take() {
        if ProfileRepository::exists_by_username(&username, None::<&DatabaseConnection>).await? {
            return Err(WebError::Conflict(format!("username `{username}` is taken")));
        }
    }
    Ok(())
}

#[inline]
async fn validate_role(role: &RoleActiveModel, operation: Operation) -> WebResult<()> {
    let Some(code) = role.code.clone().take() else {
        return Ok(());
    };
    let duplicate = match (operation, role.id.clone().take()) {
        (Operation::Create, _) => {
            RoleRepository::exists_by_code(&code, None::<&DatabaseConnection>).await?
        }
        (Operation::Write, Some(id)) => {
            RoleRepository::exists_by_code_exclude_id(id, &code, None::<&DatabaseConnection>)
                .await?
        }
        _ => false,
    };
    if duplicate {
        return Err(WebError::Conflict(format!("role code `{code}` already exists")));
    }
    Ok(())
}

#[inline]
async fn validate_permission(
    permission: &PermissionActiveModel,
    operation: Operation,
) -> WebResult<()> {
    let Some(code) = permission.code.clone().take() else {
        return Ok(());
    };
    let duplicate = match (operation, permission.id.clone().take()) {
        (Operation::Create, _) => {
            PermissionRepository::exists_by_code(&code, None::<&DatabaseConnection>).await?
        }
        (Operation::Write, Some(id)) => {
            PermissionRepository::exists_by_code_exclude_id(id, &code, None::<&DatabaseConnection>)
                .await?
        }
        _ => false,
    };
    if duplicate {
        return Err(WebError::Conflict(format!(
            "permission code `{code}` already exists"
        )));
    }
    Ok(())
}

#[inline]
async fn validate_category(category: &CategoryActiveModel, operation: Operation) -> WebResult<()> {
    let Some(slug) = category.slug.clone().take() else {
        return Ok(());
    };
    let duplicate = match (operation, category.id.clone().take()) {
        (Operation::Create, _) => {
            CategoryRepository::exists_by_slug(&slug, None::<&DatabaseConnection>).await?
        }
        (Operation::Write, Some(id)) => {
            CategoryRepository::exists_by_slug_exclude_id(id, &slug, None::<&DatabaseConnection>)
                .await?
        }
        _ => false,
    };
    if duplicate {
        return Err(WebError::Conflict(format!("category slug `{slug}` already exists")));
    }
    Ok(())
}
