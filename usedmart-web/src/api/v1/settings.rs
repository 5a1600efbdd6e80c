//! System settings API endpoints

use crate::rbac::has_permission;
use actix_web::{http::Method, web};
use actix_web_validator::{Json, Path};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use tracing::{info, instrument};
use usedmart_common::UMPermChecker;
use usedmart_error::{rbac::RBACError, web::WebError, WebResult};
use usedmart_models::{
    domain::prelude::{SettingItem, SettingKeyPath, SystemSettingInfo, UpsertSettings},
    enums::common::{EntityType, Operation},
    web::WebResponse,
    PermChecker,
};
use usedmart_repository::SettingsRepository;

pub(super) const ROUTER_PREFIX: &str = "/settings";

/// Configure settings routes
///
/// # Routes
/// - GET `/list`: Every setting, public or not
/// - GET `/detail/{key}`: One setting
/// - PUT ``: Batch upsert
/// - DELETE `/{key}`: Delete a setting
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::put().to(upsert))
        .route("/list", web::get().to(list))
        .route("/detail/{key}", web::get().to(get_by_key))
        .route("/{key}", web::delete().to(delete));
}

#[inline]
#[instrument(name = "init-settings-rbac", skip(router_prefix, perm_checker))]
pub(crate) async fn init_rbac_rules(
    router_prefix: &str,
    perm_checker: &UMPermChecker,
) -> WebResult<(), RBACError> {
    info!("Initializing settings module RBAC rules...");

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/list"),
            has_permission(EntityType::Settings, Operation::Read)?,
        )
        .await?;

    perm_checker
        .register(
            Method::GET,
            format!("{router_prefix}{ROUTER_PREFIX}/detail/{{key}}"),
            has_permission(EntityType::Settings, Operation::Read)?,
        )
        .await?;

    perm_checker
        .register(
            Method::PUT,
            format!("{router_prefix}{ROUTER_PREFIX}"),
            has_permission(EntityType::Settings, Operation::Write)?,
        )
        .await?;

    perm_checker
        .register(
            Method::DELETE,
            format!("{router_prefix}{ROUTER_PREFIX}/{{key}}"),
            has_permission(EntityType::Settings, Operation::Delete)?,
        )
        .await?;

    info!("Settings module RBAC rules initialized successfully");
    Ok(())
}

async fn list() -> WebResult<WebResponse<Vec<SystemSettingInfo>>> {
    Ok(WebResponse::ok(
        SettingsRepository::find_all::<DatabaseConnection>(None).await?,
    ))
}

async fn get_by_key(params: Path<SettingKeyPath>) -> WebResult<WebResponse<SystemSettingInfo>> {
    Ok(WebResponse::ok(
        SettingsRepository::find_by_key::<DatabaseConnection>(&params.key, None)
            .await?
            .ok_or(WebError::NotFound(EntityType::Settings.to_string()))?,
    ))
}

/// Write a batch of settings
///
/// # Endpoint
/// `PUT /api/settings`
///
/// # Description
/// Existing keys are updated, new keys inserted, all in one transaction.
/// Returns the number of settings written.
///
/// # Errors
/// - Conflict (409): the batch names the same key twice
#[instrument(name = "upsert-settings", skip_all)]
async fn upsert(req: Json<UpsertSettings>) -> WebResult<WebResponse<u64>> {
    let items = req.into_inner().items;
    ensure_unique_keys(&items)?;

    let written = SettingsRepository::upsert::<DatabaseConnection>(items, None).await?;
    info!(written, "System settings written");
    Ok(WebResponse::ok(written))
}

async fn delete(params: Path<SettingKeyPath>) -> WebResult<WebResponse<bool>> {
    let removed = SettingsRepository::delete::<DatabaseConnection>(&params.key, None).await?;
    if removed == 0 {
        return Err(WebError::NotFound(EntityType::Settings.to_string()));
    }
    info!(key = %params.key, "System setting deleted");
    Ok(WebResponse::ok(true))
}

fn ensure_unique_keys(items: &[SettingItem]) -> WebResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.key.as_str()) {
            return Err(WebError::Conflict(format!(
                "setting `{}` appears more than once",
                item.key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str) -> SettingItem {
        SettingItem {
            key: key.to_string(),
            value: "1".to_string(),
            description: None,
            category: None,
            is_public: None,
        }
    }

    #[test]
    fn test_duplicate_keys_conflict() {
        assert!(ensure_unique_keys(&[item("currency"), item("site_name")]).is_ok());
        assert!(matches!(
            ensure_unique_keys(&[item("currency"), item("currency")]),
            Err(WebError::Conflict(_))
        ));
    }
}
