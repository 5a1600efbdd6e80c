use crate::{domain::prelude::NewSystemSetting, initializer::InitContext};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::prelude::*;
use usedmart_macros::SeedableInitializer;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    model = NewSystemSetting,
    order = super::INIT_SETTINGS_ORDER,
    create_table = create_system_settings_table,
    seed_data = get_system_settings_seed_data
))]
pub enum SystemSettings {
    Table,
    Key,
    Value,
    Description,
    Category,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

fn create_system_settings_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(SystemSettings::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SystemSettings::Key)
                .string_len(64)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(SystemSettings::Value).text().not_null())
        .col(ColumnDef::new(SystemSettings::Description).string_len(255))
        .col(
            ColumnDef::new(SystemSettings::Category)
                .string_len(32)
                .not_null()
                .default("general"),
        )
        .col(
            ColumnDef::new(SystemSettings::IsPublic)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(SystemSettings::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(SystemSettings::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn setting(key: &str, value: &str, description: &str, category: &str, is_public: bool) -> NewSystemSetting {
    NewSystemSetting {
        key: key.into(),
        value: value.into(),
        description: Some(description.into()),
        category: category.into(),
        is_public,
    }
}

async fn get_system_settings_seed_data(
    _: &mut InitContext,
) -> Result<Option<Vec<NewSystemSetting>>, DbErr> {
    Ok(Some(vec![
        setting("site_name", "UsedMart", "Marketplace display name", "general", true),
        setting("site_description", "", "Short tagline shown on the landing page", "general", true),
        setting("contact_email", "", "Support contact address", "general", true),
        setting("currency", "CNY", "ISO currency code for prices", "general", true),
        setting(
            "maintenance_mode",
            "false",
            "Reject new listings while enabled",
            "general",
            true,
        ),
        setting(
            "require_product_approval",
            "true",
            "New listings wait for moderation",
            "market",
            false,
        ),
        setting(
            "max_products_per_user",
            "50",
            "Listing quota per seller, 0 for unlimited",
            "market",
            false,
        ),
        setting("max_product_images", "9", "Images allowed per listing", "market", false),
    ]))
}
