pub use super::category::{
    ActiveModel as CategoryActiveModel, Column as CategoryColumn, Entity as Category,
    Model as CategoryModel,
};
pub use super::favorite::{
    ActiveModel as FavoriteActiveModel, Column as FavoriteColumn, Entity as Favorite,
    Model as FavoriteModel,
};
pub use super::message::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as Message,
    Model as MessageModel,
};
pub use super::order::{
    ActiveModel as OrderActiveModel, Column as OrderColumn, Entity as Order, Model as OrderModel,
};
pub use super::permission::{
    ActiveModel as PermissionActiveModel, Column as PermissionColumn, Entity as Permission,
    Model as PermissionModel,
};
pub use super::product::{
    ActiveModel as ProductActiveModel, Column as ProductColumn, Entity as Product,
    ImageUrls as ProductImages, Model as ProductModel,
};
pub use super::profile::{
    ActiveModel as ProfileActiveModel, Column as ProfileColumn, Entity as Profile,
    Model as ProfileModel,
};
pub use super::role::{
    ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as Role, Model as RoleModel,
};
pub use super::role_permission::{
    ActiveModel as RolePermissionActiveModel, Column as RolePermissionColumn,
    Entity as RolePermission, Model as RolePermissionModel,
};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Column as SystemSettingColumn,
    Entity as SystemSetting, Model as SystemSettingModel,
};
