pub mod category;
pub mod favorite;
pub mod message;
pub mod order;
pub mod permission;
pub mod prelude;
pub mod product;
pub mod profile;
pub mod role;
pub mod role_permission;
pub mod system_settings;

use crate::enums::common::EntityType;
use downcast_rs::{impl_downcast, DowncastSync};

/// An active model the web layer's entity validators can inspect.
pub trait UMEntity: DowncastSync {
    fn entity_type(&self) -> EntityType;
}

impl_downcast!(sync UMEntity);

macro_rules! impl_um_entity {
    ($($model:ty => $entity:expr),* $(,)?) => {
        $(
            impl UMEntity for $model {
                #[inline]
                fn entity_type(&self) -> EntityType {
                    $entity
                }
            }
        )*
    };
}

impl_um_entity!(
    profile::ActiveModel => EntityType::Profile,
    role::ActiveModel => EntityType::Role,
    permission::ActiveModel => EntityType::Permission,
    category::ActiveModel => EntityType::Category,
);
