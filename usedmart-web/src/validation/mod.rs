pub mod manager;
pub mod prelude;
pub mod validators;

use async_trait::async_trait;
use std::sync::Arc;
use usedmart_error::WebResult;
use usedmart_models::{
    entities::UMEntity,
    enums::common::{EntityType, Operation},
};

/// Entity-level check run before a create or update reaches the store.
#[async_trait]
pub trait EntityValidator: Send + Sync {
    fn supported_entity_types(&self) -> Vec<EntityType>;

    fn supported_operations(&self) -> Vec<Operation>;

    async fn validate(&self, entity: &dyn UMEntity, operation: Operation) -> WebResult<()>;

    fn is_applicable(&self, entity_type: &EntityType, operation: &Operation) -> bool {
        self.supported_entity_types().contains(entity_type)
            && self.supported_operations().contains(operation)
    }
}
