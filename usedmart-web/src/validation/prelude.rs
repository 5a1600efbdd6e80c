use super::{manager::ValidationManager, validators::duplicate::EntityDuplicateValidator};
use std::sync::Arc;

/// Manager with the built-in duplicate checks registered.
pub fn create_default_manager() -> ValidationManager {
    let mut manager = ValidationManager::new();
    manager.register(Arc::new(EntityDuplicateValidator));
    manager
}
