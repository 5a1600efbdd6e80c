use super::*;
use tracing::{debug, instrument};

/// Runs every registered validator that applies to an entity and operation.
#[derive(Default)]
pub struct ValidationManager {
    validators: Vec<Arc<dyn EntityValidator>>,
}

impl ValidationManager {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn register(&mut self, validator: Arc<dyn EntityValidator>) -> &mut Self {
        self.validators.push(validator);
        self
    }

    /// Stops at the first failing validator.
    #[instrument(skip(self, entity))]
    pub async fn validate(&self, entity: &dyn UMEntity, operation: Operation) -> WebResult<()> {
        let entity_type = entity.entity_type();

        debug!("Validating {:?} operation on {:?}", operation, entity_type);

        for validator in &self.validators {
            if validator.is_applicable(&entity_type, &operation) {
                validator.validate(entity, operation).await?;
            }
        }

        Ok(())
    }
}
