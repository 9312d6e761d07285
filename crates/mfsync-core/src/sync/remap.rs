//! Source-to-target identifier remapping

use std::collections::HashMap;

use crate::model::{
    MetafieldDefinition, MetaobjectDefinition, REFERENCE_LIST_VALIDATION, REFERENCE_VALIDATION,
    Validation,
};

/// Map from source-store definition ids to the ids created at the target
///
/// Lives for one copy operation only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRemap {
    ids: HashMap<String, String>,
}

impl IdRemap {
    /// Record that `source_id` was created at the target as `target_id`
    pub fn insert(&mut self, source_id: impl Into<String>, target_id: impl Into<String>) {
        self.ids.insert(source_id.into(), target_id.into());
    }

    /// Target id for `source_id`, if it has been created
    #[must_use]
    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.ids.get(source_id).map(String::as_str)
    }

    /// Number of recorded ids
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn map_id(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    /// Rewrite a reference validation; other validations come back unchanged
    ///
    /// Ids without a mapping are kept as they are.
    #[must_use]
    pub fn rewrite_validation(&self, validation: &Validation) -> Validation {
        if validation.name == REFERENCE_VALIDATION {
            return Validation::new(&validation.name, self.map_id(&validation.value));
        }
        if validation.name == REFERENCE_LIST_VALIDATION {
            let Ok(ids) = serde_json::from_str::<Vec<String>>(&validation.value) else {
                return validation.clone();
            };
            let mapped: Vec<String> = ids.iter().map(|id| self.map_id(id)).collect();
            let value = serde_json::to_string(&mapped).unwrap_or_else(|_| validation.value.clone());
            return Validation::new(&validation.name, value);
        }
        validation.clone()
    }

    fn rewrite_validations(&self, validations: &[Validation]) -> Vec<Validation> {
        validations
            .iter()
            .map(|validation| self.rewrite_validation(validation))
            .collect()
    }

    /// Copy of `definition` with every sub-field reference rewritten
    #[must_use]
    pub fn rewrite_object_definition(&self, definition: &MetaobjectDefinition) -> MetaobjectDefinition {
        definition.with_field_definitions(
            definition
                .field_definitions
                .iter()
                .map(|field| field.with_validations(self.rewrite_validations(&field.validations)))
                .collect(),
        )
    }

    /// Copy of `definition` with its references rewritten
    #[must_use]
    pub fn rewrite_field_definition(&self, definition: &MetafieldDefinition) -> MetafieldDefinition {
        definition.with_validations(self.rewrite_validations(&definition.validations))
    }
}
