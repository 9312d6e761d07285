//! Resolve manifest identifiers against a store's definitions

use tracing::warn;

use super::{Manifest, ManifestId};
use crate::model::{DefinitionSet, MetafieldDefinition, MetaobjectDefinition};

/// Definitions selected by a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMatch {
    /// Matched metafield definitions (every owner type sharing the identity)
    pub field_definitions: Vec<MetafieldDefinition>,
    /// Matched metaobject definitions
    pub object_definitions: Vec<MetaobjectDefinition>,
    /// Identifiers with no counterpart in the store, in manifest order
    pub not_found: Vec<ManifestId>,
}

impl ManifestMatch {
    /// Selected definitions as a set the engine can operate on
    #[must_use]
    pub fn into_definitions(self) -> DefinitionSet {
        DefinitionSet::new(self.field_definitions, self.object_definitions)
    }
}

/// Exact-match resolver for manifests
pub struct ManifestMatcher;

impl ManifestMatcher {
    /// Select the definitions of `definitions` named by `manifest`
    ///
    /// Matching is exact on `(namespace, key)` or type. Missing identifiers
    /// are reported in `not_found` and logged, never treated as fatal.
    #[must_use]
    pub fn find(manifest: &Manifest, definitions: &DefinitionSet) -> ManifestMatch {
        let mut result = ManifestMatch::default();

        for id in manifest.ids() {
            let matched = match id {
                ManifestId::Field { namespace, key } => {
                    let before = result.field_definitions.len();
                    result.field_definitions.extend(
                        definitions
                            .field_definitions
                            .iter()
                            .filter(|def| &def.namespace == namespace && &def.key == key)
                            .cloned(),
                    );
                    result.field_definitions.len() > before
                }
                ManifestId::Object { type_name } => {
                    match definitions
                        .object_definitions
                        .iter()
                        .find(|def| &def.type_name == type_name)
                    {
                        Some(def) => {
                            result.object_definitions.push(def.clone());
                            true
                        }
                        None => false,
                    }
                }
            };

            if !matched {
                warn!("Manifest entry not found in store: {id}");
                result.not_found.push(id.clone());
            }
        }

        result
    }
}
